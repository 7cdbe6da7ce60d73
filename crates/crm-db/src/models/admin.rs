use crate::{
    entity::entity,
    merge::MergePayload,
    relation::{BelongsTo, HasMany},
    rules, Error,
};

use super::{People, User};

entity! {
    /// Audit trail of one contact merge. Never changed after it is written.
    pub struct ContactMergeLog / NewContactMergeLog in contact_merge_logs as ContactMergeLog {
        tenancy: [team],
        soft_deletes: no,
        mutability: AppendOnly,
        unique: [],
        references: [
            primary_contact_id => People,
            duplicate_contact_id => People,
            merged_by => User
        ],
        morphs: [],
        validate: rules::contact_merge_log,
    }
    {
        pub team_id: i64,
        pub primary_contact_id: i64,
        pub duplicate_contact_id: i64,
        pub merged_by: i64,
        pub merge_data: serde_json::Value,
    }
}

impl ContactMergeLog {
    pub const PRIMARY: BelongsTo<ContactMergeLog, People> = BelongsTo::new("primary_contact_id");
    pub const DUPLICATE: BelongsTo<ContactMergeLog, People> =
        BelongsTo::new("duplicate_contact_id");
    pub const MERGED_BY: BelongsTo<ContactMergeLog, User> = BelongsTo::new("merged_by");

    pub fn payload(&self) -> Result<MergePayload, Error> {
        Ok(serde_json::from_value(self.merge_data.clone())?)
    }
}

entity! {
    pub struct NotificationPreference / NewNotificationPreference
        in notification_preferences as NotificationPreference {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[user_id, channel, event]],
        references: [user_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub user_id: i64,
        pub channel: String,
        pub event: String,
        pub enabled: bool,
    }
}

entity! {
    pub struct DocumentTemplate / NewDocumentTemplate in document_templates as DocumentTemplate {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [creator_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub document_type: String,
        pub body: Option<String>,
        pub creator_id: Option<i64>,
    }
}

impl DocumentTemplate {
    pub const OCR_FIELDS: HasMany<DocumentTemplate, OcrTemplateField> =
        HasMany::new("document_template_id");
}

entity! {
    pub struct OcrTemplateField / NewOcrTemplateField in ocr_template_fields as OcrTemplateField {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[document_template_id, name]],
        references: [document_template_id => DocumentTemplate],
        morphs: [],
        validate: rules::ocr_template_field,
    }
    {
        pub team_id: i64,
        pub document_template_id: i64,
        pub name: String,
        pub field_type: String,
        pub region: Option<serde_json::Value>,
        pub validation_rules: Option<serde_json::Value>,
        pub is_required: bool,
    }
}

impl OcrTemplateField {
    pub const TEMPLATE: BelongsTo<OcrTemplateField, DocumentTemplate> =
        BelongsTo::new("document_template_id");
}

entity! {
    /// A feature flag segment. `values` lists the team ids it applies to, and
    /// reads under a tenant only see segments listing that tenant.
    pub struct FeatureFlagSegment / NewFeatureFlagSegment
        in feature_segments as FeatureFlagSegment {
        tenancy: [json(values)],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[feature, scope]],
        references: [],
        morphs: [],
        validate: rules::feature_segment,
    }
    {
        pub feature: String,
        pub scope: String,
        pub values: serde_json::Value,
        pub active: bool,
    }
}

impl FeatureFlagSegment {
    pub fn team_ids(&self) -> Vec<i64> {
        self.values
            .as_array()
            .map(|values| values.iter().filter_map(serde_json::Value::as_i64).collect())
            .unwrap_or_default()
    }

    pub fn applies_to(&self, team_id: i64) -> bool {
        self.team_ids().contains(&team_id)
    }
}
