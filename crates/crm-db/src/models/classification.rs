use crate::{
    entity::entity,
    relation::{BelongsTo, BelongsToMany, HasMany, MorphTo},
    rules,
};

use super::{People, User};

entity! {
    /// A postal address owned by any record through `addressable_type` /
    /// `addressable_id`.
    pub struct Address / NewAddress in addresses as Address {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [],
        morphs: [addressable_type / addressable_id],
        validate: rules::address,
    }
    {
        pub team_id: i64,
        pub addressable_type: String,
        pub addressable_id: i64,
        pub kind: String,
        pub line1: String,
        pub line2: Option<String>,
        pub city: String,
        pub region: Option<String>,
        pub postal_code: Option<String>,
        pub country_code: String,
    }
}

impl Address {
    pub const ADDRESSABLE: MorphTo<Address> = MorphTo::new("addressable_type", "addressable_id");
}

entity! {
    pub struct Group / NewGroup in groups as Group {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub description: Option<String>,
    }
}

impl Group {
    pub const PEOPLE: BelongsToMany<Group, People, GroupPeople> =
        BelongsToMany::new("group_id", "people_id");
}

entity! {
    pub struct GroupPeople / NewGroupPeople in group_people as GroupPeople {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[group_id, people_id]],
        references: [group_id => Group, people_id => People],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub group_id: i64,
        pub people_id: i64,
    }
}

impl Default for NewGroupPeople {
    fn default() -> Self {
        Self {
            team_id: 0,
            group_id: 0,
            people_id: 0,
        }
    }
}

entity! {
    pub struct ContactPersona / NewContactPersona in contact_personas as ContactPersona {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, name]],
        references: [],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub description: Option<String>,
    }
}

impl ContactPersona {
    pub const PEOPLE: HasMany<ContactPersona, People> = HasMany::new("contact_persona_id");
}

entity! {
    pub struct ContactRole / NewContactRole in contact_roles as ContactRole {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, name]],
        references: [],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
    }
}

impl ContactRole {
    pub const PEOPLE: BelongsToMany<ContactRole, People, ContactRolePeople> =
        BelongsToMany::new("contact_role_id", "people_id");
}

entity! {
    pub struct ContactRolePeople / NewContactRolePeople
        in contact_role_people as ContactRolePeople {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[contact_role_id, people_id]],
        references: [contact_role_id => ContactRole, people_id => People],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub contact_role_id: i64,
        pub people_id: i64,
    }
}

impl Default for NewContactRolePeople {
    fn default() -> Self {
        Self {
            team_id: 0,
            contact_role_id: 0,
            people_id: 0,
        }
    }
}

entity! {
    pub struct Territory / NewTerritory in territories as Territory {
        tenancy: [team],
        soft_deletes: yes,
        mutability: Mutable,
        unique: [],
        references: [parent_id => Territory, manager_id => User],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub parent_id: Option<i64>,
        pub manager_id: Option<i64>,
    }
}

impl Territory {
    pub const PARENT: BelongsTo<Territory, Territory> = BelongsTo::new("parent_id");
    pub const MANAGER: BelongsTo<Territory, User> = BelongsTo::new("manager_id");
    pub const CHILDREN: HasMany<Territory, Territory> = HasMany::new("parent_id");
    pub const RECORDS: HasMany<Territory, TerritoryRecord> = HasMany::new("territory_id");
}

entity! {
    /// Assigns any record to a territory.
    pub struct TerritoryRecord / NewTerritoryRecord in territory_records as TerritoryRecord {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[territory_id, record_type, record_id]],
        references: [territory_id => Territory],
        morphs: [record_type / record_id],
    }
    {
        pub team_id: i64,
        pub territory_id: i64,
        pub record_type: String,
        pub record_id: i64,
        pub is_primary: bool,
        pub assigned_at: jiff_diesel::Timestamp,
        pub assignment_reason: Option<String>,
    }
}

impl TerritoryRecord {
    pub const TERRITORY: BelongsTo<TerritoryRecord, Territory> = BelongsTo::new("territory_id");
    pub const RECORD: MorphTo<TerritoryRecord> = MorphTo::new("record_type", "record_id");
}

entity! {
    /// Also reachable as [`Label`].
    pub struct Tag / NewTag in tags as Tag {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, slug]],
        references: [],
        morphs: [],
    }
    {
        pub team_id: i64,
        pub name: String,
        pub slug: String,
        pub color: Option<String>,
    }
}

pub type Label = Tag;
pub type NewLabel = NewTag;

entity! {
    /// Pivot between a [`Tag`] and any record.
    pub struct Taggable / NewTaggable in taggables as Taggable {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[tag_id, taggable_type, taggable_id]],
        references: [tag_id => Tag],
        morphs: [taggable_type / taggable_id],
    }
    {
        pub team_id: i64,
        pub tag_id: i64,
        pub taggable_type: String,
        pub taggable_id: i64,
    }
}

impl Taggable {
    pub const TAG: BelongsTo<Taggable, Tag> = BelongsTo::new("tag_id");
    pub const TAGGABLE: MorphTo<Taggable> = MorphTo::new("taggable_type", "taggable_id");
}

entity! {
    pub struct CustomFieldGroup / NewCustomFieldGroup in custom_field_sections as CustomFieldGroup {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [],
        references: [],
        morphs: [],
        validate: rules::custom_field_group,
    }
    {
        pub team_id: i64,
        pub name: String,
        pub entity_type: String,
        pub sort_order: i32,
    }
}

impl CustomFieldGroup {
    pub const FIELDS: HasMany<CustomFieldGroup, CustomField> =
        HasMany::new("custom_field_section_id");
}

entity! {
    pub struct CustomField / NewCustomField in custom_fields as CustomField {
        tenancy: [team],
        soft_deletes: no,
        mutability: Mutable,
        unique: [[team_id, entity_type, code]],
        references: [custom_field_section_id => CustomFieldGroup],
        morphs: [],
        validate: rules::custom_field,
    }
    {
        pub team_id: i64,
        pub custom_field_section_id: Option<i64>,
        pub code: String,
        pub name: String,
        pub field_type: String,
        pub entity_type: String,
        pub validation_rules: Option<serde_json::Value>,
        pub active: bool,
    }
}

impl CustomField {
    pub const SECTION: BelongsTo<CustomField, CustomFieldGroup> =
        BelongsTo::new("custom_field_section_id");
}
