use crate::{
    backend::Backend,
    entity::{Entity, EntityKind},
    hooks::{WriteAction, WriteEvent},
    models::{ContactMergeLog, People, User},
    store::Store,
    tenant::Scope,
    value, Error,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeRequest {
    pub primary_id: i64,
    pub duplicate_id: i64,
    pub merged_by: i64,
}

/// What a merge changed, stored in `contact_merge_logs.merge_data`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergePayload {
    pub duplicate: serde_json::Map<String, serde_json::Value>,
    pub moved: Vec<MovedRows>,
    pub dropped: Vec<DroppedRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedRows {
    pub table: String,
    pub column: String,
    pub ids: Vec<i64>,
}

/// A pivot row removed because the primary already had the same link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    pub table: String,
    pub row: serde_json::Value,
}

impl MergePayload {
    pub(crate) fn record_moved(&mut self, table: &str, column: &str, ids: Vec<i64>) {
        if !ids.is_empty() {
            self.moved.push(MovedRows {
                table: table.to_owned(),
                column: column.to_owned(),
                ids,
            });
        }
    }

    pub(crate) fn record_dropped(&mut self, table: &str, rows: Vec<serde_json::Value>) {
        self.dropped.extend(rows.into_iter().map(|row| DroppedRow {
            table: table.to_owned(),
            row,
        }));
    }

    pub fn moved_ids(&self, table: &str) -> Vec<i64> {
        self.moved
            .iter()
            .filter(|moved| moved.table == table)
            .flat_map(|moved| moved.ids.iter().copied())
            .collect()
    }
}

/// Tenant-owned tables holding a plain foreign key to `people`.
pub(crate) const COLUMN_TARGETS: &[(&str, &str)] = &[
    ("opportunities", "contact_id"),
    ("orders", "contact_id"),
    ("invoices", "contact_id"),
    ("quotes", "contact_id"),
    ("email_program_recipients", "people_id"),
    ("portal_users", "people_id"),
];

/// Polymorphic tables that may point at a person.
pub(crate) struct MorphTarget {
    pub table: &'static str,
    pub type_column: &'static str,
    pub id_column: &'static str,
    /// Column that, with the morph pair, must stay unique.
    pub unique_with: Option<&'static str>,
}

pub(crate) const MORPH_TARGETS: &[MorphTarget] = &[
    MorphTarget {
        table: "emails",
        type_column: "emailable_type",
        id_column: "emailable_id",
        unique_with: None,
    },
    MorphTarget {
        table: "addresses",
        type_column: "addressable_type",
        id_column: "addressable_id",
        unique_with: None,
    },
    MorphTarget {
        table: "notes",
        type_column: "notable_type",
        id_column: "notable_id",
        unique_with: None,
    },
    MorphTarget {
        table: "territory_records",
        type_column: "record_type",
        id_column: "record_id",
        unique_with: Some("territory_id"),
    },
    MorphTarget {
        table: "taggables",
        type_column: "taggable_type",
        id_column: "taggable_id",
        unique_with: Some("tag_id"),
    },
];

/// Tenant-owned pivots keyed by `people_id`, with the column naming the other side.
pub(crate) const PIVOT_TARGETS: &[(&str, &str)] = &[
    ("company_people", "company_id"),
    ("group_people", "group_id"),
    ("contact_role_people", "contact_role_id"),
];

#[derive(Clone, Debug)]
pub struct MergePlan {
    pub team_id: i64,
    pub primary_id: i64,
    pub duplicate_id: i64,
    pub merged_by: i64,
    pub duplicate: serde_json::Map<String, serde_json::Value>,
    pub people_names: Vec<String>,
    pub now: jiff_diesel::Timestamp,
}

impl MergePlan {
    pub(crate) fn log_draft(
        &self,
        payload: &MergePayload,
    ) -> Result<crate::models::NewContactMergeLog, Error> {
        Ok(crate::models::NewContactMergeLog {
            team_id: self.team_id,
            primary_contact_id: self.primary_id,
            duplicate_contact_id: self.duplicate_id,
            merged_by: self.merged_by,
            merge_data: serde_json::to_value(payload)?,
        })
    }
}

impl<B: Backend> Store<B> {
    #[tracing::instrument(skip(self, scope))]
    pub async fn merge_contacts(
        &self,
        scope: &Scope,
        request: MergeRequest,
    ) -> Result<ContactMergeLog, Error> {
        if request.primary_id == request.duplicate_id {
            return Err(Error::Validation {
                entity: ContactMergeLog::TABLE,
                message: "a contact cannot be merged into itself".into(),
            });
        }
        let primary = self.get::<People>(scope, request.primary_id).await?;
        let duplicate = self.get::<People>(scope, request.duplicate_id).await?;
        if primary.team_id != duplicate.team_id {
            return Err(Error::CrossTenantWrite {
                entity: People::TABLE,
            });
        }
        if self.find::<User>(scope, request.merged_by).await?.is_none() {
            return Err(Error::ReferentialIntegrity {
                entity: ContactMergeLog::TABLE,
                column: "merged_by".into(),
                target: EntityKind::User.to_string(),
            });
        }
        let plan = MergePlan {
            team_id: primary.team_id,
            primary_id: primary.id,
            duplicate_id: duplicate.id,
            merged_by: request.merged_by,
            duplicate: value::to_json_map(&duplicate, People::COLUMNS),
            people_names: EntityKind::People.stored_names(),
            now: jiff::Timestamp::now().into(),
        };
        let log = self.backend().merge_contacts(plan).await?;
        self.hooks().dispatch(WriteEvent {
            kind: EntityKind::People,
            id: duplicate.id,
            team_id: Some(duplicate.team_id),
            action: WriteAction::Deleted,
        });
        self.hooks().dispatch(WriteEvent {
            kind: EntityKind::People,
            id: primary.id,
            team_id: Some(primary.team_id),
            action: WriteAction::Merged,
        });
        self.hooks().dispatch(WriteEvent {
            kind: EntityKind::ContactMergeLog,
            id: log.id,
            team_id: Some(log.team_id),
            action: WriteAction::Created,
        });
        Ok(log)
    }
}
