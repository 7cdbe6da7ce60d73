use crate::{
    reference,
    value::{Columns, ColumnsMut},
    Error,
};
use std::fmt;

macro_rules! entity_kinds {
    ($($kind:ident => $discriminator:literal),+ $(,)?) => {
        /// Every record type persisted by this crate.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EntityKind {
            $($kind),+
        }

        impl EntityKind {
            pub const ALL: &'static [EntityKind] = &[$(EntityKind::$kind),+];

            /// The canonical value stored in polymorphic `*_type` columns.
            pub fn discriminator(self) -> &'static str {
                match self {
                    $(EntityKind::$kind => $discriminator),+
                }
            }

            pub fn class_name(self) -> &'static str {
                match self {
                    $(EntityKind::$kind => stringify!($kind)),+
                }
            }
        }
    };
}

entity_kinds! {
    Team => "team",
    User => "user",
    TeamUser => "team_user",
    People => "people",
    Company => "company",
    CompanyPeople => "company_people",
    PortalUser => "portal_user",
    Opportunity => "opportunity",
    Product => "product",
    ProductAttribute => "product_attribute",
    ProductAttributeValue => "product_attribute_value",
    Order => "order",
    OrderLineItem => "order_line_item",
    Delivery => "delivery",
    Invoice => "invoice",
    InvoiceLineItem => "invoice_line_item",
    Quote => "quote",
    QuoteLineItem => "quote_line_item",
    PurchaseOrder => "purchase_order",
    PurchaseOrderItem => "purchase_order_item",
    Task => "task",
    TaskChecklistItem => "task_checklist_item",
    TaskRecurrence => "task_recurrence",
    TaskReminder => "task_reminder",
    SavedSearch => "saved_search",
    NotableEntry => "note",
    KnowledgeArticle => "knowledge_article",
    KnowledgeArticleRelation => "knowledge_article_relation",
    KnowledgeTag => "knowledge_tag",
    KnowledgeArticleTag => "knowledge_article_tag",
    Email => "email",
    EmailProgram => "email_program",
    EmailProgramRecipient => "email_program_recipient",
    EmailProgramBounce => "email_program_bounce",
    EmailProgramUnsubscribe => "email_program_unsubscribe",
    SecurityGroupBroadcastMessage => "security_group_broadcast_message",
    SecurityGroupMessageAcknowledgment => "security_group_message_acknowledgment",
    Address => "address",
    Group => "group",
    GroupPeople => "group_people",
    ContactPersona => "contact_persona",
    ContactRole => "contact_role",
    ContactRolePeople => "contact_role_people",
    Territory => "territory",
    TerritoryRecord => "territory_record",
    Tag => "tag",
    Taggable => "taggable",
    CustomFieldGroup => "custom_field_group",
    CustomField => "custom_field",
    ContactMergeLog => "contact_merge_log",
    NotificationPreference => "notification_preference",
    DocumentTemplate => "document_template",
    OcrTemplateField => "ocr_template_field",
    FeatureFlagSegment => "feature_segment",
}

/// Second names bound to the same table as a canonical kind.
const ALIASES: &[(&str, &str, EntityKind)] = &[
    ("deal", "Deal", EntityKind::Opportunity),
    ("contact", "Contact", EntityKind::People),
    ("person", "Person", EntityKind::People),
    ("organisation", "Organisation", EntityKind::Company),
    ("label", "Label", EntityKind::Tag),
    ("order_product", "OrderProduct", EntityKind::OrderLineItem),
    ("quote_product", "QuoteProduct", EntityKind::QuoteLineItem),
    ("invoice_item", "InvoiceItem", EntityKind::InvoiceLineItem),
];

const CLASS_PREFIX: &str = "App\\Models\\";

impl EntityKind {
    /// Maps a stored or caller supplied type name onto a kind.
    pub fn from_discriminator(name: &str) -> Result<EntityKind, Error> {
        if let Some(class) = name.strip_prefix(CLASS_PREFIX) {
            return EntityKind::ALL
                .iter()
                .copied()
                .find(|kind| kind.class_name() == class)
                .or_else(|| {
                    ALIASES
                        .iter()
                        .find(|(_, alias, _)| *alias == class)
                        .map(|(_, _, kind)| *kind)
                })
                .ok_or_else(|| Error::UnknownMorphType(name.to_owned()));
        }
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.discriminator() == name)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _, _)| *alias == name)
                    .map(|(_, _, kind)| *kind)
            })
            .ok_or_else(|| Error::UnknownMorphType(name.to_owned()))
    }

    /// Alias `(discriminator, class name)` pairs bound to this kind's table.
    pub fn aliases(self) -> impl Iterator<Item = (&'static str, &'static str)> {
        ALIASES
            .iter()
            .filter(move |(_, _, kind)| *kind == self)
            .map(|(alias, class, _)| (*alias, *class))
    }

    pub fn descriptor(self) -> Descriptor {
        crate::models::descriptor(self)
    }

    pub fn table(self) -> &'static str {
        self.descriptor().table
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tenancy {
    /// Not owned by a tenant.
    None,
    /// Owned through a `team_id` column.
    Team,
    /// Applies to the tenants listed in a JSON array column.
    JsonMembership(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    AppendOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    pub column: &'static str,
    pub target: EntityKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Morph {
    pub type_column: &'static str,
    pub id_column: &'static str,
}

/// Storage facts about a kind, available without naming its record type.
#[derive(Clone, Copy, Debug)]
pub struct Descriptor {
    pub kind: EntityKind,
    pub table: &'static str,
    pub tenancy: Tenancy,
    pub soft_deletes: bool,
    pub mutability: Mutability,
    pub references: &'static [Reference],
    pub morphs: &'static [Morph],
}

impl Descriptor {
    pub const fn of<E: Entity>() -> Self {
        Self {
            kind: E::KIND,
            table: E::TABLE,
            tenancy: E::TENANCY,
            soft_deletes: E::SOFT_DELETES,
            mutability: E::MUTABILITY,
            references: E::REFERENCES,
            morphs: E::MORPHS,
        }
    }
}

/// A persisted record type.
#[async_trait::async_trait]
pub trait Entity:
    ColumnsMut
    + Clone
    + fmt::Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + diesel::QueryableByName<diesel::pg::Pg>
{
    type Draft: ColumnsMut + Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: EntityKind;
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const TENANCY: Tenancy;
    const SOFT_DELETES: bool;
    const MUTABILITY: Mutability;
    const UNIQUE: &'static [&'static [&'static str]];
    const REFERENCES: &'static [Reference];
    const MORPHS: &'static [Morph];

    fn id(&self) -> i64;

    fn from_draft(id: i64, draft: Self::Draft, now: jiff_diesel::Timestamp) -> Self;

    fn assign_team(draft: &mut Self::Draft, team_id: i64);

    fn validate(_row: &dyn Columns, _reference: &reference::Cache) -> Result<(), Error> {
        Ok(())
    }

    async fn pg_insert(
        conn: &mut diesel_async::AsyncPgConnection,
        draft: Self::Draft,
        now: jiff_diesel::Timestamp,
    ) -> diesel::QueryResult<Self>;

    async fn pg_update(
        conn: &mut diesel_async::AsyncPgConnection,
        record: &Self,
    ) -> diesel::QueryResult<Self>;
}

/// Declares a record type, its draft and its insert row.
macro_rules! entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $draft:ident in $table:ident as $kind:ident {
            tenancy: [$($tenancy:tt)*],
            soft_deletes: $soft:ident,
            mutability: $mutability:ident,
            unique: [$([$($unique:ident),+]),*],
            references: [$($rcol:ident => $rkind:ident),*],
            morphs: [$($mtype:ident / $mid:ident),*],
            $(validate: $validate:path,)?
        }
        {
            $($(#[$fmeta:meta])* pub $field:ident: $ty:ty),+ $(,)?
        }
    ) => {
        $crate::entity::entity!(@record $soft $(#[$meta])* $name / $draft in $table {
            $($(#[$fmeta])* $field: $ty),+
        });

        #[derive(Clone, Debug, PartialEq)]
        pub struct $draft {
            $($(#[$fmeta])* pub $field: $ty,)+
        }

        impl $crate::value::Columns for $draft {
            fn column(&self, name: &str) -> Option<$crate::value::Value> {
                use $crate::value::IntoValue;
                match name {
                    $(stringify!($field) => Some(self.$field.to_value()),)+
                    _ => None,
                }
            }
        }

        impl $crate::value::ColumnsMut for $draft {
            fn set_column(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> Result<(), $crate::Error> {
                match name {
                    $(stringify!($field) => self.$field = $crate::value::convert(name, value)?,)+
                    _ => return Err($crate::Error::UnknownColumn {
                        entity: stringify!($table),
                        column: name.to_owned(),
                    }),
                }
                Ok(())
            }
        }

        #[async_trait::async_trait]
        impl $crate::entity::Entity for $name {
            type Draft = $draft;

            const KIND: $crate::entity::EntityKind = $crate::entity::EntityKind::$kind;
            const TABLE: &'static str = stringify!($table);
            const COLUMNS: &'static [&'static str] =
                $crate::entity::entity!(@columns $soft $($field),+);
            const TENANCY: $crate::entity::Tenancy = $crate::entity::entity!(@tenancy $($tenancy)*);
            const SOFT_DELETES: bool = $crate::entity::entity!(@soft $soft);
            const MUTABILITY: $crate::entity::Mutability = $crate::entity::Mutability::$mutability;
            const UNIQUE: &'static [&'static [&'static str]] = &[$(&[$(stringify!($unique)),+]),*];
            const REFERENCES: &'static [$crate::entity::Reference] = &[$(
                $crate::entity::Reference {
                    column: stringify!($rcol),
                    target: $crate::entity::EntityKind::$rkind,
                }
            ),*];
            const MORPHS: &'static [$crate::entity::Morph] = &[$(
                $crate::entity::Morph {
                    type_column: stringify!($mtype),
                    id_column: stringify!($mid),
                }
            ),*];

            fn id(&self) -> i64 {
                self.id
            }

            fn from_draft(id: i64, draft: $draft, now: jiff_diesel::Timestamp) -> Self {
                Self::build(id, draft, now)
            }

            #[allow(unused_variables)]
            fn assign_team(draft: &mut $draft, team_id: i64) {
                $crate::entity::entity!(@assign draft team_id $($tenancy)*);
            }

            $(
                fn validate(
                    row: &dyn $crate::value::Columns,
                    reference: &$crate::reference::Cache,
                ) -> Result<(), $crate::Error> {
                    $validate(row, reference)
                }
            )?

            async fn pg_insert(
                conn: &mut diesel_async::AsyncPgConnection,
                draft: $draft,
                now: jiff_diesel::Timestamp,
            ) -> diesel::QueryResult<Self> {
                use diesel::SelectableHelper;
                use diesel_async::RunQueryDsl;

                #[derive(diesel::Insertable)]
                #[diesel(table_name = $crate::schema::crm::$table)]
                #[diesel(check_for_backend(diesel::pg::Pg))]
                struct Row {
                    $($field: $ty,)+
                    created_at: jiff_diesel::Timestamp,
                    updated_at: jiff_diesel::Timestamp,
                }

                let row = Row {
                    $($field: draft.$field,)+
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into($crate::schema::crm::$table::table)
                    .values(row)
                    .returning(Self::as_returning())
                    .get_result(conn)
                    .await
            }

            async fn pg_update(
                conn: &mut diesel_async::AsyncPgConnection,
                record: &Self,
            ) -> diesel::QueryResult<Self> {
                use diesel::{QueryDsl, SelectableHelper};
                use diesel_async::RunQueryDsl;
                diesel::update($crate::schema::crm::$table::table.find(record.id))
                    .set(record)
                    .returning(Self::as_returning())
                    .get_result(conn)
                    .await
            }
        }
    };

    (@record yes $(#[$meta:meta])* $name:ident / $draft:ident in $table:ident {
        $($(#[$fmeta:meta])* $field:ident: $ty:ty),+
    }) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Debug,
            PartialEq,
            diesel::Identifiable,
            diesel::Queryable,
            diesel::QueryableByName,
            diesel::Selectable,
            diesel::AsChangeset,
        )]
        #[diesel(table_name = $crate::schema::crm::$table)]
        #[diesel(check_for_backend(diesel::pg::Pg))]
        #[diesel(treat_none_as_null = true)]
        pub struct $name {
            pub id: i64,
            $($(#[$fmeta])* pub $field: $ty,)+
            pub created_at: jiff_diesel::Timestamp,
            pub updated_at: jiff_diesel::Timestamp,
            pub deleted_at: Option<jiff_diesel::Timestamp>,
        }

        impl $name {
            fn build(id: i64, draft: $draft, now: jiff_diesel::Timestamp) -> Self {
                Self {
                    id,
                    $($field: draft.$field,)+
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                }
            }

            pub fn is_trashed(&self) -> bool {
                self.deleted_at.is_some()
            }
        }

        impl $crate::value::Columns for $name {
            fn column(&self, name: &str) -> Option<$crate::value::Value> {
                use $crate::value::IntoValue;
                match name {
                    "id" => Some(self.id.to_value()),
                    $(stringify!($field) => Some(self.$field.to_value()),)+
                    "created_at" => Some(self.created_at.to_value()),
                    "updated_at" => Some(self.updated_at.to_value()),
                    "deleted_at" => Some(self.deleted_at.to_value()),
                    _ => None,
                }
            }
        }

        impl $crate::value::ColumnsMut for $name {
            fn set_column(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> Result<(), $crate::Error> {
                use $crate::value::convert;
                match name {
                    "id" => self.id = convert(name, value)?,
                    $(stringify!($field) => self.$field = convert(name, value)?,)+
                    "created_at" => self.created_at = convert(name, value)?,
                    "updated_at" => self.updated_at = convert(name, value)?,
                    "deleted_at" => self.deleted_at = convert(name, value)?,
                    _ => return Err($crate::Error::UnknownColumn {
                        entity: stringify!($table),
                        column: name.to_owned(),
                    }),
                }
                Ok(())
            }
        }
    };

    (@record no $(#[$meta:meta])* $name:ident / $draft:ident in $table:ident {
        $($(#[$fmeta:meta])* $field:ident: $ty:ty),+
    }) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Debug,
            PartialEq,
            diesel::Identifiable,
            diesel::Queryable,
            diesel::QueryableByName,
            diesel::Selectable,
            diesel::AsChangeset,
        )]
        #[diesel(table_name = $crate::schema::crm::$table)]
        #[diesel(check_for_backend(diesel::pg::Pg))]
        #[diesel(treat_none_as_null = true)]
        pub struct $name {
            pub id: i64,
            $($(#[$fmeta])* pub $field: $ty,)+
            pub created_at: jiff_diesel::Timestamp,
            pub updated_at: jiff_diesel::Timestamp,
        }

        impl $name {
            fn build(id: i64, draft: $draft, now: jiff_diesel::Timestamp) -> Self {
                Self {
                    id,
                    $($field: draft.$field,)+
                    created_at: now,
                    updated_at: now,
                }
            }
        }

        impl $crate::value::Columns for $name {
            fn column(&self, name: &str) -> Option<$crate::value::Value> {
                use $crate::value::IntoValue;
                match name {
                    "id" => Some(self.id.to_value()),
                    $(stringify!($field) => Some(self.$field.to_value()),)+
                    "created_at" => Some(self.created_at.to_value()),
                    "updated_at" => Some(self.updated_at.to_value()),
                    _ => None,
                }
            }
        }

        impl $crate::value::ColumnsMut for $name {
            fn set_column(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> Result<(), $crate::Error> {
                use $crate::value::convert;
                match name {
                    "id" => self.id = convert(name, value)?,
                    $(stringify!($field) => self.$field = convert(name, value)?,)+
                    "created_at" => self.created_at = convert(name, value)?,
                    "updated_at" => self.updated_at = convert(name, value)?,
                    _ => return Err($crate::Error::UnknownColumn {
                        entity: stringify!($table),
                        column: name.to_owned(),
                    }),
                }
                Ok(())
            }
        }
    };

    (@columns yes $($field:ident),+) => {
        &["id", $(stringify!($field),)+ "created_at", "updated_at", "deleted_at"]
    };
    (@columns no $($field:ident),+) => {
        &["id", $(stringify!($field),)+ "created_at", "updated_at"]
    };

    (@soft yes) => { true };
    (@soft no) => { false };

    (@tenancy none) => { $crate::entity::Tenancy::None };
    (@tenancy team) => { $crate::entity::Tenancy::Team };
    (@tenancy json($column:ident)) => {
        $crate::entity::Tenancy::JsonMembership(stringify!($column))
    };

    (@assign $draft:ident $team:ident team) => { $draft.team_id = $team; };
    (@assign $draft:ident $team:ident none) => {};
    (@assign $draft:ident $team:ident json($column:ident)) => {};
}

pub(crate) use entity;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_their_canonical_kind() {
        for (alias, class, kind) in ALIASES {
            assert_eq!(EntityKind::from_discriminator(alias).unwrap(), *kind);
            assert_eq!(
                EntityKind::from_discriminator(&format!("{CLASS_PREFIX}{class}")).unwrap(),
                *kind
            );
            assert_eq!(kind.table(), EntityKind::from_discriminator(alias).unwrap().table());
        }
    }

    #[test]
    fn every_kind_round_trips_through_its_discriminator() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_discriminator(kind.discriminator()).unwrap(), *kind);
            assert_eq!(kind.descriptor().kind, *kind);
        }
    }

    #[test]
    fn unknown_discriminators_are_data_errors() {
        assert!(matches!(
            EntityKind::from_discriminator("spaceship"),
            Err(Error::UnknownMorphType(name)) if name == "spaceship"
        ));
        assert!(matches!(
            EntityKind::from_discriminator("App\\Models\\Spaceship"),
            Err(Error::UnknownMorphType(_))
        ));
    }

    #[test]
    fn tables_are_unique_per_kind() {
        let mut tables: Vec<_> = EntityKind::ALL.iter().map(|kind| kind.table()).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), EntityKind::ALL.len());
    }
}
