use crate::{
    backend::Backend,
    entity::{Descriptor, Entity, EntityKind},
    store::Store,
    tenant::Scope,
    value::Columns,
    Error,
};

mod admin;
mod classification;
mod commerce;
mod communication;
mod engagement;
mod party;

pub use admin::*;
pub use classification::*;
pub use commerce::*;
pub use communication::*;
pub use engagement::*;
pub use party::*;

macro_rules! registry {
    ($($kind:ident => $record:ident),+ $(,)?) => {
        pub fn descriptor(kind: EntityKind) -> Descriptor {
            match kind {
                $(EntityKind::$kind => Descriptor::of::<$record>()),+
            }
        }

        /// A record of any kind, as returned by polymorphic resolution.
        #[derive(Clone, Debug, PartialEq)]
        pub enum AnyRecord {
            $($kind($record)),+
        }

        impl AnyRecord {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(AnyRecord::$kind(_) => EntityKind::$kind),+
                }
            }

            pub fn id(&self) -> i64 {
                match self {
                    $(AnyRecord::$kind(record) => record.id),+
                }
            }

            pub fn columns(&self) -> &dyn Columns {
                match self {
                    $(AnyRecord::$kind(record) => record),+
                }
            }
        }

        impl<B: Backend> Store<B> {
            /// Looks up a row of a kind only known at runtime.
            pub async fn find_any(
                &self,
                scope: &Scope,
                kind: EntityKind,
                id: i64,
            ) -> Result<Option<AnyRecord>, Error> {
                match kind {
                    $(EntityKind::$kind => Ok(self
                        .find::<$record>(scope, id)
                        .await?
                        .map(AnyRecord::$kind)),)+
                }
            }
        }

        pub(crate) fn empty_tables() -> crate::backend::memory::Tables {
            let mut tables = crate::backend::memory::Tables::new();
            $(tables.insert(
                <$record as Entity>::TABLE,
                Box::new(crate::backend::memory::Table::<$record>::default()),
            );)+
            tables
        }
    };
}

registry! {
    Team => Team,
    User => User,
    TeamUser => TeamUser,
    People => People,
    Company => Company,
    CompanyPeople => CompanyPeople,
    PortalUser => PortalUser,
    Opportunity => Opportunity,
    Product => Product,
    ProductAttribute => ProductAttribute,
    ProductAttributeValue => ProductAttributeValue,
    Order => Order,
    OrderLineItem => OrderLineItem,
    Delivery => Delivery,
    Invoice => Invoice,
    InvoiceLineItem => InvoiceLineItem,
    Quote => Quote,
    QuoteLineItem => QuoteLineItem,
    PurchaseOrder => PurchaseOrder,
    PurchaseOrderItem => PurchaseOrderItem,
    Task => Task,
    TaskChecklistItem => TaskChecklistItem,
    TaskRecurrence => TaskRecurrence,
    TaskReminder => TaskReminder,
    SavedSearch => SavedSearch,
    NotableEntry => NotableEntry,
    KnowledgeArticle => KnowledgeArticle,
    KnowledgeArticleRelation => KnowledgeArticleRelation,
    KnowledgeTag => KnowledgeTag,
    KnowledgeArticleTag => KnowledgeArticleTag,
    Email => Email,
    EmailProgram => EmailProgram,
    EmailProgramRecipient => EmailProgramRecipient,
    EmailProgramBounce => EmailProgramBounce,
    EmailProgramUnsubscribe => EmailProgramUnsubscribe,
    SecurityGroupBroadcastMessage => SecurityGroupBroadcastMessage,
    SecurityGroupMessageAcknowledgment => SecurityGroupMessageAcknowledgment,
    Address => Address,
    Group => Group,
    GroupPeople => GroupPeople,
    ContactPersona => ContactPersona,
    ContactRole => ContactRole,
    ContactRolePeople => ContactRolePeople,
    Territory => Territory,
    TerritoryRecord => TerritoryRecord,
    Tag => Tag,
    Taggable => Taggable,
    CustomFieldGroup => CustomFieldGroup,
    CustomField => CustomField,
    ContactMergeLog => ContactMergeLog,
    NotificationPreference => NotificationPreference,
    DocumentTemplate => DocumentTemplate,
    OcrTemplateField => OcrTemplateField,
    FeatureFlagSegment => FeatureFlagSegment,
}

/// Descriptors of every kind, in declaration order.
pub fn descriptors() -> impl Iterator<Item = Descriptor> {
    EntityKind::ALL.iter().map(|kind| descriptor(*kind))
}
