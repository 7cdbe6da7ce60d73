use crate::{
    customer::Customer,
    entity::Entity,
    merge::MergePlan,
    models::ContactMergeLog,
    query::{Filter, Select},
    Error,
};

pub mod memory;
pub mod pg;

#[async_trait::async_trait]
pub trait Backend: Clone + Send + Sync + 'static {
    async fn select<E: Entity>(&self, select: &Select) -> Result<Vec<E>, Error>;

    async fn count(&self, table: &'static str, filter: &Filter) -> Result<i64, Error>;

    async fn insert<E: Entity>(
        &self,
        draft: E::Draft,
        now: jiff_diesel::Timestamp,
    ) -> Result<E, Error>;

    async fn update<E: Entity>(&self, record: &E) -> Result<E, Error>;

    /// Sets or clears `deleted_at`. Returns whether a row was touched.
    async fn set_deleted_at(
        &self,
        table: &'static str,
        id: i64,
        deleted_at: Option<jiff_diesel::Timestamp>,
        now: jiff_diesel::Timestamp,
    ) -> Result<bool, Error>;

    /// Physically removes a row. Returns whether a row was removed.
    async fn delete(&self, table: &'static str, id: i64) -> Result<bool, Error>;

    async fn customers(&self, filter: &Filter) -> Result<Vec<Customer>, Error>;

    async fn refresh_customers(&self) -> Result<(), Error>;

    /// Applies a merge atomically and returns the appended log entry.
    async fn merge_contacts(&self, plan: MergePlan) -> Result<ContactMergeLog, Error>;
}
