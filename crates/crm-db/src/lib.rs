use diesel_async::{
    pooled_connection::{
        mobc::{Builder, Pool},
        AsyncDieselConnectionManager,
    },
    AsyncPgConnection,
};
use std::{path::PathBuf, time::Duration};

pub mod backend;
pub mod customer;
pub mod entity;
pub mod hooks;
pub mod merge;
pub mod models;
pub mod morph;
pub mod query;
pub mod reference;
pub mod relation;
mod rules;
pub mod schedule;
mod schema;
pub mod store;
pub mod tasks;
pub mod tenant;
#[cfg(test)]
mod tests;
pub mod value;

pub use backend::{memory::MemoryBackend, pg::PgBackend, Backend};
pub use customer::{Customer, CustomerUid, Customers};
pub use entity::{Entity, EntityKind};
pub use hooks::{Hooks, WriteAction, WriteEvent};
pub use merge::{MergePayload, MergeRequest};
pub use models::AnyRecord;
pub use morph::MorphRef;
pub use query::{Direction, Trashed};
pub use store::Store;
pub use tenant::{Scope, TenantContext};
pub use value::Value;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("getting connection from pool: {0}")]
    GetConnectionPool(#[from] mobc::Error<diesel_async::pooled_connection::PoolError>),
    #[error("result failure: {0}")]
    Result(#[from] diesel::result::Error),
    #[error("reference data: {0}")]
    Reference(#[from] reference::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity}.{column} does not resolve to an existing {target}")]
    ReferentialIntegrity {
        entity: &'static str,
        column: String,
        target: String,
    },
    #[error("{entity} {id} is still referenced by {referenced_by}")]
    InUse {
        entity: &'static str,
        id: i64,
        referenced_by: String,
    },
    #[error("unknown polymorphic type {0:?}")]
    UnknownMorphType(String),
    #[error("expected a {expected} reference, found {found}")]
    MorphKindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },
    #[error("{0} is a derived read-only projection")]
    ReadOnly(&'static str),
    #[error("{0} is append-only")]
    AppendOnly(&'static str),
    #[error("{0} does not support soft deletes")]
    NotSoftDeletable(&'static str),
    #[error("{entity} write would move a row out of the current tenant")]
    CrossTenantWrite { entity: &'static str },
    #[error("{entity} already has a row with the same ({columns})")]
    Duplicate { entity: &'static str, columns: String },
    #[error("invalid {entity}: {message}")]
    Validation {
        entity: &'static str,
        message: String,
    },
    #[error("column {column} expects a {expected} value")]
    ColumnValue {
        column: String,
        expected: &'static str,
    },
    #[error("{entity} has no column {column}")]
    UnknownColumn {
        entity: &'static str,
        column: String,
    },
    #[error("no table {0}")]
    UnknownTable(String),
    #[error("invalid customer uid {0:?}")]
    InvalidCustomerUid(String),
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    db_url: String,
    max_open: u64,
    max_idle: u64,
    #[serde(with = "humantime_serde", default)]
    max_lifetime: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    max_idle_lifetime: Option<Duration>,
    #[serde(with = "humantime_serde")]
    timeout_for_get: Duration,
    #[serde(default)]
    reference_data: Option<PathBuf>,
}

impl Config {
    pub fn set_db_url(&mut self, db_url: String) {
        self.db_url = db_url;
    }

    pub fn reference_data(&self) -> Option<&PathBuf> {
        self.reference_data.as_ref()
    }
}

pub async fn create(config: &Config) -> Result<Store<PgBackend>, Error> {
    let pool = create_pool(config);
    let reference = match &config.reference_data {
        Some(path) => reference::Cache::from_file(path)?,
        None => reference::Cache::builtin()?,
    };
    Ok(Store::new(PgBackend::new(pool), reference))
}

fn create_pool(config: &Config) -> Pool<AsyncPgConnection> {
    let builder = Builder::new()
        .max_open(config.max_open)
        .max_idle(config.max_idle)
        .max_lifetime(
            config
                .max_lifetime
                .map(|v| v.max(Duration::from_secs(3600))),
        )
        .max_idle_lifetime(
            config
                .max_idle_lifetime
                .map(|v| v.max(Duration::from_secs(900))),
        )
        .get_timeout(Some(config.timeout_for_get.max(Duration::from_secs(5))));
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.db_url);
    builder.build(manager)
}
