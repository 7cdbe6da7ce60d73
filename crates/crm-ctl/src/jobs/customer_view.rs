use crm_db::{Backend, PgBackend, Scope, Store};
use std::time::{Duration, Instant};

#[derive(Clone, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub run: bool,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    #[serde(with = "humantime_serde")]
    pub error_sleep: Duration,
}

/// Regenerates the derived customer projection across every team.
pub struct Refresher<B: Backend = PgBackend> {
    store: Store<B>,
    scope: Scope,
}

impl<B: Backend> Refresher<B> {
    pub fn new(store: Store<B>) -> Self {
        Self {
            store,
            scope: Scope::cross_tenant("customer view refresh"),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshStatistics, Error> {
        let started = Instant::now();
        let customers = self.store.customers(&self.scope);
        customers.refresh().await?;
        let count = customers.list().await?.len();
        Ok(RefreshStatistics {
            customers: count,
            elapsed: started.elapsed(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("store error: {0}")]
    Store(#[from] crm_db::Error),
}

#[derive(Debug)]
pub struct RefreshStatistics {
    pub customers: usize,
    pub elapsed: Duration,
}
