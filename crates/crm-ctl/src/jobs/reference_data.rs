use crm_db::{Backend, PgBackend, Store};
use std::{path::PathBuf, time::Duration};

#[derive(Clone, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub run: bool,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    #[serde(with = "humantime_serde")]
    pub error_sleep: Duration,
}

/// Rebuilds the in-memory country and currency sets from a file.
pub struct Reloader<B: Backend = PgBackend> {
    store: Store<B>,
    path: PathBuf,
}

impl<B: Backend> Reloader<B> {
    pub fn new(store: Store<B>, path: PathBuf) -> Self {
        Self { store, path }
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn reload(&self) -> Result<ReloadStatistics, Error> {
        let reference = self.store.reference();
        reference.reload_file(&self.path)?;
        Ok(ReloadStatistics {
            countries: reference.countries.len(),
            currencies: reference.currencies.len(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("reloading reference data: {0}")]
    Reference(#[from] crm_db::reference::Error),
}

#[derive(Debug)]
pub struct ReloadStatistics {
    pub countries: usize,
    pub currencies: usize,
}
