use arc_swap::ArcSwap;
use std::{collections::HashMap, path::Path, sync::Arc};

const BUILTIN: &str = include_str!("../data/reference.json");

/// Small static datasets that are replaced wholesale rather than migrated.
#[derive(Clone, Debug)]
pub struct Cache {
    pub countries: Arc<ReferenceSet>,
    pub currencies: Arc<ReferenceSet>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("parsing reference data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reading reference data: {0}")]
    Io(#[from] std::io::Error),
    #[error("reference entry does not exist")]
    DoesNotExist,
}

#[derive(serde::Deserialize)]
struct Dataset {
    countries: Vec<Entry>,
    currencies: Vec<Entry>,
}

#[derive(serde::Deserialize)]
struct Entry {
    code: String,
    name: String,
}

impl Cache {
    pub fn empty() -> Self {
        Self {
            countries: Arc::new(ReferenceSet::new()),
            currencies: Arc::new(ReferenceSet::new()),
        }
    }

    /// The dataset bundled with the crate.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let cache = Self::empty();
        cache.rebuild_from_json(json)?;
        Ok(cache)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Replaces every set at once. Readers see either the old or the new
    /// data, never a mix of the two.
    pub fn rebuild_from_json(&self, json: &str) -> Result<(), Error> {
        let dataset: Dataset = serde_json::from_str(json)?;
        self.countries.populate(index(dataset.countries));
        self.currencies.populate(index(dataset.currencies));
        Ok(())
    }

    pub fn reload_file(&self, path: &Path) -> Result<(), Error> {
        self.rebuild_from_json(&std::fs::read_to_string(path)?)
    }
}

fn index(entries: Vec<Entry>) -> HashMap<String, String> {
    entries
        .into_iter()
        .map(|entry| (entry.code.to_ascii_uppercase(), entry.name))
        .collect()
}

#[derive(Debug)]
pub struct ReferenceSet(ArcSwap<HashMap<String, String>>);

impl ReferenceSet {
    fn new() -> Self {
        Self(ArcSwap::new(Arc::new(HashMap::new())))
    }

    fn populate(&self, entries: HashMap<String, String>) {
        self.0.swap(Arc::new(entries));
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.load().contains_key(code)
    }

    pub fn name_of(&self, code: &str) -> Result<String, Error> {
        self.0.load().get(code).cloned().ok_or(Error::DoesNotExist)
    }

    pub fn len(&self) -> usize {
        self.0.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.load().is_empty()
    }
}
