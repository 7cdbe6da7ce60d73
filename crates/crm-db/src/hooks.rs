use crate::entity::EntityKind;
use arc_swap::ArcSwap;
use std::{collections::HashMap, sync::Arc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Updated,
    Deleted,
    Restored,
    ForceDeleted,
    Merged,
}

/// A committed write, delivered to observers after the backend returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteEvent {
    pub kind: EntityKind,
    pub id: i64,
    pub team_id: Option<i64>,
    pub action: WriteAction,
}

pub type Observer = Arc<dyn Fn(&WriteEvent) + Send + Sync>;

/// Post-commit observers, registered per entity kind.
#[derive(Clone, Default)]
pub struct Hooks {
    observers: Arc<ArcSwap<HashMap<EntityKind, Vec<Observer>>>>,
}

impl Hooks {
    pub fn observe<F>(&self, kind: EntityKind, observer: F)
    where
        F: Fn(&WriteEvent) + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        self.observers.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.entry(kind).or_default().push(observer.clone());
            next
        });
    }

    pub(crate) fn dispatch(&self, event: WriteEvent) {
        let observers = self.observers.load();
        if let Some(observers) = observers.get(&event.kind) {
            for observer in observers {
                observer(&event);
            }
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let observers = self.observers.load();
        f.debug_struct("Hooks")
            .field("kinds", &observers.keys().collect::<Vec<_>>())
            .finish()
    }
}
