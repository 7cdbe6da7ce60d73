use crate::{
    backend::{pg::PgBackend, Backend},
    customer,
    entity::{Descriptor, Entity, EntityKind, Mutability, Reference, Tenancy},
    hooks::{Hooks, WriteAction, WriteEvent},
    models::{self, AnyRecord},
    morph::{self, MorphRef},
    query::{Condition, Direction, Filter, Query, Select, Trashed},
    reference,
    tenant::Scope,
    value::{Columns, Value},
    Error,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[derive(Clone)]
pub struct Store<B: Backend = PgBackend> {
    backend: B,
    reference: reference::Cache,
    hooks: Hooks,
    customers_stale: Arc<AtomicBool>,
}

impl<B: Backend> std::fmt::Debug for Store<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("hooks", &self.hooks)
            .field("customers_stale", &self.customers_stale)
            .finish_non_exhaustive()
    }
}

/// Declared foreign keys plus the implicit `team_id` of tenant-owned rows.
fn references_of(descriptor: &Descriptor) -> Vec<Reference> {
    let mut references = descriptor.references.to_vec();
    if descriptor.tenancy == Tenancy::Team && !references.iter().any(|r| r.column == "team_id") {
        references.push(Reference {
            column: "team_id",
            target: EntityKind::Team,
        });
    }
    references
}

fn now() -> jiff_diesel::Timestamp {
    jiff::Timestamp::now().into()
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B, reference: reference::Cache) -> Self {
        let hooks = Hooks::default();
        let customers_stale = Arc::new(AtomicBool::new(true));
        for kind in customer::SOURCES {
            let stale = customers_stale.clone();
            hooks.observe(kind, move |_| stale.store(true, Ordering::Release));
        }
        Self {
            backend,
            reference,
            hooks,
            customers_stale,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn reference(&self) -> &reference::Cache {
        &self.reference
    }

    pub(crate) fn customers_stale(&self) -> &AtomicBool {
        &self.customers_stale
    }

    pub fn query<'s, E: Entity>(&'s self, scope: &'s Scope) -> Query<'s, B, E> {
        Query::new(self, scope)
    }

    fn scoped_filter<E: Entity>(
        scope: &Scope,
        filter: Filter,
        trashed: Trashed,
    ) -> Result<Filter, Error> {
        let mut filter = match (E::SOFT_DELETES, trashed) {
            (true, trashed) => filter.with_trashed_mode(trashed),
            (false, Trashed::Only) => return Err(Error::NotSoftDeletable(E::TABLE)),
            (false, _) => filter,
        };
        scope.restrict(&Descriptor::of::<E>(), &mut filter);
        Ok(filter)
    }

    pub(crate) async fn select<E: Entity>(
        &self,
        scope: &Scope,
        filter: Filter,
        trashed: Trashed,
        mut order: Vec<(String, Direction)>,
        limit: Option<i64>,
    ) -> Result<Vec<E>, Error> {
        if order.is_empty() {
            order.push(("id".into(), Direction::Asc));
        }
        let select = Select {
            order,
            limit,
            ..Select::new(E::TABLE, Self::scoped_filter::<E>(scope, filter, trashed)?)
        };
        select.check_columns(E::TABLE, E::COLUMNS)?;
        self.backend.select::<E>(&select).await
    }

    pub(crate) async fn count<E: Entity>(
        &self,
        scope: &Scope,
        filter: Filter,
        trashed: Trashed,
    ) -> Result<i64, Error> {
        let select = Select::new(E::TABLE, Self::scoped_filter::<E>(scope, filter, trashed)?);
        select.check_columns(E::TABLE, E::COLUMNS)?;
        self.backend.count(E::TABLE, &select.filter).await
    }

    async fn find_in<E: Entity>(
        &self,
        scope: &Scope,
        id: i64,
        trashed: Trashed,
    ) -> Result<Option<E>, Error> {
        let filter = Filter::new().and(Condition::Eq("id".into(), Value::Int(id)));
        Ok(self
            .select::<E>(scope, filter, trashed, Vec::new(), Some(1))
            .await?
            .into_iter()
            .next())
    }

    pub async fn find<E: Entity>(&self, scope: &Scope, id: i64) -> Result<Option<E>, Error> {
        self.find_in(scope, id, Trashed::Without).await
    }

    pub async fn find_with_trashed<E: Entity>(
        &self,
        scope: &Scope,
        id: i64,
    ) -> Result<Option<E>, Error> {
        self.find_in(scope, id, Trashed::With).await
    }

    pub async fn get<E: Entity>(&self, scope: &Scope, id: i64) -> Result<E, Error> {
        self.find::<E>(scope, id).await?.ok_or_else(|| Error::NotFound {
            entity: E::TABLE,
            id: id.to_string(),
        })
    }

    pub async fn resolve(
        &self,
        scope: &Scope,
        target: &MorphRef,
    ) -> Result<Option<AnyRecord>, Error> {
        self.find_any(scope, target.kind, target.id).await
    }

    /// Like [`Store::resolve`], for callers expecting one particular kind.
    pub async fn resolve_as<E: Entity>(
        &self,
        scope: &Scope,
        target: &MorphRef,
    ) -> Result<Option<E>, Error> {
        if target.kind != E::KIND {
            return Err(Error::MorphKindMismatch {
                expected: E::KIND,
                found: target.kind,
            });
        }
        self.find::<E>(scope, target.id).await
    }

    /// Whether a row of `kind` with `id` exists, trashed rows included.
    async fn exists(&self, kind: EntityKind, id: i64, team_id: Option<i64>) -> Result<bool, Error> {
        let descriptor = kind.descriptor();
        let mut filter = Filter::new().and(Condition::Eq("id".into(), Value::Int(id)));
        if let (Tenancy::Team, Some(team_id)) = (descriptor.tenancy, team_id) {
            filter.push(Condition::Eq("team_id".into(), Value::Int(team_id)));
        }
        Ok(self.backend.count(descriptor.table, &filter).await? > 0)
    }

    /// Checks every foreign key and morph pair of `row` that differs from
    /// `previous`.
    async fn check_row_references<E: Entity>(
        &self,
        scope: &Scope,
        row: &(dyn Columns + Sync),
        previous: Option<&(dyn Columns + Sync)>,
    ) -> Result<(), Error> {
        let changed = |column: &str| match previous {
            Some(previous) => previous.column(column) != row.column(column),
            None => true,
        };
        let team_id = row
            .column("team_id")
            .and_then(|value| value.as_int())
            .or_else(|| scope.team_id());
        for reference in references_of(&Descriptor::of::<E>()) {
            if !changed(reference.column) {
                continue;
            }
            let Some(Value::Int(id)) = row.column(reference.column) else {
                continue;
            };
            if !self.exists(reference.target, id, team_id).await? {
                tracing::debug!(
                    entity = E::TABLE,
                    column = reference.column,
                    id,
                    "dangling reference"
                );
                return Err(Error::ReferentialIntegrity {
                    entity: E::TABLE,
                    column: reference.column.to_owned(),
                    target: reference.target.to_string(),
                });
            }
        }
        for morph in E::MORPHS {
            if !changed(morph.type_column) && !changed(morph.id_column) {
                continue;
            }
            let Some(target) = MorphRef::from_row(row, morph)? else {
                continue;
            };
            if !self.exists(target.kind, target.id, team_id).await? {
                return Err(Error::ReferentialIntegrity {
                    entity: E::TABLE,
                    column: morph.id_column.to_owned(),
                    target: target.kind.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Fails with [`Error::InUse`] while any row, trashed or not, still points
    /// at `kind`/`id`.
    async fn ensure_not_referenced(&self, kind: EntityKind, id: i64) -> Result<(), Error> {
        for descriptor in models::descriptors() {
            for reference in references_of(&descriptor) {
                if reference.target != kind {
                    continue;
                }
                let filter =
                    Filter::new().and(Condition::Eq(reference.column.into(), Value::Int(id)));
                if self.backend.count(descriptor.table, &filter).await? > 0 {
                    return Err(Error::InUse {
                        entity: kind.table(),
                        id,
                        referenced_by: format!("{}.{}", descriptor.table, reference.column),
                    });
                }
            }
            for morph in descriptor.morphs {
                let names: Vec<Value> = kind.stored_names().into_iter().map(Value::Text).collect();
                let filter = Filter::new()
                    .and(Condition::In(morph.type_column.into(), names))
                    .and(Condition::Eq(morph.id_column.into(), Value::Int(id)));
                if self.backend.count(descriptor.table, &filter).await? > 0 {
                    return Err(Error::InUse {
                        entity: kind.table(),
                        id,
                        referenced_by: format!("{}.{}", descriptor.table, morph.id_column),
                    });
                }
            }
        }
        Ok(())
    }

    fn notify<E: Entity>(&self, record: &E, action: WriteAction) {
        self.hooks.dispatch(WriteEvent {
            kind: E::KIND,
            id: record.id(),
            team_id: record.column("team_id").and_then(|value| value.as_int()),
            action,
        });
    }

    fn reject_append_only<E: Entity>(operation: &str) -> Result<(), Error> {
        if E::MUTABILITY == Mutability::AppendOnly {
            tracing::warn!(entity = E::TABLE, operation, "append-only table");
            return Err(Error::AppendOnly(E::TABLE));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, scope, draft), fields(entity = E::TABLE))]
    pub async fn insert<E: Entity>(&self, scope: &Scope, mut draft: E::Draft) -> Result<E, Error> {
        if let Some(team_id) = scope.team_id() {
            E::assign_team(&mut draft, team_id);
        }
        scope.check_write(&Descriptor::of::<E>(), &draft)?;
        morph::canonicalize(&mut draft, E::MORPHS)?;
        E::validate(&draft, &self.reference)?;
        self.check_row_references::<E>(scope, &draft, None).await?;
        let record = self.backend.insert::<E>(draft, now()).await?;
        tracing::debug!(id = record.id(), "inserted");
        self.notify(&record, WriteAction::Created);
        Ok(record)
    }

    #[tracing::instrument(skip(self, scope, record), fields(entity = E::TABLE, id = record.id()))]
    pub async fn update<E: Entity>(&self, scope: &Scope, mut record: E) -> Result<E, Error> {
        Self::reject_append_only::<E>("update")?;
        let existing = self
            .find_with_trashed::<E>(scope, record.id())
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: E::TABLE,
                id: record.id().to_string(),
            })?;
        if existing.column("team_id") != record.column("team_id") {
            tracing::warn!("attempt to move a row to another team");
            return Err(Error::CrossTenantWrite { entity: E::TABLE });
        }
        scope.check_write(&Descriptor::of::<E>(), &record)?;
        for column in ["created_at", "deleted_at"] {
            if let Some(value) = existing.column(column) {
                record.set_column(column, value)?;
            }
        }
        record.set_column("updated_at", Value::Timestamp(jiff::Timestamp::now()))?;
        morph::canonicalize(&mut record, E::MORPHS)?;
        E::validate(&record, &self.reference)?;
        self.check_row_references::<E>(scope, &record, Some(&existing))
            .await?;
        let record = self.backend.update(&record).await?;
        self.notify(&record, WriteAction::Updated);
        Ok(record)
    }

    /// Deletes a row. Soft-deleting kinds only stamp `deleted_at`; others are
    /// removed once nothing references them.
    #[tracing::instrument(skip(self, scope), fields(entity = E::TABLE))]
    pub async fn delete<E: Entity>(&self, scope: &Scope, id: i64) -> Result<(), Error> {
        Self::reject_append_only::<E>("delete")?;
        let record = self.get::<E>(scope, id).await?;
        if E::SOFT_DELETES {
            let at = now();
            self.backend.set_deleted_at(E::TABLE, id, Some(at), at).await?;
        } else {
            self.ensure_not_referenced(E::KIND, id).await?;
            self.backend.delete(E::TABLE, id).await?;
        }
        self.notify(&record, WriteAction::Deleted);
        Ok(())
    }

    /// Clears `deleted_at` on a trashed row.
    #[tracing::instrument(skip(self, scope), fields(entity = E::TABLE))]
    pub async fn restore<E: Entity>(&self, scope: &Scope, id: i64) -> Result<E, Error> {
        if !E::SOFT_DELETES {
            return Err(Error::NotSoftDeletable(E::TABLE));
        }
        let record = self
            .find_with_trashed::<E>(scope, id)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: E::TABLE,
                id: id.to_string(),
            })?;
        if record.column("deleted_at") == Some(Value::Null) {
            return Ok(record);
        }
        self.backend.set_deleted_at(E::TABLE, id, None, now()).await?;
        let record = self.get::<E>(scope, id).await?;
        self.notify(&record, WriteAction::Restored);
        Ok(record)
    }

    #[tracing::instrument(skip(self, scope), fields(entity = E::TABLE))]
    pub async fn force_delete<E: Entity>(&self, scope: &Scope, id: i64) -> Result<(), Error> {
        Self::reject_append_only::<E>("force_delete")?;
        let record = self
            .find_with_trashed::<E>(scope, id)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: E::TABLE,
                id: id.to_string(),
            })?;
        self.ensure_not_referenced(E::KIND, id).await?;
        self.backend.delete(E::TABLE, id).await?;
        self.notify(&record, WriteAction::ForceDeleted);
        Ok(())
    }
}
