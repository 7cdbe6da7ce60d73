use super::Backend;
use crate::{
    customer::Customer,
    entity::Entity,
    merge::{MergePayload, MergePlan, COLUMN_TARGETS, MORPH_TARGETS, PIVOT_TARGETS},
    models::{self, Company, ContactMergeLog, People},
    query::{Condition, Direction, Filter, Select},
    value::{Columns, Value},
    Error,
};
use std::{
    any::Any,
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

pub(crate) type Tables = HashMap<&'static str, Box<dyn ErasedTable>>;

/// Table operations that do not need the record type.
pub(crate) trait ErasedTable: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn boxed_clone(&self) -> Box<dyn ErasedTable>;

    fn rows(&self) -> Box<dyn Iterator<Item = &dyn Columns> + '_>;

    fn set_deleted_at(
        &mut self,
        id: i64,
        deleted_at: Option<jiff_diesel::Timestamp>,
        now: jiff_diesel::Timestamp,
    ) -> Result<bool, Error>;

    fn remove(&mut self, id: i64) -> bool;

    /// Applies `changes` to every matching row and returns their ids.
    fn update_where(
        &mut self,
        filter: &Filter,
        changes: &[(&str, Value)],
        now: jiff_diesel::Timestamp,
    ) -> Result<Vec<i64>, Error>;

    /// Removes every matching row and returns a JSON snapshot of each.
    fn remove_where(&mut self, filter: &Filter) -> Vec<serde_json::Value>;
}

pub(crate) struct Table<E> {
    next_id: i64,
    rows: BTreeMap<i64, E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    fn insert(&mut self, draft: E::Draft, now: jiff_diesel::Timestamp) -> Result<E, Error> {
        let record = E::from_draft(self.next_id + 1, draft, now);
        self.check_unique(&record)?;
        self.next_id += 1;
        self.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    fn replace(&mut self, record: E) -> Result<E, Error> {
        if !self.rows.contains_key(&record.id()) {
            return Err(Error::NotFound {
                entity: E::TABLE,
                id: record.id().to_string(),
            });
        }
        self.check_unique(&record)?;
        self.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    /// Unique groups hold across trashed rows too; NULLs never collide.
    fn check_unique(&self, candidate: &E) -> Result<(), Error> {
        for group in E::UNIQUE {
            let key: Vec<Value> = group
                .iter()
                .map(|column| candidate.column(column).unwrap_or(Value::Null))
                .collect();
            if key.iter().any(Value::is_null) {
                continue;
            }
            let taken = self.rows.values().any(|row| {
                row.id() != candidate.id()
                    && group
                        .iter()
                        .zip(&key)
                        .all(|(column, value)| row.column(column).as_ref() == Some(value))
            });
            if taken {
                return Err(Error::Duplicate {
                    entity: E::TABLE,
                    columns: group.join(", "),
                });
            }
        }
        Ok(())
    }
}

impl<E: Entity> ErasedTable for Table<E> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn boxed_clone(&self) -> Box<dyn ErasedTable> {
        Box::new(Table::<E> {
            next_id: self.next_id,
            rows: self.rows.clone(),
        })
    }

    fn rows(&self) -> Box<dyn Iterator<Item = &dyn Columns> + '_> {
        Box::new(self.rows.values().map(|row| row as &dyn Columns))
    }

    fn set_deleted_at(
        &mut self,
        id: i64,
        deleted_at: Option<jiff_diesel::Timestamp>,
        now: jiff_diesel::Timestamp,
    ) -> Result<bool, Error> {
        let Some(row) = self.rows.get_mut(&id) else {
            return Ok(false);
        };
        let deleted_at = deleted_at.map_or(Value::Null, |at| Value::Timestamp(at.to_jiff()));
        row.set_column("deleted_at", deleted_at)?;
        row.set_column("updated_at", Value::Timestamp(now.to_jiff()))?;
        Ok(true)
    }

    fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn update_where(
        &mut self,
        filter: &Filter,
        changes: &[(&str, Value)],
        now: jiff_diesel::Timestamp,
    ) -> Result<Vec<i64>, Error> {
        let targets: Vec<E> = self
            .rows
            .values()
            .filter(|row| filter.matches(*row))
            .cloned()
            .collect();
        let mut ids = Vec::with_capacity(targets.len());
        for mut row in targets {
            for (column, value) in changes {
                row.set_column(column, value.clone())?;
            }
            row.set_column("updated_at", Value::Timestamp(now.to_jiff()))?;
            ids.push(row.id());
            self.replace(row)?;
        }
        Ok(ids)
    }

    fn remove_where(&mut self, filter: &Filter) -> Vec<serde_json::Value> {
        let ids: Vec<i64> = self
            .rows
            .values()
            .filter(|row| filter.matches(*row))
            .map(Entity::id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.rows.remove(&id))
            .map(|row| serde_json::Value::Object(crate::value::to_json_map(&row, E::COLUMNS)))
            .collect()
    }
}

struct State {
    tables: Tables,
    customers: Vec<Customer>,
}

#[derive(Clone)]
pub struct MemoryBackend {
    state: Arc<RwLock<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                tables: models::empty_tables(),
                customers: Vec::new(),
            })),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend").finish_non_exhaustive()
    }
}

fn erased<'t>(tables: &'t Tables, table: &str) -> Result<&'t dyn ErasedTable, Error> {
    tables
        .get(table)
        .map(|table| table.as_ref())
        .ok_or_else(|| Error::UnknownTable(table.to_owned()))
}

fn erased_mut<'t>(tables: &'t mut Tables, table: &str) -> Result<&'t mut dyn ErasedTable, Error> {
    match tables.get_mut(table) {
        Some(table) => Ok(table.as_mut()),
        None => Err(Error::UnknownTable(table.to_owned())),
    }
}

fn typed<E: Entity>(tables: &Tables) -> Result<&Table<E>, Error> {
    erased(tables, E::TABLE)?
        .as_any()
        .downcast_ref::<Table<E>>()
        .ok_or_else(|| Error::UnknownTable(E::TABLE.to_owned()))
}

fn typed_mut<E: Entity>(tables: &mut Tables) -> Result<&mut Table<E>, Error> {
    erased_mut(tables, E::TABLE)?
        .as_any_mut()
        .downcast_mut::<Table<E>>()
        .ok_or_else(|| Error::UnknownTable(E::TABLE.to_owned()))
}

/// Values of `column` over the rows of `table` matching `filter`.
fn column_values(
    tables: &Tables,
    table: &str,
    filter: &Filter,
    column: &str,
) -> Result<Vec<Value>, Error> {
    Ok(erased(tables, table)?
        .rows()
        .filter(|row| filter.matches(*row))
        .filter_map(|row| row.column(column))
        .filter(|value| !value.is_null())
        .collect())
}

fn build_customers(tables: &Tables) -> Result<Vec<Customer>, Error> {
    let companies = typed::<Company>(tables)?
        .rows
        .values()
        .filter(|company| !company.is_trashed())
        .map(Customer::from_company);
    let people = typed::<People>(tables)?
        .rows
        .values()
        .filter(|person| !person.is_trashed())
        .map(Customer::from_people);
    Ok(companies.chain(people).collect())
}

fn apply_merge(tables: &mut Tables, plan: &MergePlan) -> Result<ContactMergeLog, Error> {
    let mut payload = MergePayload {
        duplicate: plan.duplicate.clone(),
        ..MergePayload::default()
    };
    let names: Vec<Value> = plan.people_names.iter().cloned().map(Value::Text).collect();

    for (table, column) in COLUMN_TARGETS {
        let filter = Filter::new()
            .and(Condition::Eq((*column).into(), Value::Int(plan.duplicate_id)))
            .and(Condition::Eq("team_id".into(), Value::Int(plan.team_id)));
        let ids = erased_mut(tables, table)?.update_where(
            &filter,
            &[(column, Value::Int(plan.primary_id))],
            plan.now,
        )?;
        payload.record_moved(table, column, ids);
    }

    for target in MORPH_TARGETS {
        let owned_by = |id: i64| {
            Filter::new()
                .and(Condition::In(target.type_column.into(), names.clone()))
                .and(Condition::Eq(target.id_column.into(), Value::Int(id)))
                .and(Condition::Eq("team_id".into(), Value::Int(plan.team_id)))
        };
        if let Some(unique_with) = target.unique_with {
            let primary = owned_by(plan.primary_id);
            let taken = column_values(tables, target.table, &primary, unique_with)?;
            let conflicts =
                owned_by(plan.duplicate_id).and(Condition::In(unique_with.into(), taken));
            let dropped = erased_mut(tables, target.table)?.remove_where(&conflicts);
            payload.record_dropped(target.table, dropped);
        }
        let ids = erased_mut(tables, target.table)?.update_where(
            &owned_by(plan.duplicate_id),
            &[
                (target.type_column, Value::from(People::KIND.discriminator())),
                (target.id_column, Value::Int(plan.primary_id)),
            ],
            plan.now,
        )?;
        payload.record_moved(target.table, target.id_column, ids);
    }

    for (table, other) in PIVOT_TARGETS {
        let of = |id: i64| {
            Filter::new()
                .and(Condition::Eq("people_id".into(), Value::Int(id)))
                .and(Condition::Eq("team_id".into(), Value::Int(plan.team_id)))
        };
        let taken = column_values(tables, table, &of(plan.primary_id), other)?;
        let conflicts = of(plan.duplicate_id).and(Condition::In((*other).into(), taken));
        let dropped = erased_mut(tables, table)?.remove_where(&conflicts);
        payload.record_dropped(table, dropped);
        let ids = erased_mut(tables, table)?.update_where(
            &of(plan.duplicate_id),
            &[("people_id", Value::Int(plan.primary_id))],
            plan.now,
        )?;
        payload.record_moved(table, "people_id", ids);
    }

    let people = erased_mut(tables, People::TABLE)?;
    if !people.set_deleted_at(plan.duplicate_id, Some(plan.now), plan.now)? {
        return Err(Error::NotFound {
            entity: People::TABLE,
            id: plan.duplicate_id.to_string(),
        });
    }
    let draft = plan.log_draft(&payload)?;
    typed_mut::<ContactMergeLog>(tables)?.insert(draft, plan.now)
}

impl MemoryBackend {
    fn read<T>(&self, f: impl FnOnce(&State) -> Result<T, Error>) -> Result<T, Error> {
        let state = self.state.read().map_err(|_| Error::Poisoned)?;
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut State) -> Result<T, Error>) -> Result<T, Error> {
        let mut state = self.state.write().map_err(|_| Error::Poisoned)?;
        f(&mut state)
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn select<E: Entity>(&self, select: &Select) -> Result<Vec<E>, Error> {
        self.read(|state| {
            let mut rows: Vec<E> = typed::<E>(&state.tables)?
                .rows
                .values()
                .filter(|row| select.filter.matches(*row))
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                select
                    .order
                    .iter()
                    .map(|(column, direction)| {
                        let a = a.column(column).unwrap_or(Value::Null);
                        let b = b.column(column).unwrap_or(Value::Null);
                        match direction {
                            Direction::Asc => a.sort_cmp(&b),
                            Direction::Desc => b.sort_cmp(&a),
                        }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            if let Some(limit) = select.limit {
                rows.truncate(usize::try_from(limit).unwrap_or(0));
            }
            Ok(rows)
        })
    }

    async fn count(&self, table: &'static str, filter: &Filter) -> Result<i64, Error> {
        self.read(|state| {
            let count = erased(&state.tables, table)?
                .rows()
                .filter(|row| filter.matches(*row))
                .count();
            Ok(i64::try_from(count).unwrap_or(i64::MAX))
        })
    }

    async fn insert<E: Entity>(
        &self,
        draft: E::Draft,
        now: jiff_diesel::Timestamp,
    ) -> Result<E, Error> {
        self.write(|state| typed_mut::<E>(&mut state.tables)?.insert(draft, now))
    }

    async fn update<E: Entity>(&self, record: &E) -> Result<E, Error> {
        self.write(|state| typed_mut::<E>(&mut state.tables)?.replace(record.clone()))
    }

    async fn set_deleted_at(
        &self,
        table: &'static str,
        id: i64,
        deleted_at: Option<jiff_diesel::Timestamp>,
        now: jiff_diesel::Timestamp,
    ) -> Result<bool, Error> {
        self.write(|state| {
            erased_mut(&mut state.tables, table)?.set_deleted_at(id, deleted_at, now)
        })
    }

    async fn delete(&self, table: &'static str, id: i64) -> Result<bool, Error> {
        self.write(|state| Ok(erased_mut(&mut state.tables, table)?.remove(id)))
    }

    async fn customers(&self, filter: &Filter) -> Result<Vec<Customer>, Error> {
        self.read(|state| {
            Ok(state
                .customers
                .iter()
                .filter(|customer| filter.matches(*customer))
                .cloned()
                .collect())
        })
    }

    async fn refresh_customers(&self) -> Result<(), Error> {
        self.write(|state| {
            state.customers = build_customers(&state.tables)?;
            Ok(())
        })
    }

    async fn merge_contacts(&self, plan: MergePlan) -> Result<ContactMergeLog, Error> {
        self.write(|state| {
            let mut scratch: Tables = state
                .tables
                .iter()
                .map(|(name, table)| (*name, table.boxed_clone()))
                .collect();
            let log = apply_merge(&mut scratch, &plan)?;
            state.tables = scratch;
            Ok(log)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTag, Tag};

    fn now() -> jiff_diesel::Timestamp {
        jiff::Timestamp::UNIX_EPOCH.into()
    }

    fn tag(team_id: i64, slug: &str) -> NewTag {
        NewTag {
            team_id,
            name: slug.to_uppercase(),
            slug: slug.into(),
            color: None,
        }
    }

    #[test]
    fn ids_are_assigned_sequentially() {
        let mut table = Table::<Tag>::default();
        assert_eq!(table.insert(tag(1, "a"), now()).unwrap().id, 1);
        assert_eq!(table.insert(tag(1, "b"), now()).unwrap().id, 2);
    }

    #[test]
    fn unique_groups_are_enforced_per_table() {
        let mut table = Table::<Tag>::default();
        table.insert(tag(1, "vip"), now()).unwrap();
        table.insert(tag(2, "vip"), now()).unwrap();
        let err = table.insert(tag(1, "vip"), now()).unwrap_err();
        assert!(matches!(
            err,
            Error::Duplicate { entity: "tags", ref columns } if columns == "team_id, slug"
        ));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.next_id, 2);
    }

    #[test]
    fn remove_where_snapshots_removed_rows() {
        let mut table = Table::<Tag>::default();
        table.insert(tag(1, "a"), now()).unwrap();
        table.insert(tag(2, "b"), now()).unwrap();
        let second_team = Filter::new().and(Condition::Eq("team_id".into(), Value::Int(2)));
        let removed = table.remove_where(&second_team);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0]["slug"], serde_json::json!("b"));
        assert_eq!(table.rows.len(), 1);
    }
}
