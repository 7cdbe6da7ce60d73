use crate::{
    backend::Backend,
    entity::Entity,
    store::Store,
    tenant::Scope,
    value::{Columns, Value},
    Error,
};
use std::marker::PhantomData;

/// How soft-deleted rows take part in a read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trashed {
    #[default]
    Without,
    With,
    Only,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    In(String, Vec<Value>),
    IsNull(String),
    NotNull(String),
    /// JSON containment, `column @> value`.
    JsonContains(String, serde_json::Value),
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::Eq(column, _)
            | Condition::In(column, _)
            | Condition::IsNull(column)
            | Condition::NotNull(column)
            | Condition::JsonContains(column, _) => column,
        }
    }

    pub fn matches(&self, row: &dyn Columns) -> bool {
        let value = row.column(self.column()).unwrap_or(Value::Null);
        match self {
            Condition::Eq(_, Value::Null) | Condition::IsNull(_) => value.is_null(),
            Condition::Eq(_, expected) => !value.is_null() && value == *expected,
            Condition::In(_, expected) => !value.is_null() && expected.contains(&value),
            Condition::NotNull(_) => !value.is_null(),
            Condition::JsonContains(_, needle) => match value {
                Value::Json(haystack) => json_contains(&haystack, needle),
                _ => false,
            },
        }
    }
}

/// Postgres `jsonb @>` semantics.
pub(crate) fn json_contains(haystack: &serde_json::Value, needle: &serde_json::Value) -> bool {
    use serde_json::Value as Json;
    match (haystack, needle) {
        (Json::Object(haystack), Json::Object(needle)) => needle.iter().all(|(key, value)| {
            haystack
                .get(key)
                .is_some_and(|candidate| json_contains(candidate, value))
        }),
        (Json::Array(haystack), Json::Array(needle)) => needle.iter().all(|value| {
            haystack
                .iter()
                .any(|candidate| json_contains(candidate, value))
        }),
        (Json::Array(haystack), needle) if !needle.is_object() => {
            haystack.iter().any(|candidate| candidate == needle)
        }
        (haystack, needle) => haystack == needle,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, row: &dyn Columns) -> bool {
        self.conditions.iter().all(|condition| condition.matches(row))
    }

    pub(crate) fn with_trashed_mode(mut self, trashed: Trashed) -> Self {
        match trashed {
            Trashed::Without => self.push(Condition::IsNull("deleted_at".into())),
            Trashed::Only => self.push(Condition::NotNull("deleted_at".into())),
            Trashed::With => {}
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub table: &'static str,
    pub filter: Filter,
    pub order: Vec<(String, Direction)>,
    pub limit: Option<i64>,
}

impl Select {
    pub fn new(table: &'static str, filter: Filter) -> Self {
        Self {
            table,
            filter,
            order: Vec::new(),
            limit: None,
        }
    }

    pub(crate) fn check_columns(&self, entity: &'static str, known: &[&str]) -> Result<(), Error> {
        let unknown = self
            .filter
            .conditions()
            .iter()
            .map(Condition::column)
            .chain(self.order.iter().map(|(column, _)| column.as_str()))
            .find(|column| !known.contains(column));
        match unknown {
            Some(column) => Err(Error::UnknownColumn {
                entity,
                column: column.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

/// Builder for filtered reads of one entity under one scope.
pub struct Query<'s, B: Backend, E: Entity> {
    store: &'s Store<B>,
    scope: &'s Scope,
    filter: Filter,
    trashed: Trashed,
    order: Vec<(String, Direction)>,
    limit: Option<i64>,
    entity: PhantomData<fn() -> E>,
}

impl<'s, B: Backend, E: Entity> Query<'s, B, E> {
    pub(crate) fn new(store: &'s Store<B>, scope: &'s Scope) -> Self {
        Self {
            store,
            scope,
            filter: Filter::default(),
            trashed: Trashed::Without,
            order: Vec::new(),
            limit: None,
            entity: PhantomData,
        }
    }

    pub fn with_trashed(mut self) -> Self {
        self.trashed = Trashed::With;
        self
    }

    pub fn only_trashed(mut self) -> Self {
        self.trashed = Trashed::Only;
        self
    }

    pub fn trashed(mut self, trashed: Trashed) -> Self {
        self.trashed = trashed;
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter.push(Condition::Eq(column.to_owned(), value.into()));
        self
    }

    pub fn where_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filter.push(Condition::In(
            column.to_owned(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.filter.push(Condition::IsNull(column.to_owned()));
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.filter.push(Condition::NotNull(column.to_owned()));
        self
    }

    pub fn where_condition(mut self, condition: Condition) -> Self {
        self.filter.push(condition);
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order.push((column.to_owned(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub async fn load(self) -> Result<Vec<E>, Error> {
        self.store
            .select::<E>(self.scope, self.filter, self.trashed, self.order, self.limit)
            .await
    }

    pub async fn first(self) -> Result<Option<E>, Error> {
        Ok(self.limit(1).load().await?.into_iter().next())
    }

    pub async fn count(self) -> Result<i64, Error> {
        self.store
            .count::<E>(self.scope, self.filter, self.trashed)
            .await
    }
}
