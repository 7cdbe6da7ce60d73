use super::Backend;
use crate::{
    customer::Customer,
    entity::Entity,
    merge::{MergePayload, MergePlan, COLUMN_TARGETS, MORPH_TARGETS, PIVOT_TARGETS},
    models::{ContactMergeLog, People},
    query::{Condition, Direction, Filter, Select},
    value::Value,
    Error,
};
use diesel::{
    pg::Pg,
    query_builder::{BoxedSqlQuery, SqlQuery},
    result::{DatabaseErrorKind, Error as DieselError},
    sql_types::{Array, BigInt, Bool, Date, Jsonb, Nullable, Numeric, Text, Timestamptz},
};
use diesel_async::{
    pooled_connection::{mobc::Pool, AsyncDieselConnectionManager},
    scoped_futures::ScopedFutureExt,
    AsyncConnection, AsyncPgConnection, RunQueryDsl,
};

type Boxed<'f> = BoxedSqlQuery<'f, Pg, SqlQuery>;

#[derive(diesel::QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(diesel::QueryableByName)]
struct IdRow {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

#[derive(diesel::QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Jsonb)]
    row: serde_json::Value,
}

fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table(name: &str) -> String {
    format!("crm.{}", ident(name))
}

fn bind_value(query: Boxed<'_>, value: Value) -> Boxed<'_> {
    match value {
        Value::Null => query.bind::<Nullable<Text>, _>(None::<String>),
        Value::Int(v) => query.bind::<BigInt, _>(v),
        Value::Bool(v) => query.bind::<Bool, _>(v),
        Value::Text(v) => query.bind::<Text, _>(v),
        Value::Decimal(v) => query.bind::<Numeric, _>(v),
        Value::Timestamp(v) => query.bind::<Timestamptz, _>(jiff_diesel::Timestamp::from(v)),
        Value::Date(v) => query.bind::<Date, _>(jiff_diesel::Date::from(v)),
        Value::Json(v) => query.bind::<Jsonb, _>(v),
    }
}

/// Renders a filter as a `WHERE` clause with `$n` placeholders.
struct Sql {
    text: String,
    binds: Vec<Value>,
}

impl Sql {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            binds: Vec::new(),
        }
    }

    fn placeholder(&mut self, value: Value) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }

    fn condition(&mut self, condition: &Condition) -> String {
        let column = ident(condition.column());
        match condition {
            Condition::Eq(_, Value::Null) | Condition::IsNull(_) => format!("{column} IS NULL"),
            Condition::NotNull(_) => format!("{column} IS NOT NULL"),
            Condition::Eq(_, value) => format!("{column} = {}", self.placeholder(value.clone())),
            Condition::In(_, values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .filter(|value| !value.is_null())
                    .map(|value| self.placeholder(value.clone()))
                    .collect();
                if placeholders.is_empty() {
                    "FALSE".to_owned()
                } else {
                    format!("{column} IN ({})", placeholders.join(", "))
                }
            }
            Condition::JsonContains(_, needle) => {
                format!("{column} @> {}", self.placeholder(Value::Json(needle.clone())))
            }
        }
    }

    fn filter(mut self, filter: &Filter) -> Self {
        let clauses: Vec<String> = filter
            .conditions()
            .iter()
            .map(|condition| self.condition(condition))
            .collect();
        if !clauses.is_empty() {
            self.text.push_str(" WHERE ");
            self.text.push_str(&clauses.join(" AND "));
        }
        self
    }

    fn order(mut self, order: &[(String, Direction)]) -> Self {
        if !order.is_empty() {
            let terms: Vec<String> = order
                .iter()
                .map(|(column, direction)| {
                    let direction = match direction {
                        Direction::Asc => "ASC",
                        Direction::Desc => "DESC",
                    };
                    format!("{} {direction}", ident(column))
                })
                .collect();
            self.text.push_str(" ORDER BY ");
            self.text.push_str(&terms.join(", "));
        }
        self
    }

    fn limit(mut self, limit: Option<i64>) -> Self {
        if let Some(limit) = limit {
            self.text.push_str(&format!(" LIMIT {}", limit.max(0)));
        }
        self
    }

    fn build(self) -> Boxed<'static> {
        tracing::trace!(sql = %self.text, binds = self.binds.len());
        self.binds
            .into_iter()
            .fold(diesel::sql_query(self.text).into_boxed(), bind_value)
    }
}

/// Maps constraint violations onto the store's error kinds.
fn write_error(entity: &'static str, err: DieselError) -> Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Error::Duplicate {
            entity,
            columns: info.constraint_name().unwrap_or("unique").to_owned(),
        },
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            Error::ReferentialIntegrity {
                entity,
                column: info.column_name().or(info.constraint_name()).unwrap_or("").to_owned(),
                target: info.details().unwrap_or("").to_owned(),
            }
        }
        err => err.into(),
    }
}

#[derive(Clone)]
pub struct PgBackend {
    pool: Pool<AsyncPgConnection>,
}

impl PgBackend {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<mobc::Connection<AsyncDieselConnectionManager<AsyncPgConnection>>, Error> {
        self.pool.get().await.map_err(Into::into)
    }
}

impl std::fmt::Debug for PgBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgBackend").finish_non_exhaustive()
    }
}

async fn apply_merge(
    conn: &mut AsyncPgConnection,
    plan: &MergePlan,
) -> Result<ContactMergeLog, Error> {
    let mut payload = MergePayload {
        duplicate: plan.duplicate.clone(),
        ..MergePayload::default()
    };

    for (name, column) in COLUMN_TARGETS {
        let sql = format!(
            "UPDATE {t} SET {c} = $1, updated_at = $2 WHERE {c} = $3 AND team_id = $4 RETURNING id",
            t = table(name),
            c = ident(column),
        );
        let rows: Vec<IdRow> = diesel::sql_query(sql)
            .bind::<BigInt, _>(plan.primary_id)
            .bind::<Timestamptz, _>(plan.now)
            .bind::<BigInt, _>(plan.duplicate_id)
            .bind::<BigInt, _>(plan.team_id)
            .load(conn)
            .await?;
        payload.record_moved(name, column, rows.into_iter().map(|row| row.id).collect());
    }

    for target in MORPH_TARGETS {
        let (kind, id) = (ident(target.type_column), ident(target.id_column));
        if let Some(unique_with) = target.unique_with {
            let sql = format!(
                "DELETE FROM {t} AS d WHERE d.{kind} = ANY($1) AND d.{id} = $2 \
                 AND d.team_id = $4 AND EXISTS (SELECT 1 FROM {t} AS p \
                 WHERE p.{kind} = ANY($1) AND p.{id} = $3 AND p.team_id = $4 \
                 AND p.{u} = d.{u}) RETURNING to_jsonb(d) AS row",
                t = table(target.table),
                u = ident(unique_with),
            );
            let rows: Vec<JsonRow> = diesel::sql_query(sql)
                .bind::<Array<Text>, _>(plan.people_names.clone())
                .bind::<BigInt, _>(plan.duplicate_id)
                .bind::<BigInt, _>(plan.primary_id)
                .bind::<BigInt, _>(plan.team_id)
                .load(conn)
                .await?;
            payload.record_dropped(target.table, rows.into_iter().map(|row| row.row).collect());
        }
        let sql = format!(
            "UPDATE {t} SET {kind} = $1, {id} = $2, updated_at = $3 \
             WHERE {kind} = ANY($4) AND {id} = $5 AND team_id = $6 RETURNING id",
            t = table(target.table),
        );
        let rows: Vec<IdRow> = diesel::sql_query(sql)
            .bind::<Text, _>(People::KIND.discriminator())
            .bind::<BigInt, _>(plan.primary_id)
            .bind::<Timestamptz, _>(plan.now)
            .bind::<Array<Text>, _>(plan.people_names.clone())
            .bind::<BigInt, _>(plan.duplicate_id)
            .bind::<BigInt, _>(plan.team_id)
            .load(conn)
            .await?;
        let ids = rows.into_iter().map(|row| row.id).collect();
        payload.record_moved(target.table, target.id_column, ids);
    }

    for (name, other) in PIVOT_TARGETS {
        let sql = format!(
            "DELETE FROM {t} AS d WHERE d.people_id = $1 AND d.team_id = $3 AND EXISTS \
             (SELECT 1 FROM {t} AS p WHERE p.people_id = $2 AND p.team_id = $3 \
             AND p.{o} = d.{o}) RETURNING to_jsonb(d) AS row",
            t = table(name),
            o = ident(other),
        );
        let rows: Vec<JsonRow> = diesel::sql_query(sql)
            .bind::<BigInt, _>(plan.duplicate_id)
            .bind::<BigInt, _>(plan.primary_id)
            .bind::<BigInt, _>(plan.team_id)
            .load(conn)
            .await?;
        payload.record_dropped(name, rows.into_iter().map(|row| row.row).collect());

        let sql = format!(
            "UPDATE {t} SET people_id = $1, updated_at = $2 \
             WHERE people_id = $3 AND team_id = $4 RETURNING id",
            t = table(name),
        );
        let rows: Vec<IdRow> = diesel::sql_query(sql)
            .bind::<BigInt, _>(plan.primary_id)
            .bind::<Timestamptz, _>(plan.now)
            .bind::<BigInt, _>(plan.duplicate_id)
            .bind::<BigInt, _>(plan.team_id)
            .load(conn)
            .await?;
        payload.record_moved(name, "people_id", rows.into_iter().map(|row| row.id).collect());
    }

    let trashed = diesel::sql_query(
        "UPDATE crm.people SET deleted_at = $1, updated_at = $1 \
         WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind::<Timestamptz, _>(plan.now)
    .bind::<BigInt, _>(plan.duplicate_id)
    .execute(conn)
    .await?;
    if trashed == 0 {
        return Err(Error::NotFound {
            entity: People::TABLE,
            id: plan.duplicate_id.to_string(),
        });
    }

    let draft = plan.log_draft(&payload)?;
    ContactMergeLog::pg_insert(conn, draft, plan.now)
        .await
        .map_err(|err| write_error(ContactMergeLog::TABLE, err))
}

#[async_trait::async_trait]
impl Backend for PgBackend {
    async fn select<E: Entity>(&self, select: &Select) -> Result<Vec<E>, Error> {
        let query = Sql::new(format!("SELECT * FROM {}", table(select.table)))
            .filter(&select.filter)
            .order(&select.order)
            .limit(select.limit)
            .build();
        let mut conn = self.connection().await?;
        Ok(query.load::<E>(&mut conn).await?)
    }

    async fn count(&self, name: &'static str, filter: &Filter) -> Result<i64, Error> {
        let query = Sql::new(format!("SELECT COUNT(*) AS count FROM {}", table(name)))
            .filter(filter)
            .build();
        let mut conn = self.connection().await?;
        let row: CountRow = query.get_result(&mut conn).await?;
        Ok(row.count)
    }

    async fn insert<E: Entity>(
        &self,
        draft: E::Draft,
        now: jiff_diesel::Timestamp,
    ) -> Result<E, Error> {
        let mut conn = self.connection().await?;
        E::pg_insert(&mut conn, draft, now)
            .await
            .map_err(|err| write_error(E::TABLE, err))
    }

    async fn update<E: Entity>(&self, record: &E) -> Result<E, Error> {
        let mut conn = self.connection().await?;
        match E::pg_update(&mut conn, record).await {
            Ok(record) => Ok(record),
            Err(DieselError::NotFound) => Err(Error::NotFound {
                entity: E::TABLE,
                id: record.id().to_string(),
            }),
            Err(err) => Err(write_error(E::TABLE, err)),
        }
    }

    async fn set_deleted_at(
        &self,
        name: &'static str,
        id: i64,
        deleted_at: Option<jiff_diesel::Timestamp>,
        now: jiff_diesel::Timestamp,
    ) -> Result<bool, Error> {
        let sql = format!(
            "UPDATE {} SET deleted_at = $1, updated_at = $2 WHERE id = $3",
            table(name)
        );
        let mut conn = self.connection().await?;
        let touched = diesel::sql_query(sql)
            .bind::<Nullable<Timestamptz>, _>(deleted_at)
            .bind::<Timestamptz, _>(now)
            .bind::<BigInt, _>(id)
            .execute(&mut conn)
            .await?;
        Ok(touched > 0)
    }

    async fn delete(&self, name: &'static str, id: i64) -> Result<bool, Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table(name));
        let mut conn = self.connection().await?;
        match diesel::sql_query(sql).bind::<BigInt, _>(id).execute(&mut conn).await {
            Ok(removed) => Ok(removed > 0),
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)) => {
                Err(Error::InUse {
                    entity: name,
                    id,
                    referenced_by: info.constraint_name().unwrap_or("").to_owned(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn customers(&self, filter: &Filter) -> Result<Vec<Customer>, Error> {
        let query = Sql::new("SELECT * FROM crm.customers_view")
            .filter(filter)
            .order(&[("uid".to_owned(), Direction::Asc)])
            .build();
        let mut conn = self.connection().await?;
        Ok(query.load::<Customer>(&mut conn).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn refresh_customers(&self) -> Result<(), Error> {
        let mut conn = self.connection().await?;
        diesel::sql_query("REFRESH MATERIALIZED VIEW CONCURRENTLY crm.customers_view")
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    #[tracing::instrument(
        skip(self, plan),
        fields(primary = plan.primary_id, duplicate = plan.duplicate_id)
    )]
    async fn merge_contacts(&self, plan: MergePlan) -> Result<ContactMergeLog, Error> {
        let mut conn = self.connection().await?;
        let conn: &mut AsyncPgConnection = &mut conn;
        conn.transaction(|conn| async move { apply_merge(conn, &plan).await }.scope_boxed())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_render_with_numbered_placeholders() {
        let filter = Filter::new()
            .and(Condition::Eq("team_id".into(), Value::Int(3)))
            .and(Condition::In(
                "status".into(),
                vec![Value::from("open"), Value::Null, Value::from("won")],
            ))
            .and(Condition::IsNull("deleted_at".into()));
        let sql = Sql::new("SELECT * FROM crm.\"opportunities\"")
            .filter(&filter)
            .order(&[("id".into(), Direction::Desc)])
            .limit(Some(5));
        assert_eq!(
            sql.text,
            "SELECT * FROM crm.\"opportunities\" WHERE \"team_id\" = $1 AND \"status\" IN ($2, $3) \
             AND \"deleted_at\" IS NULL ORDER BY \"id\" DESC LIMIT 5"
        );
        assert_eq!(sql.binds.len(), 3);
    }

    #[test]
    fn empty_in_lists_match_nothing() {
        let empty = Filter::new().and(Condition::In("id".into(), Vec::new()));
        let sql = Sql::new("SELECT 1").filter(&empty);
        assert_eq!(sql.text, "SELECT 1 WHERE FALSE");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(ident("values"), "\"values\"");
        assert_eq!(ident("a\"b"), "\"a\"\"b\"");
    }
}
