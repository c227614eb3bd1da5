//! PostgreSQL store: one table per resource, attributes kept as JSONB.

use super::ResourceStore;
use crate::config::{ResolvedModel, ResolvedResource};
use crate::error::AppError;
use crate::model::{Attributes, IdStrategy, Resource, ResourceId};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{ConnectOptions, Row};
use std::str::FromStr;
use uuid::Uuid;

const RETURNING: &str = "id::text AS id, attributes";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    /// Create the schema and one table per resource if missing.
    pub async fn ensure_tables(&self, model: &ResolvedModel) -> Result<(), AppError> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema));
        sqlx::query(&sql).execute(&self.pool).await?;
        for resource in &model.resources {
            let ddl = create_table_sql(&self.schema, resource);
            tracing::debug!(sql = %ddl, "ensure table");
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn table(&self, resource: &ResolvedResource) -> String {
        qualified_table(&self.schema, resource)
    }

    async fn fetch_optional(&self, sql: &str, id: &ResourceId, attributes: Option<Value>) -> Result<Option<PgRow>, AppError> {
        tracing::debug!(sql = %sql, id = %id, "query");
        let mut query = sqlx::query(sql).bind(id.to_string());
        if let Some(attributes) = attributes {
            query = query.bind(attributes);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn list(&self, resource: &ResolvedResource) -> Result<Vec<Resource>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at, id",
            RETURNING,
            self.table(resource)
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|row| row_to_resource(resource, row)).collect()
    }

    async fn get(&self, resource: &ResolvedResource, id: &ResourceId) -> Result<Option<Resource>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            RETURNING,
            self.table(resource),
            id_predicate(resource.id_strategy)
        );
        self.fetch_optional(&sql, id, None)
            .await?
            .map(|row| row_to_resource(resource, &row))
            .transpose()
    }

    async fn insert(&self, resource: &ResolvedResource, attributes: Attributes) -> Result<Resource, AppError> {
        let sql = insert_sql(&self.table(resource), resource.id_strategy);
        tracing::debug!(sql = %sql, "query");
        let attributes = Value::Object(attributes);
        let query = match resource.id_strategy {
            IdStrategy::Sequential => sqlx::query(&sql).bind(attributes),
            IdStrategy::Uuid => sqlx::query(&sql).bind(Uuid::new_v4().to_string()).bind(attributes),
        };
        let row = query.fetch_one(&self.pool).await?;
        row_to_resource(resource, &row)
    }

    async fn replace(
        &self,
        resource: &ResolvedResource,
        id: &ResourceId,
        attributes: Attributes,
    ) -> Result<Option<Resource>, AppError> {
        let sql = update_sql(&self.table(resource), resource.id_strategy, false);
        self.fetch_optional(&sql, id, Some(Value::Object(attributes)))
            .await?
            .map(|row| row_to_resource(resource, &row))
            .transpose()
    }

    async fn merge(
        &self,
        resource: &ResolvedResource,
        id: &ResourceId,
        attributes: Attributes,
    ) -> Result<Option<Resource>, AppError> {
        let sql = update_sql(&self.table(resource), resource.id_strategy, true);
        self.fetch_optional(&sql, id, Some(Value::Object(attributes)))
            .await?
            .map(|row| row_to_resource(resource, &row))
            .transpose()
    }

    async fn delete(&self, resource: &ResolvedResource, id: &ResourceId) -> Result<bool, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            self.table(resource),
            id_predicate(resource.id_strategy)
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        let result = sqlx::query(&sql).bind(id.to_string()).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn id_sql_type(strategy: IdStrategy) -> &'static str {
    match strategy {
        IdStrategy::Sequential => "bigint",
        IdStrategy::Uuid => "uuid",
    }
}

fn id_predicate(strategy: IdStrategy) -> String {
    format!("id = $1::{}", id_sql_type(strategy))
}

fn qualified_table(schema: &str, resource: &ResolvedResource) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(&resource.path_segment))
}

fn create_table_sql(schema: &str, resource: &ResolvedResource) -> String {
    let id_column = match resource.id_strategy {
        IdStrategy::Sequential => "id BIGSERIAL PRIMARY KEY",
        IdStrategy::Uuid => "id UUID PRIMARY KEY",
    };
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({}, attributes JSONB NOT NULL, \
         created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
        qualified_table(schema, resource),
        id_column
    )
}

fn insert_sql(table: &str, strategy: IdStrategy) -> String {
    match strategy {
        IdStrategy::Sequential => format!("INSERT INTO {} (attributes) VALUES ($1) RETURNING {}", table, RETURNING),
        IdStrategy::Uuid => format!(
            "INSERT INTO {} (id, attributes) VALUES ($1::uuid, $2) RETURNING {}",
            table, RETURNING
        ),
    }
}

fn update_sql(table: &str, strategy: IdStrategy, merge: bool) -> String {
    let value = if merge { "attributes || $2" } else { "$2" };
    format!(
        "UPDATE {} SET attributes = {}, updated_at = NOW() WHERE {} RETURNING {}",
        table,
        value,
        id_predicate(strategy),
        RETURNING
    )
}

fn row_to_resource(resource: &ResolvedResource, row: &PgRow) -> Result<Resource, AppError> {
    let raw_id: String = row.try_get("id")?;
    let id = resource
        .id_strategy
        .parse(&raw_id)
        .ok_or_else(|| AppError::Storage(format!("unexpected id '{}' in {}", raw_id, resource.path_segment)))?;
    let attributes = match row.try_get::<Value, _>("attributes")? {
        Value::Object(map) => map,
        other => {
            return Err(AppError::Storage(format!(
                "attributes of {}/{} is not an object: {}",
                resource.path_segment, id, other
            )))
        }
    };
    Ok(Resource {
        id,
        attributes: schema_order(resource, attributes),
    })
}

/// JSONB does not keep key order; restore declaration order, unknown keys last.
fn schema_order(resource: &ResolvedResource, mut attributes: Attributes) -> Attributes {
    let mut out = Attributes::new();
    for field in &resource.fields {
        if let Some(v) = attributes.remove(&field.name) {
            out.insert(field.name.clone(), v);
        }
    }
    out.extend(attributes);
    out
}

/// Create the database named in `database_url` if it does not exist (connects to `postgres` db).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Storage(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Storage("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
