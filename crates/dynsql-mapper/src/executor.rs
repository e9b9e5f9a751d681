//! Query execution against a SQLite pool.
//!
//! The executor looks a query up in the registry, resolves its
//! template with the call's parameters, rewrites `:name` placeholders
//! into positional binds and runs the statement through sqlx. Rows
//! come back as JSON objects keyed by column name, matching the
//! parameter representation on the way in.

use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, info};

use dynsql_core::params::{mask_params, ParamMap};
use dynsql_core::Template;

use crate::error::{MapperError, Result};
use crate::registry::MapperRegistry;

/// Executes registered queries against a SQLite pool.
pub struct QueryExecutor {
    pool: SqlitePool,
    registry: MapperRegistry,
}

impl QueryExecutor {
    /// Creates an executor over a pool and a loaded registry.
    #[must_use]
    pub fn new(pool: SqlitePool, registry: MapperRegistry) -> Self {
        Self { pool, registry }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    /// Starts a call against the query registered under `module`/`id`.
    #[must_use]
    pub fn query<'a>(&'a self, module: &'a str, id: &'a str) -> Query<'a> {
        Query {
            executor: self,
            module,
            id,
            params: ParamMap::new(),
            replacements: Vec::new(),
        }
    }
}

/// One prepared call against a registered query.
///
/// Built up with [`params`](Self::params), [`bind`](Self::bind) and
/// [`replace`](Self::replace), then run with one of the terminal
/// methods.
pub struct Query<'a> {
    executor: &'a QueryExecutor,
    module: &'a str,
    id: &'a str,
    params: ParamMap,
    replacements: Vec<(String, String)>,
}

impl Query<'_> {
    /// Merges a parameter map into this call. Later values win.
    #[must_use]
    pub fn params(mut self, params: &ParamMap) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Binds a single named parameter.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Adds a literal text replacement applied to the resolved SQL,
    /// e.g. an ORDER BY direction that cannot be a bind parameter.
    #[must_use]
    pub fn replace(mut self, token: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.replacements.push((token.into(), replacement.into()));
        self
    }

    /// Resolves the final SQL without executing it. Placeholders stay
    /// in `:name` form.
    pub fn render(&self) -> Result<String> {
        let fragment = self
            .executor
            .registry
            .lookup(self.module, self.id)
            .ok_or_else(|| MapperError::QueryNotFound {
                module: self.module.to_string(),
                id: self.id.to_string(),
            })?;
        let template = Template::parse(fragment)?;
        Ok(template.resolve_with(&self.params, &self.replacements))
    }

    /// Runs the query and returns all rows.
    pub async fn fetch_all(&self) -> Result<Vec<ParamMap>> {
        let (sql, binds) = self.prepare()?;
        let rows = bind_values(sqlx::query(&sql), &binds)
            .fetch_all(&self.executor.pool)
            .await?;
        rows.iter().map(row_to_map).collect()
    }

    /// Runs the query and returns the first row, if any.
    pub async fn fetch_optional(&self) -> Result<Option<ParamMap>> {
        let (sql, binds) = self.prepare()?;
        let row = bind_values(sqlx::query(&sql), &binds)
            .fetch_optional(&self.executor.pool)
            .await?;
        row.as_ref().map(row_to_map).transpose()
    }

    /// Runs a statement and returns the number of affected rows.
    pub async fn execute(&self) -> Result<u64> {
        let (sql, binds) = self.prepare()?;
        let result = bind_values(sqlx::query(&sql), &binds)
            .execute(&self.executor.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn prepare(&self) -> Result<(String, Vec<Value>)> {
        info!(module = %self.module, id = %self.id, "Executing query");
        let sql = self.render()?;
        debug!(sql = %sql, "Resolved SQL");
        debug!(params = ?mask_params(&self.params), "Query parameters");
        expand_placeholders(&sql, &self.params)
    }
}

/// Rewrites each `:name` placeholder to `?` and collects the bind
/// value for every occurrence, in order. Placeholders inside quoted
/// literals are left alone; a `:` preceded by a word character or by
/// another `:` (a `b::text` cast) stays literal too. A placeholder
/// without a matching parameter fails before anything reaches the
/// database.
fn expand_placeholders(sql: &str, params: &ParamMap) -> Result<(String, Vec<Value>)> {
    let mut out = String::with_capacity(sql.len());
    let mut binds = Vec::new();
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    if chars.peek() == Some(&q) {
                        out.push(q);
                        chars.next();
                    } else {
                        quote = None;
                    }
                }
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    out.push(c);
                }
                ':' if prev.is_none_or(|p| p != ':' && !p.is_alphanumeric() && p != '_')
                    && chars
                        .peek()
                        .is_some_and(|&n| n.is_alphabetic() || n == '_') =>
                {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let value = params
                        .get(&name)
                        .ok_or_else(|| MapperError::MissingParameter(name.clone()))?;
                    binds.push(value.clone());
                    out.push('?');
                    prev = name.chars().last();
                    continue;
                }
                _ => out.push(c),
            },
        }
        prev = Some(c);
    }

    Ok((out, binds))
}

/// Binds JSON values positionally. Composite values are bound as
/// their JSON text.
fn bind_values<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    values: &[Value],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    for value in values {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    query.bind(f)
                } else {
                    query.bind(n.to_string())
                }
            }
            Value::String(s) => query.bind(s.clone()),
            composite => query.bind(composite.to_string()),
        };
    }
    query
}

fn row_to_map(row: &SqliteRow) -> Result<ParamMap> {
    let mut map = ParamMap::new();
    for (idx, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), column_value(row, idx)?);
    }
    Ok(map)
}

/// Decodes one column by its SQLite storage class. REAL values that
/// have no JSON representation (NaN, infinity) become null; BLOBs
/// become lowercase hex strings.
fn column_value(row: &SqliteRow, idx: usize) -> Result<Value> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => serde_json::Number::from_f64(row.try_get::<f64, _>(idx)?)
            .map_or(Value::Null, Value::Number),
        "BLOB" => Value::String(hex_string(&row.try_get::<Vec<u8>, _>(idx)?)),
        _ => Value::String(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
