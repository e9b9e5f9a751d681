//! MyBatis-style mapper files and a SQLite executor for dynsql
//! templates.
//!
//! `dynsql-mapper` keeps SQL out of application code: queries live in
//! XML mapper files, get loaded into a registry at startup, and are
//! executed by name with JSON parameters.
//!
//! # Architecture
//!
//! - **Registry** - Loads `*.xml` mapper files from a directory and
//!   indexes raw query fragments by module and id
//! - **Executor** - Resolves a fragment against call parameters,
//!   rewrites `:name` placeholders into binds and runs the statement
//!   on a `sqlx` SQLite pool
//!
//! Template semantics (`<if>`, `<choose>`, `<where>`, condition
//! evaluation) live in [`dynsql_core`].
//!
//! # Example
//!
//! ```rust,no_run
//! use dynsql_mapper::prelude::*;
//! use serde_json::json;
//! use sqlx::sqlite::SqlitePoolOptions;
//!
//! # async fn run() -> Result<()> {
//! let registry = MapperRegistry::load_dir("mappers")?;
//! let pool = SqlitePoolOptions::new().connect("sqlite://app.db").await?;
//! let executor = QueryExecutor::new(pool, registry);
//!
//! let jobs = executor
//!     .query("jobs", "find_by_status")
//!     .bind("status", json!(1))
//!     .fetch_all()
//!     .await?;
//! # let _ = jobs;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod registry;

pub use error::{MapperError, Result};
pub use executor::{Query, QueryExecutor};
pub use registry::MapperRegistry;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{MapperError, Result};
    pub use crate::executor::{Query, QueryExecutor};
    pub use crate::registry::MapperRegistry;
    pub use dynsql_core::{ParamMap, Template};
}
