//! # dynsql-core
//!
//! Dynamic SQL template engine. A query is written once as SQL text
//! with embedded conditional markup, then resolved against a set of
//! named parameters to produce the final statement. Placeholders like
//! `:status` are left intact for the database driver; only the shape
//! of the statement is decided here.
//!
//! ## Markup
//!
//! - `<if test="...">` includes its body when the condition holds.
//! - `<choose>`/`<when>`/`<otherwise>` picks the first branch whose
//!   condition holds.
//! - `<where>` wraps its body in ` WHERE `, drops it entirely when
//!   empty, and strips one leading `AND`/`OR`.
//!
//! Conditions are evaluated against a small allow-listed expression
//! grammar. A condition that fails to parse or evaluate is false; it
//! can never abort resolution or reach a real interpreter.
//!
//! ## Example
//!
//! ```
//! use dynsql_core::{ParamMap, Template};
//! use serde_json::json;
//!
//! let template = Template::parse(
//!     "SELECT * FROM users<where><if test=\"status\"> AND status = :status</if></where>",
//! ).unwrap();
//!
//! let params: ParamMap = json!({ "status": 1 }).as_object().cloned().unwrap_or_default();
//! assert_eq!(template.resolve(&params), "SELECT * FROM users WHERE status = :status");
//!
//! let empty = ParamMap::new();
//! assert_eq!(template.resolve(&empty), "SELECT * FROM users");
//! ```
//!
//! Conditions can also be evaluated on their own:
//!
//! ```
//! use dynsql_core::expr;
//! use dynsql_core::ParamMap;
//! use serde_json::json;
//!
//! let params: ParamMap = json!({ "age": 30 }).as_object().cloned().unwrap_or_default();
//! assert!(expr::evaluate("age >= 18", &params));
//! assert!(!expr::evaluate("age.bit_length()", &params));
//! ```

pub mod engine;
pub mod error;
pub mod expr;
pub mod normalize;
pub mod params;
pub mod resolve;
pub mod template;

pub use error::TemplateError;
pub use expr::ExprError;
pub use params::ParamMap;
pub use template::{Node, Template, When};
