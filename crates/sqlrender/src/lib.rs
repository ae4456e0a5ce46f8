//! # sqlrender - SQL from templates, with dialect-aware binding
//!
//! `sqlrender` turns a Jinja template into a SQL string whose parameter
//! placeholders match a target database, plus the ordered list of arguments
//! to pass alongside it to a query executor.
//!
//! ## Core Concepts
//!
//! - [`Dialect`]: placeholder (`$1`, `@p1`, `:1`, `?`) and quoting conventions
//! - [`ArgumentBinder`]: per-render argument list behind `bind` and `identifier`
//! - [`Renderer`]: long-lived configuration (default dialect, search paths,
//!   custom functions); one fresh binder per render
//! - [`RendererConfig`]: renderer settings loaded from YAML or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sqlrender::{Dialect, Renderer};
//!
//! let renderer = Renderer::new(Dialect::Postgres);
//! let template = "SELECT * FROM users WHERE id IN {{ bind(ids) }} AND active = {{ bind(active) }}";
//!
//! let query = renderer
//!     .render_str(template, &json!({ "ids": [1, 2, 3], "active": true }))
//!     .unwrap();
//! assert_eq!(query.sql, "SELECT * FROM users WHERE id IN ($1, $2, $3) AND active = $4");
//!
//! let query = renderer
//!     .render_str_with_dialect(template, &json!({ "ids": [1, 2, 3], "active": true }), Dialect::SqlServer)
//!     .unwrap();
//! assert_eq!(query.sql, "SELECT * FROM users WHERE id IN (@p1, @p2, @p3) AND active = @p4");
//! assert_eq!(query.args.len(), 4);
//! ```
//!
//! ## Identifiers
//!
//! `identifier` accepts only `[A-Za-z0-9._]`. Anything else aborts the render
//! with [`RenderError::InvalidIdentifier`], which marks a template bug rather
//! than a data problem:
//!
//! ```rust
//! use serde_json::json;
//! use sqlrender::{Dialect, Renderer};
//!
//! let renderer = Renderer::new(Dialect::MySql);
//! let ok = renderer.render_str("SELECT * FROM {{ identifier(t) }}", &json!({ "t": "app.users" })).unwrap();
//! assert_eq!(ok.sql, "SELECT * FROM `app`.`users`");
//!
//! let err = renderer.render_str("SELECT * FROM {{ identifier(t) }}", &json!({ "t": "users; --" })).unwrap_err();
//! assert!(err.is_template_bug());
//! ```

mod binder;
pub mod config;
mod dialect;
mod error;
pub mod prelude;
pub mod template;

pub use binder::{ArgumentBinder, InvalidIdentifier, EMPTY_LIST};
pub use config::{ConfigError, RendererConfig};
pub use dialect::{Dialect, UnknownDialect};
pub use error::RenderError;
pub use template::{FunctionTable, RenderedQuery, Renderer};

// Template values are minijinja values; re-exported so callers need not
// depend on minijinja directly.
pub use minijinja::Value;
