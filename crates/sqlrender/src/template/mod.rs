//! SQL template rendering on top of MiniJinja.
//!
//! Templates are ordinary Jinja text with two extra functions:
//!
//! - `{{ bind(value) }}` binds a value and emits its placeholder. Lists expand
//!   to `(p1, p2, ...)`; an empty list emits `(NULL)`.
//! - `{{ identifier(name) }}` emits a quoted, optionally schema-qualified
//!   identifier such as `"public"."users"`.
//!
//! ```jinja
//! SELECT {{ identifier(column) }}
//! FROM {{ identifier(table) }}
//! WHERE id IN {{ bind(ids) }}
//! {% if active is defined %}AND active = {{ bind(active) }}{% endif %}
//! ```
//!
//! ## Template Sources
//!
//! [`Renderer::render_str`] takes template text directly.
//! [`Renderer::render_template`] takes a name and resolves it to a file: the
//! name as a path first, then each search path in the order added. See
//! [`loader`] for details.
//!
//! ## Key Types
//!
//! - [`Renderer`]: long-lived configuration, one binder per render
//! - [`RenderedQuery`]: rendered SQL plus arguments in placeholder order
//! - [`FunctionTable`]: custom callables exposed to templates

mod functions;
pub mod loader;
mod renderer;

pub use functions::FunctionTable;
pub use loader::{find_template, load_template, read_template};
pub use renderer::{RenderedQuery, Renderer};
