//! The long-lived SQL template renderer.
//!
//! A [`Renderer`] holds configuration (default dialect, search paths, custom
//! functions) and is reused across many renders. Every render builds its own
//! [`ArgumentBinder`] and MiniJinja environment, so concurrent renders on a
//! shared renderer never see each other's arguments.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use sqlrender::{Dialect, Renderer};
//!
//! let renderer = Renderer::new(Dialect::Postgres);
//! let query = renderer
//!     .render_str(
//!         "SELECT * FROM {{ identifier(table) }} WHERE id IN {{ bind(ids) }}",
//!         &json!({ "table": "public.users", "ids": [1, 2, 3] }),
//!     )
//!     .unwrap();
//!
//! assert_eq!(query.sql, r#"SELECT * FROM "public"."users" WHERE id IN ($1, $2, $3)"#);
//! assert_eq!(query.args.len(), 3);
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult};
use minijinja::{context, Value};
use serde::Serialize;
use tracing::debug;

use super::functions::{build_environment, lock, FunctionTable};
use super::loader;
use crate::binder::ArgumentBinder;
use crate::config::RendererConfig;
use crate::dialect::Dialect;
use crate::error::RenderError;

/// Name given to templates rendered from inline text.
const INLINE_TEMPLATE_NAME: &str = "<string>";

/// Rendered SQL text and its arguments, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

impl RenderedQuery {
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }

    /// Converts the arguments to JSON values, e.g. for drivers that accept
    /// `serde_json::Value` parameters.
    pub fn args_json(&self) -> Result<Vec<serde_json::Value>, serde_json::Error> {
        self.args.iter().map(serde_json::to_value).collect()
    }
}

/// Renders SQL templates for a configurable default dialect.
///
/// Configuration methods take `&mut self` and render methods take `&self`,
/// so a renderer can be shared across threads once configured.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    default_dialect: Dialect,
    search_paths: Vec<PathBuf>,
    functions: FunctionTable,
}

impl Renderer {
    /// Creates a renderer that uses `default_dialect` unless a render call
    /// overrides it.
    pub fn new(default_dialect: Dialect) -> Self {
        Self {
            default_dialect,
            search_paths: Vec::new(),
            functions: FunctionTable::new(),
        }
    }

    /// Creates a renderer from loaded configuration.
    pub fn from_config(config: &RendererConfig) -> Self {
        let mut renderer = Self::new(config.default_dialect);
        renderer.set_search_paths(config.search_paths.iter().cloned());
        renderer
    }

    /// Loads a YAML or JSON config file and builds a renderer from it.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let config = RendererConfig::from_file(path)?;
        Ok(Self::from_config(&config))
    }

    pub fn default_dialect(&self) -> Dialect {
        self.default_dialect
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Names of registered custom functions, sorted.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|name| name.as_str())
    }

    pub fn set_default_dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.default_dialect = dialect;
        self
    }

    /// Appends a directory to consult when resolving template names.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.search_paths.push(path.into());
        self
    }

    /// Replaces all search paths.
    pub fn set_search_paths<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a function callable from every template.
    ///
    /// A later registration under the same name replaces the earlier one.
    /// The names `bind` and `identifier` are reserved: registrations under
    /// those names are accepted but never visible to templates.
    ///
    /// ```rust
    /// use sqlrender::{Dialect, Renderer};
    ///
    /// let mut renderer = Renderer::new(Dialect::MySql);
    /// renderer.add_function("order", |desc: bool| if desc { "DESC" } else { "ASC" });
    ///
    /// let query = renderer
    ///     .render_str("SELECT * FROM t ORDER BY id {{ order(true) }}", &())
    ///     .unwrap();
    /// assert_eq!(query.sql, "SELECT * FROM t ORDER BY id DESC");
    /// ```
    pub fn add_function<F, Rv, Args>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.insert(name.into(), Value::from_function(f));
        self
    }

    /// Registers several callables at once, merging with existing ones.
    pub fn add_functions<I, N>(&mut self, functions: I) -> &mut Self
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<String>,
    {
        for (name, function) in functions {
            self.functions.insert(name.into(), function);
        }
        self
    }

    /// Renders inline template text with the default dialect.
    pub fn render_str<T>(&self, source: &str, data: &T) -> Result<RenderedQuery, RenderError>
    where
        T: Serialize + ?Sized,
    {
        self.render_str_with_dialect(source, data, self.default_dialect)
    }

    /// Renders inline template text with an explicit dialect.
    ///
    /// `data` may be any serializable value; unit and `None` count as an
    /// empty mapping.
    pub fn render_str_with_dialect<T>(
        &self,
        source: &str,
        data: &T,
        dialect: Dialect,
    ) -> Result<RenderedQuery, RenderError>
    where
        T: Serialize + ?Sized,
    {
        self.render_source(INLINE_TEMPLATE_NAME, source.to_string(), data, dialect)
    }

    /// Renders the named template file with the default dialect.
    pub fn render_template<T>(&self, name: &str, data: &T) -> Result<RenderedQuery, RenderError>
    where
        T: Serialize + ?Sized,
    {
        self.render_template_with_dialect(name, data, self.default_dialect)
    }

    /// Resolves template `name` (see [`resolve_template`](Self::resolve_template)),
    /// reads it and renders it with `dialect`.
    pub fn render_template_with_dialect<T>(
        &self,
        name: &str,
        data: &T,
        dialect: Dialect,
    ) -> Result<RenderedQuery, RenderError>
    where
        T: Serialize + ?Sized,
    {
        let (path, source) = loader::load_template(name, &self.search_paths)?;
        self.render_source(&path.to_string_lossy(), source, data, dialect)
    }

    /// Finds the file for template `name`: the name as a path first, then
    /// each search path in the order added.
    pub fn resolve_template(&self, name: &str) -> Result<PathBuf, RenderError> {
        loader::find_template(name, &self.search_paths)
    }

    fn render_source<T>(
        &self,
        name: &str,
        source: String,
        data: &T,
        dialect: Dialect,
    ) -> Result<RenderedQuery, RenderError>
    where
        T: Serialize + ?Sized,
    {
        debug!(template = name, %dialect, "rendering SQL template");

        let binder = Arc::new(Mutex::new(ArgumentBinder::new(dialect)));
        let mut env = build_environment(&self.functions, &binder);
        env.add_template_owned(name.to_string(), source)
            .map_err(RenderError::Syntax)?;
        let template = env.get_template(name).map_err(RenderError::Syntax)?;

        let sql = template
            .render(data_context(data))
            .map_err(RenderError::from_execution)?;
        let args = lock(&binder).take_arguments();

        debug!(template = name, %dialect, args = args.len(), "rendered SQL template");
        Ok(RenderedQuery { sql, args })
    }
}

/// Converts render data to a template context, mapping "no data" to an
/// empty mapping.
fn data_context<T: Serialize + ?Sized>(data: &T) -> Value {
    let value = Value::from_serialize(data);
    if value.is_none() || value.is_undefined() {
        context! {}
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_render_postgres_in_list() {
        let renderer = Renderer::new(Dialect::Postgres);
        let query = renderer
            .render_str(
                "SELECT * FROM users WHERE id IN {{ bind(IDs) }} AND active = {{ bind(Active) }}",
                &json!({ "IDs": [1, 2, 3], "Active": true }),
            )
            .unwrap();

        assert_eq!(
            query.sql,
            "SELECT * FROM users WHERE id IN ($1, $2, $3) AND active = $4"
        );
        assert_eq!(
            query.args,
            vec![
                Value::from(1),
                Value::from(2),
                Value::from(3),
                Value::from(true)
            ]
        );
    }

    #[test]
    fn test_render_dialect_override() {
        let renderer = Renderer::new(Dialect::Postgres);
        let query = renderer
            .render_str_with_dialect(
                "WHERE id IN {{ bind(ids) }} AND active = {{ bind(active) }}",
                &json!({ "ids": [1, 2, 3], "active": true }),
                Dialect::SqlServer,
            )
            .unwrap();
        assert_eq!(query.sql, "WHERE id IN (@p1, @p2, @p3) AND active = @p4");
    }

    #[test]
    fn test_default_dialect_read_at_call_time() {
        let mut renderer = Renderer::new(Dialect::Postgres);
        assert_eq!(renderer.render_str("{{ bind(1) }}", &()).unwrap().sql, "$1");

        renderer.set_default_dialect(Dialect::Oracle);
        assert_eq!(renderer.render_str("{{ bind(1) }}", &()).unwrap().sql, ":1");
    }

    #[test]
    fn test_absent_data_is_empty_mapping() {
        let renderer = Renderer::new(Dialect::Postgres);
        let query = renderer
            .render_str("SELECT 1{% if missing %} WHERE x{% endif %}", &None::<()>)
            .unwrap();
        assert_eq!(query.sql, "SELECT 1");
        assert!(query.args.is_empty());
    }

    #[test]
    fn test_missing_value_binds_null() {
        let renderer = Renderer::new(Dialect::Postgres);
        let query = renderer
            .render_str("x = {{ bind(nothing) }}", &json!({}))
            .unwrap();
        assert_eq!(query.sql, "x = $1");
        assert_eq!(query.args.len(), 1);
        assert!(query.args[0].is_none());
    }

    #[test]
    fn test_syntax_error() {
        let renderer = Renderer::new(Dialect::Postgres);
        let err = renderer.render_str("SELECT {{ bind(", &()).unwrap_err();
        assert!(matches!(err, RenderError::Syntax(_)));
        assert!(!err.is_template_bug());
    }

    #[test]
    fn test_execution_error_from_custom_function() {
        let mut renderer = Renderer::new(Dialect::Postgres);
        renderer.add_function("fail", || -> Result<String, minijinja::Error> {
            Err(minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                "nope",
            ))
        });
        let err = renderer
            .render_str("{{ bind(1) }} {{ fail() }}", &())
            .unwrap_err();
        assert!(matches!(err, RenderError::Execution(_)));
    }

    #[test]
    fn test_invalid_identifier_aborts() {
        let renderer = Renderer::new(Dialect::SqlServer);
        let err = renderer
            .render_str(
                "SELECT {{ bind(1) }} FROM {{ identifier(t) }}",
                &json!({ "t": "users;DROP" }),
            )
            .unwrap_err();
        assert!(err.is_template_bug());
        match err {
            RenderError::InvalidIdentifier(invalid) => assert_eq!(invalid.name(), "users;DROP"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_custom_function_overwrite() {
        let mut renderer = Renderer::new(Dialect::Postgres);
        renderer
            .add_function("tag", || "first")
            .add_function("tag", || "second");
        let query = renderer.render_str("{{ tag() }}", &()).unwrap();
        assert_eq!(query.sql, "second");
        assert_eq!(renderer.function_names().collect::<Vec<_>>(), vec!["tag"]);
    }

    #[test]
    fn test_add_functions_merges() {
        let mut renderer = Renderer::new(Dialect::Postgres);
        renderer.add_function("a", || "A");
        renderer.add_functions([
            ("b", Value::from_function(|| "B")),
            ("c", Value::from_function(|| "C")),
        ]);
        let query = renderer.render_str("{{ a() }}{{ b() }}{{ c() }}", &()).unwrap();
        assert_eq!(query.sql, "ABC");
    }

    #[test]
    fn test_search_path_configuration() {
        let mut renderer = Renderer::new(Dialect::Postgres);
        renderer.add_search_path("a").add_search_path("b");
        assert_eq!(renderer.search_paths(), &[PathBuf::from("a"), PathBuf::from("b")]);

        renderer.set_search_paths(["c"]);
        assert_eq!(renderer.search_paths(), &[PathBuf::from("c")]);
    }

    #[test]
    fn test_render_from_hashmap_data() {
        let renderer = Renderer::new(Dialect::Sqlite);
        let mut data = HashMap::new();
        data.insert("name", "alice");
        let query = renderer
            .render_str("WHERE name = {{ bind(name) }}", &data)
            .unwrap();
        assert_eq!(query.sql, "WHERE name = ?");
        assert_eq!(query.args, vec![Value::from("alice")]);
    }

    #[test]
    fn test_rendered_query_args_json() {
        let renderer = Renderer::new(Dialect::Postgres);
        let query = renderer
            .render_str("{{ bind(v) }}", &json!({ "v": [1, "two", null] }))
            .unwrap();
        assert_eq!(query.args_json().unwrap(), vec![json!(1), json!("two"), json!(null)]);
        let (sql, args) = query.into_parts();
        assert_eq!(sql, "($1, $2, $3)");
        assert_eq!(args.len(), 3);
    }
}
