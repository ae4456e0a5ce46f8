//! Per-render argument accumulation and identifier quoting.
//!
//! [`ArgumentBinder`] is the state behind the `bind` and `identifier`
//! template functions. Each render owns exactly one binder, so the argument
//! list it returns always lines up with the placeholders in the rendered text.
//!
//! ```rust
//! use sqlrender::{ArgumentBinder, Dialect, Value};
//!
//! let mut binder = ArgumentBinder::new(Dialect::Postgres);
//! assert_eq!(binder.bind(Value::from(vec![10, 20])), "($1, $2)");
//! assert_eq!(binder.bind(Value::from("alice")), "$3");
//! assert_eq!(binder.len(), 3);
//! ```

use minijinja::value::{Value, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::Dialect;

/// Text substituted for an empty collection. `IN (NULL)` matches nothing and
/// stays valid SQL, unlike `IN ()`.
pub const EMPTY_LIST: &str = "(NULL)";

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._]+$").expect("identifier pattern is valid"));

/// An identifier containing characters outside `[A-Za-z0-9._]`.
///
/// This signals a bug in the template or in the code feeding it, never bad
/// end-user input: identifiers are not meant to come from untrusted sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier {0:?}")]
pub struct InvalidIdentifier(pub String);

impl InvalidIdentifier {
    /// The rejected identifier text.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Collects bound values and formats placeholders for one dialect.
#[derive(Debug, Clone)]
pub struct ArgumentBinder {
    dialect: Dialect,
    arguments: Vec<Value>,
}

impl ArgumentBinder {
    /// Creates an empty binder for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            arguments: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Arguments bound so far, in placeholder order.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Consumes the binder, returning its arguments.
    pub fn into_arguments(self) -> Vec<Value> {
        self.arguments
    }

    pub(crate) fn take_arguments(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.arguments)
    }

    /// Binds `value` and returns the placeholder text to splice into the SQL.
    ///
    /// - undefined or none binds a single NULL argument;
    /// - a sequence binds each element and returns `(p1, p2, ...)`, or
    ///   [`EMPTY_LIST`] without binding anything when it is empty;
    /// - any other value (strings, numbers, maps, bytes) binds as one argument.
    pub fn bind(&mut self, value: Value) -> String {
        match value.kind() {
            ValueKind::Undefined | ValueKind::None => self.push(Value::from(())),
            ValueKind::Seq | ValueKind::Iterable => self.bind_list(value),
            _ => self.push(value),
        }
    }

    fn bind_list(&mut self, value: Value) -> String {
        let items: Vec<Value> = match value.try_iter() {
            Ok(iter) => iter.collect(),
            Err(_) => return self.push(value),
        };
        if items.is_empty() {
            return EMPTY_LIST.to_string();
        }

        let placeholders: Vec<String> = items.into_iter().map(|item| self.push(item)).collect();
        format!("({})", placeholders.join(", "))
    }

    fn push(&mut self, value: Value) -> String {
        self.arguments.push(value);
        self.dialect.placeholder(self.arguments.len())
    }

    /// Quotes a template value as a (possibly schema-qualified) identifier.
    ///
    /// Non-string values and the empty string quote to an empty string, so
    /// optional identifier slots simply disappear from the output.
    pub fn identifier(&self, name: &Value) -> Result<String, InvalidIdentifier> {
        match name.as_str() {
            Some(text) => self.quote_identifier(text),
            None => Ok(String::new()),
        }
    }

    /// Validates `name` and quotes each `.`-separated segment.
    ///
    /// ```rust
    /// use sqlrender::{ArgumentBinder, Dialect};
    ///
    /// let binder = ArgumentBinder::new(Dialect::SqlServer);
    /// assert_eq!(binder.quote_identifier("dbo.users").unwrap(), "[dbo].[users]");
    /// assert!(binder.quote_identifier("users; DROP TABLE users").is_err());
    /// ```
    pub fn quote_identifier(&self, name: &str) -> Result<String, InvalidIdentifier> {
        if name.is_empty() {
            return Ok(String::new());
        }
        if !IDENTIFIER_PATTERN.is_match(name) {
            return Err(InvalidIdentifier(name.to_string()));
        }

        let quoted: Vec<String> = name
            .split('.')
            .map(|segment| self.dialect.quote_identifier(segment))
            .collect();
        Ok(quoted.join("."))
    }
}
