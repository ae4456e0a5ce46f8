//! SQL dialects and their placeholder and quoting conventions.
//!
//! A [`Dialect`] decides two things for a render:
//!
//! | Dialect | Placeholder | Identifier quoting |
//! |---------|-------------|--------------------|
//! | `postgres` | `$1`, `$2`, ... | `"name"` |
//! | `oracle` | `:1`, `:2`, ... | `"name"` |
//! | `sqlserver` | `@p1`, `@p2`, ... | `[name]` |
//! | `mysql`, `sqlite`, `snowflake` | `?` | `` `name` `` |
//!
//! Dialects parse from their lowercase names, so they can come straight from
//! configuration files or command-line flags:
//!
//! ```rust
//! use sqlrender::Dialect;
//!
//! let dialect: Dialect = "sqlserver".parse().unwrap();
//! assert_eq!(dialect.placeholder(3), "@p3");
//! assert_eq!(dialect.quote_identifier("users"), "[users]");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target database engine for placeholder and identifier syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Dialect {
    #[default]
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    Sqlite,
    #[serde(rename = "sqlserver")]
    SqlServer,
    Snowflake,
    Oracle,
}

impl Dialect {
    /// Every built-in dialect, in declaration order.
    pub const ALL: &'static [Dialect] = &[
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::SqlServer,
        Dialect::Snowflake,
        Dialect::Oracle,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Snowflake => "snowflake",
            Dialect::Oracle => "oracle",
        }
    }

    /// Whether placeholders carry their 1-based position in the text.
    ///
    /// Dialects without positional syntax repeat a single `?` marker and rely
    /// on argument order alone.
    pub fn is_positional(self) -> bool {
        matches!(
            self,
            Dialect::Postgres | Dialect::SqlServer | Dialect::Oracle
        )
    }

    /// Placeholder text for the argument at 1-based `position`.
    pub fn placeholder(self, position: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", position),
            Dialect::SqlServer => format!("@p{}", position),
            Dialect::Oracle => format!(":{}", position),
            Dialect::MySql | Dialect::Sqlite | Dialect::Snowflake => "?".to_string(),
        }
    }

    /// Wraps a single identifier segment in this dialect's quotes.
    ///
    /// The segment is not escaped; callers validate it first (see
    /// [`ArgumentBinder::identifier`](crate::ArgumentBinder::identifier)).
    pub fn quote_identifier(self, segment: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Oracle => format!("\"{}\"", segment),
            Dialect::SqlServer => format!("[{}]", segment),
            Dialect::MySql | Dialect::Sqlite | Dialect::Snowflake => format!("`{}`", segment),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SQL dialect \"{0}\" (expected one of: postgres, mysql, sqlite, sqlserver, snowflake, oracle)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "snowflake" => Ok(Dialect::Snowflake),
            "oracle" => Ok(Dialect::Oracle),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
