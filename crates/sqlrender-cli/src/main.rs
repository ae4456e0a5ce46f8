//! `sqlrender` - render a SQL template and print the query and its arguments.
//!
//! ```bash
//! sqlrender -I ./sql users/by_id.sql --data '{"ids": [1, 2, 3]}'
//! sqlrender --dialect sqlserver --inline 'SELECT * FROM t WHERE id = {{ bind(id) }}' --data '{"id": 7}'
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use sqlrender::{Dialect, RenderedQuery, Renderer};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Render a SQL template with dialect-aware placeholders.
#[derive(Debug, Parser)]
#[command(name = "sqlrender", version, about)]
struct Cli {
    /// Template name, resolved as a path then against each search path
    #[arg(required_unless_present = "inline", conflicts_with = "inline")]
    template: Option<String>,

    /// Render this template text instead of a named template
    #[arg(long)]
    inline: Option<String>,

    /// Target dialect (postgres, mysql, sqlite, sqlserver, snowflake, oracle)
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// Renderer config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional template search path; may be repeated
    #[arg(short = 'I', long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Template data as a JSON object
    #[arg(long, conflicts_with = "data_file")]
    data: Option<String>,

    /// Read template data from a JSON file
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    dialect: Dialect,
    sql: &'a str,
    args: Vec<serde_json::Value>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let renderer = build_renderer(&cli)?;
    let dialect = cli.dialect.unwrap_or(renderer.default_dialect());
    let data = load_data(&cli)?;

    let query = match (&cli.inline, &cli.template) {
        (Some(source), _) => renderer.render_str_with_dialect(source, &data, dialect),
        (None, Some(name)) => renderer.render_template_with_dialect(name, &data, dialect),
        (None, None) => bail!("either a template name or --inline is required"),
    }
    .context("failed to render template")?;
    debug!(%dialect, args = query.args.len(), "rendered query");

    print!("{}", format_output(&query, dialect, cli.format)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_renderer(cli: &Cli) -> Result<Renderer> {
    let mut renderer = match &cli.config {
        Some(path) => Renderer::from_config_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Renderer::default(),
    };
    for path in &cli.search_paths {
        renderer.add_search_path(path);
    }
    Ok(renderer)
}

fn load_data(cli: &Cli) -> Result<serde_json::Value> {
    let raw = match (&cli.data, &cli.data_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?,
        (None, None) => return Ok(serde_json::Value::Null),
    };
    let data: serde_json::Value =
        serde_json::from_str(&raw).context("template data is not valid JSON")?;
    if !(data.is_object() || data.is_null()) {
        bail!("template data must be a JSON object");
    }
    Ok(data)
}

fn format_output(query: &RenderedQuery, dialect: Dialect, format: Format) -> Result<String> {
    let args = query.args_json().context("failed to serialize arguments")?;
    match format {
        Format::Json => {
            let output = JsonOutput {
                dialect,
                sql: &query.sql,
                args,
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
        }
        Format::Text => {
            let mut out = query.sql.clone();
            if !out.ends_with('\n') {
                out.push('\n');
            }
            for (i, arg) in args.iter().enumerate() {
                let label = if dialect.is_positional() {
                    dialect.placeholder(i + 1)
                } else {
                    format!("?{}", i + 1)
                };
                out.push_str(&format!("-- {}: {}\n", label, arg));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sqlrender::Value;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inline_with_dialect() {
        let cli = Cli::try_parse_from([
            "sqlrender",
            "--inline",
            "SELECT 1",
            "--dialect",
            "oracle",
            "-I",
            "a",
            "-I",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.inline.as_deref(), Some("SELECT 1"));
        assert_eq!(cli.dialect, Some(Dialect::Oracle));
        assert_eq!(cli.search_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.format, Format::Text);
    }

    #[test]
    fn test_parse_requires_template_or_inline() {
        assert!(Cli::try_parse_from(["sqlrender"]).is_err());
        assert!(Cli::try_parse_from(["sqlrender", "q.sql", "--inline", "x"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_dialect() {
        assert!(Cli::try_parse_from(["sqlrender", "q.sql", "--dialect", "db2"]).is_err());
    }

    #[test]
    fn test_text_output() {
        let query = RenderedQuery {
            sql: "SELECT $1, $2".to_string(),
            args: vec![Value::from(1), Value::from("a")],
        };
        let out = format_output(&query, Dialect::Postgres, Format::Text).unwrap();
        assert_eq!(out, "SELECT $1, $2\n-- $1: 1\n-- $2: \"a\"\n");
    }

    #[test]
    fn test_text_output_numbers_question_marks() {
        let query = RenderedQuery {
            sql: "SELECT ?".to_string(),
            args: vec![Value::from(true)],
        };
        let out = format_output(&query, Dialect::MySql, Format::Text).unwrap();
        assert_eq!(out, "SELECT ?\n-- ?1: true\n");
    }

    #[test]
    fn test_json_output() {
        let query = RenderedQuery {
            sql: "SELECT @p1".to_string(),
            args: vec![Value::from(())],
        };
        let out = format_output(&query, Dialect::SqlServer, Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({ "dialect": "sqlserver", "sql": "SELECT @p1", "args": [null] })
        );
    }
}
