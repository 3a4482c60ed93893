//! dbmeta CLI - reflect database schemas and parse URL filters
//!
//! Usage:
//!   dbmeta reflect [--connection <name>] [--url <conn>] [--database <db>] [--schema <schema>]
//!   dbmeta parse-filter <query> [--kind <kind>]
//!
//! Examples:
//!   dbmeta reflect --connection local
//!   dbmeta reflect --url postgres://localhost/shop --database shop --schema public
//!   dbmeta parse-filter "filter[limit]=5&filter[order]=name ASC"

use clap::{Parser, Subcommand, ValueEnum};
use dbmeta::config::{Settings, SettingsError};
use dbmeta::metadata::{PostgresCatalog, SchemaAssembler};
use dbmeta::query::{
    CountQuery, FilterParser, FilterTarget, FindByIdQuery, FindOneQuery, FindQuery, QueryValues,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dbmeta")]
#[command(about = "dbmeta - reflect relational schemas and parse REST-style URL filters")]
#[command(version)]
struct Cli {
    /// Path to a dbmeta.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reflect the base tables of a schema and print them as JSON
    Reflect {
        /// Named connection from the config file
        #[arg(short, long, conflicts_with = "url")]
        connection: Option<String>,

        /// PostgreSQL connection string, bypassing the config file
        #[arg(long)]
        url: Option<String>,

        /// Catalog (database) to reflect
        #[arg(short, long)]
        database: Option<String>,

        /// Schema to reflect
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Parse a URL query string into a query descriptor and print it as JSON
    ParseFilter {
        /// Query string, e.g. "filter[limit]=5&filter[skip]=10"
        query: String,

        /// Query descriptor to populate
        #[arg(short, long, default_value = "find")]
        kind: QueryKind,
    },
}

#[derive(Clone, ValueEnum)]
enum QueryKind {
    Find,
    FindById,
    FindOne,
    Count,
}

/// Resolved reflection target.
struct Target {
    catalog: PostgresCatalog,
    database: String,
    schema: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reflect {
            connection,
            url,
            database,
            schema,
        } => cmd_reflect(cli.config, connection, url, database, schema),
        Commands::ParseFilter { query, kind } => cmd_parse_filter(&query, kind),
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings, SettingsError> {
    match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn resolve_target(
    config: Option<PathBuf>,
    connection: Option<String>,
    url: Option<String>,
    database: Option<String>,
    schema: Option<String>,
) -> Result<Target, SettingsError> {
    if let Some(url) = url {
        let database = database.ok_or_else(|| {
            SettingsError::InvalidConfig("--database is required with --url".to_string())
        })?;
        // The config file is only consulted for the default schema.
        let schema = match schema {
            Some(schema) => schema,
            None => load_settings(config)?.reflection.default_schema,
        };
        return Ok(Target {
            catalog: PostgresCatalog::new(url),
            database,
            schema,
        });
    }

    let settings = load_settings(config)?;

    let (name, conn) = match &connection {
        Some(name) => (name.as_str(), settings.get_connection(name)?),
        None => settings.default_connection().ok_or_else(|| {
            SettingsError::InvalidConfig("no connections configured".to_string())
        })?,
    };

    let database = database.or_else(|| conn.database.clone()).ok_or_else(|| {
        SettingsError::InvalidConfig(format!("connection {} has no database", name))
    })?;
    let schema = schema.unwrap_or_else(|| settings.schema_for(conn).to_string());

    Ok(Target {
        catalog: conn.catalog()?,
        database,
        schema,
    })
}

fn cmd_reflect(
    config: Option<PathBuf>,
    connection: Option<String>,
    url: Option<String>,
    database: Option<String>,
    schema: Option<String>,
) -> ExitCode {
    let target = match resolve_target(config, connection, url, database, schema) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("reflecting {}.{}", target.database, target.schema);
    let assembler = SchemaAssembler::new(target.catalog);

    match assembler.retrieve_table_metadata(&target.database, &target.schema) {
        Ok(tables) => print_json(&tables),
        Err(e) => {
            eprintln!("Reflection error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_parse_filter(query: &str, kind: QueryKind) -> ExitCode {
    let parser = FilterParser::new();
    let values = QueryValues::parse(query);

    match kind {
        QueryKind::Find => parse_and_print::<FindQuery>(&parser, &values),
        QueryKind::FindById => parse_and_print::<FindByIdQuery>(&parser, &values),
        QueryKind::FindOne => parse_and_print::<FindOneQuery>(&parser, &values),
        QueryKind::Count => parse_and_print::<CountQuery>(&parser, &values),
    }
}

fn parse_and_print<T>(parser: &FilterParser, values: &QueryValues) -> ExitCode
where
    T: FilterTarget + Default + Serialize,
{
    let mut descriptor = T::default();
    match parser.parse_query_string(&mut descriptor, values) {
        Ok(()) => print_json(&descriptor),
        Err(e) => {
            eprintln!("Filter error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}
