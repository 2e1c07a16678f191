use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rowbind_sqlite::{ColumnInfo, DatabaseConfig, list_tables, row_count, table_exists, table_info};

/// How `tables` and `columns` print their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "rowbind")]
#[command(about = "Inspect SQLite databases managed with rowbind")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List user tables.
    Tables(TablesArgs),
    /// Show the columns of a table.
    Columns(ColumnsArgs),
    /// Count the rows of a table.
    Count(CountArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// Database file path.
    #[arg(long, conflicts_with = "config", required_unless_present = "config")]
    db: Option<PathBuf>,
    /// YAML connection config (alternative to --db).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TablesArgs {
    #[command(flatten)]
    database: DatabaseArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ColumnsArgs {
    #[command(flatten)]
    database: DatabaseArgs,
    /// Table name.
    #[arg(long)]
    table: String,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CountArgs {
    #[command(flatten)]
    database: DatabaseArgs,
    /// Table name.
    #[arg(long)]
    table: String,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tables(args) => run_tables(args),
        Command::Columns(args) => run_columns(args),
        Command::Count(args) => run_count(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn open_database(args: &DatabaseArgs) -> Result<rusqlite::Connection, String> {
    let config = match (&args.db, &args.config) {
        (Some(db), _) => DatabaseConfig::for_path(db),
        (None, Some(path)) => DatabaseConfig::from_file(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        (None, None) => return Err("Specify --db or --config".to_string()),
    };
    if !config.is_in_memory() && !config.path.exists() {
        return Err(format!("Database '{}' does not exist", config.path.display()));
    }
    config
        .open()
        .map_err(|e| format!("Failed to open database '{}': {e}", config.path.display()))
}

fn run_tables(args: TablesArgs) -> Result<(), String> {
    let conn = open_database(&args.database)?;
    let tables = list_tables(&conn).map_err(|e| format!("Failed to list tables: {e}"))?;
    match args.format {
        CliOutputFormat::Json => println!("{}", to_json(&tables)?),
        CliOutputFormat::Table => {
            for table in &tables {
                println!("{table}");
            }
        }
    }
    Ok(())
}

fn run_columns(args: ColumnsArgs) -> Result<(), String> {
    let conn = open_database(&args.database)?;
    let exists = table_exists(&conn, &args.table).map_err(|e| e.to_string())?;
    if !exists {
        return Err(format!("Table '{}' does not exist", args.table));
    }
    let columns =
        table_info(&conn, &args.table).map_err(|e| format!("Failed to read columns: {e}"))?;
    match args.format {
        CliOutputFormat::Json => println!("{}", to_json(&columns)?),
        CliOutputFormat::Table => print!("{}", format_columns(&columns)),
    }
    Ok(())
}

fn run_count(args: CountArgs) -> Result<(), String> {
    let conn = open_database(&args.database)?;
    let count = row_count(&conn, &args.table).map_err(|e| e.to_string())?;
    println!("{count}");
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn format_columns(columns: &[ColumnInfo]) -> String {
    let name_width = columns
        .iter()
        .map(|c| c.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);
    let type_width = columns
        .iter()
        .map(|c| c.type_name.len())
        .chain(std::iter::once("TYPE".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<name_width$}  {:<type_width$}  NOT NULL  PK\n", "NAME", "TYPE");
    for column in columns {
        out.push_str(&format!(
            "{:<name_width$}  {:<type_width$}  {:<8}  {}\n",
            column.name,
            column.type_name,
            if column.not_null { "yes" } else { "no" },
            if column.primary_key { "yes" } else { "no" },
        ));
    }
    out
}
