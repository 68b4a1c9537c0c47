//! csvql - CLI Client

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use csvql::catalog::Catalog;
use csvql::config::{Config, OutputFormat};
use csvql::executor::ExecutionEngine;
use csvql::output::format_result;

/// Query CSV files with a small subset of SQL
#[derive(Parser, Debug)]
#[command(name = "csvql", version, about, long_about = None)]
struct Cli {
    /// Directory holding <table>.csv files
    #[arg(short, long, env = "CSVQL_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Table to load at start-up (file name without .csv)
    #[arg(short, long)]
    table: Option<String>,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Output format: table or json
    #[arg(short, long, env = "CSVQL_FORMAT", default_value = "table")]
    format: OutputFormat,

    /// Line-editor history file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }

        let mut config = Config::new()
            .data_dir(self.data_dir)
            .delimiter(self.delimiter as u8)
            .format(self.format);
        if let Some(table) = self.table {
            config = config.table(table);
        }
        if let Some(history) = self.history {
            config = config.history_file(history);
        }
        Ok(config)
    }
}

/// Print welcome banner
fn print_banner() {
    println!(
        r#"
 csvql - SQL over CSV files
 Type '.help' for help, 'exit' to quit
"#
    );
}

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .tables            List tables in the data directory
  .schema [table]    Show columns of a table
  .reload <table>    Re-read a table from disk
  exit | quit        Leave csvql

Queries (end with ';'):
  SELECT * FROM people;
  SELECT name, city FROM people WHERE city = "Chennai";
  SELECT COUNT(*) FROM people WHERE age > 27 AND salary < 50000;
  SELECT COUNT(email) FROM people WHERE city = Hyderabad OR city = Chennai;
"#
    );
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_exit(input: &str) -> bool {
    let word = input.trim_end_matches(';').trim();
    word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit")
}

/// Execute a SQL statement
fn execute_sql(sql: &str, engine: &ExecutionEngine, format: OutputFormat) {
    let sql = sql.trim();
    if sql.is_empty() {
        return;
    }

    match engine.run(sql).and_then(|result| format_result(&result, format)) {
        Ok(text) => print!("{}", text),
        Err(e) => eprintln!("Query error: {}", e),
    }
}

fn print_schema(catalog: &Catalog, name: &str) {
    match catalog.get_table(name) {
        Ok(table) => println!(
            "{} ({}) - {} row(s)",
            table.name(),
            table.columns().join(", "),
            table.len()
        ),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Handle special dot commands. Returns false when the REPL should stop.
fn handle_special_command(cmd: &str, catalog: &Catalog) -> bool {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    match parts.first().copied() {
        Some(".help") => print_help(),
        Some(".quit") | Some(".exit") => return false,
        Some(".tables") => match catalog.list_tables() {
            Ok(tables) if tables.is_empty() => println!("No tables found."),
            Ok(tables) => {
                println!("Tables:");
                for table in tables {
                    println!("  {}", table);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        },
        Some(".schema") => match parts.get(1) {
            Some(name) => print_schema(catalog, name),
            None => match catalog.list_tables() {
                Ok(tables) => {
                    for name in tables {
                        print_schema(catalog, &name);
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            },
        },
        Some(".reload") => match parts.get(1) {
            Some(name) => match catalog.reload(name) {
                Ok(table) => println!("Reloaded '{}' ({} row(s))", table.name(), table.len()),
                Err(e) => eprintln!("Error: {}", e),
            },
            None => eprintln!("Usage: .reload <table>"),
        },
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type '.help' for available commands.");
        }
        None => {}
    }
    true
}

/// Main REPL loop
fn run_repl(config: Config) -> Result<()> {
    let catalog = Arc::new(config.catalog());
    let engine = ExecutionEngine::new(catalog.clone());

    print_banner();

    if let Some(name) = &config.table {
        let table = catalog
            .get_table(name)
            .with_context(|| format!("failed to load table '{}'", name))?;
        println!(
            "Loaded table '{}' with columns: {}",
            table.name(),
            table.columns().join(", ")
        );
    }

    let mut editor = DefaultEditor::new()?;
    if let Some(path) = &config.history_file {
        if let Err(e) = editor.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    let mut input_buffer = String::new();

    loop {
        let prompt = if input_buffer.is_empty() {
            "csvql> "
        } else {
            "  ...> "
        };

        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                input_buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let trimmed = line.trim();

        if input_buffer.is_empty() {
            if trimmed.is_empty() {
                continue;
            }
            if is_exit(trimmed) {
                break;
            }
            if trimmed.starts_with('.') {
                editor.add_history_entry(trimmed)?;
                if !handle_special_command(trimmed, &catalog) {
                    break;
                }
                continue;
            }
        } else if trimmed.is_empty() {
            // Empty line in multiline mode - execute the buffer
            let sql = std::mem::take(&mut input_buffer);
            editor.add_history_entry(sql.trim())?;
            execute_sql(&sql, &engine, config.format);
            continue;
        }

        input_buffer.push_str(&line);
        input_buffer.push('\n');

        if trimmed.ends_with(';') {
            let sql = std::mem::take(&mut input_buffer);
            editor.add_history_entry(sql.trim())?;
            execute_sql(&sql, &engine, config.format);
        }
    }

    // End of input terminates a pending statement
    if !input_buffer.trim().is_empty() {
        execute_sql(&input_buffer, &engine, config.format);
    }

    if let Some(path) = &config.history_file {
        if let Err(e) = editor.save_history(path) {
            warn!(path = %path.display(), error = %e, "failed to save history");
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = cli.into_config()?;
    run_repl(config)
}
