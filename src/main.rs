//! Purpose: `scopeshim` CLI: developer tool over the boundary transports.
//! Role: Binary crate root; parses args, runs one command, writes results on stdout.
//! Invariants: Errors are emitted as JSON on stderr as `{"error":{"kind","message"}}`.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};

use scopeshim::api::CannedQuery;
use scopeshim::core::error::{Error, ErrorKind, to_exit_code};
use scopeshim::core::strings::{join_strings, split_strings};
use scopeshim::core::variant;

const HEADER: &str = include_str!("../include/scopeshim.h");

#[derive(Parser)]
#[command(
    name = "scopeshim",
    version,
    about = "Inspect the scopeshim C boundary and its data transports",
    long_about = None,
    after_help = r#"EXAMPLES
  $ scopeshim header > scopeshim.h
  $ scopeshim strings encode w1 w2 | scopeshim strings decode
  $ scopeshim query uri --scope music --query jazz
  $ scopeshim query parse 'scope://music?q=jazz&dep=albums'
"#
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the C header for the library.
    Header,
    /// Flat NUL-terminated string lists.
    Strings {
        #[command(subcommand)]
        command: StringsCommand,
    },
    /// JSON values as exchanged through byte buffers.
    Variant {
        #[command(subcommand)]
        command: VariantCommand,
    },
    /// Canned query URIs.
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },
}

#[derive(Subcommand)]
enum StringsCommand {
    /// Write the flat buffer for ITEMs to stdout.
    Encode { items: Vec<String> },
    /// Read a flat buffer on stdin and print it as a JSON array.
    Decode,
}

#[derive(Subcommand)]
enum VariantCommand {
    /// Parse JSON from FILE (or stdin) and print its compact form.
    Check { file: Option<PathBuf> },
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Print the URI for a canned query.
    Uri {
        #[arg(long)]
        scope: String,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        department: String,
    },
    /// Print the parts of a canned query URI as JSON.
    Parse { uri: String },
}

fn main() {
    scopeshim::logging::init();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(io_error("failed to write help"))?;
                return Ok(0);
            }
            _ => {
                let message = err.render().to_string();
                let summary = message.lines().next().unwrap_or("invalid arguments");
                let summary = summary.trim_start_matches("error: ").to_string();
                return Err(Error::new(ErrorKind::Usage).with_message(summary));
            }
        },
    };

    match cli.command {
        Command::Header => write_stdout(HEADER.as_bytes())?,
        Command::Strings { command } => match command {
            StringsCommand::Encode { items } => write_stdout(&join_strings(&items))?,
            StringsCommand::Decode => {
                let input = read_stdin()?;
                emit_json(&Value::from(split_strings(&input)))?;
            }
        },
        Command::Variant { command } => match command {
            VariantCommand::Check { file } => {
                let input = match file {
                    Some(path) => std::fs::read(&path).map_err(|err| {
                        Error::new(ErrorKind::Io)
                            .with_message(format!("failed to read {}", path.display()))
                            .with_source(err)
                    })?,
                    None => read_stdin()?,
                };
                emit_json(&variant::parse(&input, "input")?)?;
            }
        },
        Command::Query { command } => match command {
            QueryCommand::Uri {
                scope,
                query,
                department,
            } => {
                if scope.is_empty() {
                    return Err(Error::new(ErrorKind::InvalidArgument)
                        .with_message("--scope must not be empty"));
                }
                let uri = CannedQuery::new(scope, query, department).to_uri();
                write_stdout(format!("{uri}\n").as_bytes())?;
            }
            QueryCommand::Parse { uri } => {
                let query = CannedQuery::from_uri(&uri)?;
                emit_json(&json!({
                    "scope_id": query.scope_id(),
                    "query_string": query.query_string(),
                    "department_id": query.department_id(),
                    "filter_state": query.filter_state(),
                }))?;
            }
        },
    }
    Ok(0)
}

fn io_error(message: &'static str) -> impl Fn(io::Error) -> Error {
    move |err| {
        Error::new(ErrorKind::Io)
            .with_message(message)
            .with_source(err)
    }
}

fn read_stdin() -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .map_err(io_error("failed to read stdin"))?;
    Ok(buf)
}

fn write_stdout(bytes: &[u8]) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.flush())
        .map_err(io_error("failed to write stdout"))
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let text = serde_json::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    write_stdout(format!("{text}\n").as_bytes())
}

fn emit_error(err: &Error) {
    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_message(err: &Error) -> String {
    let mut message = err.message().unwrap_or("error").to_string();
    if let Some(source) = std::error::Error::source(err) {
        message.push_str(&format!(": {source}"));
    }
    message
}
