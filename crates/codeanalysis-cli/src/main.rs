use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use codeanalysis_common::{
    convert_xml_str_with_options, directory_exists, file_exists, insert_text_to_file,
    prepend_text_to_file, read_xml_file_with_options, write_value_as_xml_file_with_options,
    Array, BuildOptions, Object, ParseOptions, Value,
};

#[derive(Debug, Parser)]
#[command(
    name = "codeanalysis",
    version,
    about = "XML/JSON conversion and file helpers for code analysis build tasks"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an XML file to JSON
    Xml2json {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Only use arrays for repeated child elements
        #[arg(long)]
        no_explicit_array: bool,
    },
    /// Convert a JSON file to an XML file
    Json2xml {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output file; parent directories are created
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
        /// Root element name when the document does not provide one
        #[arg(long)]
        root: Option<String>,
        /// Omit the XML declaration
        #[arg(long)]
        headless: bool,
    },
    /// Prepend text to an existing file
    Prepend {
        file: PathBuf,
        text: String,
    },
    /// Surround an existing file's content with text
    Insert {
        file: PathBuf,
        #[arg(long)]
        prepend: Option<String>,
        #[arg(long)]
        append: Option<String>,
    },
    /// Exit with status 0 if the file (or directory) exists, 1 otherwise
    Exists {
        path: PathBuf,
        /// Check for a directory instead of a file
        #[arg(long)]
        dir: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    match args.command {
        Command::Xml2json {
            input,
            output,
            no_explicit_array,
        } => {
            let options = ParseOptions {
                explicit_array: !no_explicit_array,
                ..ParseOptions::default()
            };
            let value = match &input {
                Some(path) => read_xml_file_with_options(path, &options)?,
                None => convert_xml_str_with_options(&read_stdin()?, &options)?,
            };
            let json = serde_json::to_string_pretty(&value).context("failed to encode JSON")?;
            write_output(&output, json.as_bytes())?;
        }
        Command::Json2xml {
            input,
            output,
            root,
            headless,
        } => {
            let text = match &input {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read input file {}", path.display()))?,
                None => read_stdin()?,
            };
            let json: serde_json::Value =
                serde_json::from_str(&text).context("input is not valid JSON")?;
            let mut options = BuildOptions {
                headless,
                ..BuildOptions::default()
            };
            if let Some(root) = root {
                options.root_name = root;
            }
            write_value_as_xml_file_with_options(&output, &from_json(json), &options)?;
            info!("Wrote {}", output.display());
        }
        Command::Prepend { file, text } => {
            if !prepend_text_to_file(&file, &text)? {
                warn!("{} is not a file, nothing prepended", file.display());
            }
        }
        Command::Insert {
            file,
            prepend,
            append,
        } => {
            if prepend.is_none() && append.is_none() {
                bail!("pass --prepend and/or --append");
            }
            if !insert_text_to_file(&file, prepend.as_deref(), append.as_deref())? {
                warn!("{} left unchanged", file.display());
            }
        }
        Command::Exists { path, dir } => {
            let found = if dir {
                directory_exists(&path)
            } else {
                file_exists(&path)
            };
            return Ok(if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            });
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_json).collect::<Array>())
        }
        serde_json::Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect::<Object>(),
        ),
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    if buffer.trim().is_empty() {
        bail!("no input provided on stdin");
    }
    Ok(buffer)
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.write_all(b"\n").context("failed to write stdout")?;
            Ok(())
        }
    }
}
