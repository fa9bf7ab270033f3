//! im-isbn command line
//!
//! Validate, correct and convert ISBNs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use im_isbn::config::{Config, RangeTreeHandle};
use im_isbn::{Isbn, RangeTree};

#[derive(Parser)]
#[command(name = "im-isbn", version, about = "Validate, correct and convert ISBNs")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// RangeMessage.xml to use instead of the embedded table
    #[arg(long, global = true, value_name = "PATH")]
    ranges: Option<PathBuf>,

    /// Config file (default: <config_dir>/im-isbn/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that each ISBN is well formed with a correct check digit
    Validate {
        #[arg(required = true)]
        isbns: Vec<String>,
    },
    /// Print every representation of an ISBN
    Convert {
        isbn: String,
        /// Require the check character
        #[arg(long)]
        exact: bool,
    },
    /// Replace the last character with a freshly computed check digit
    Correct { isbn: String },
}

#[derive(Serialize)]
struct Validation {
    input: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Conversion {
    ean13: String,
    ean10: Option<String>,
    isbn13: Option<String>,
    isbn10: Option<String>,
    is_isbn: bool,
}

impl Conversion {
    fn new(isbn: &Isbn, tree: &RangeTree) -> Self {
        Self {
            ean13: isbn.to_ean13(),
            ean10: isbn.to_ean10().ok(),
            isbn13: isbn.to_isbn13(tree).ok(),
            isbn10: isbn.to_isbn10(tree).ok(),
            is_isbn: isbn.is_isbn(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.ranges.is_some() {
        config.range_message = cli.ranges;
    }
    let json = cli.json || config.json;

    match cli.command {
        Command::Validate { isbns } => {
            let results: Vec<Validation> = isbns
                .into_iter()
                .map(|input| {
                    let error = Isbn::from_raw(Some(&input), config.exact).err().map(|e| e.to_string());
                    Validation {
                        valid: error.is_none(),
                        input,
                        error,
                    }
                })
                .collect();
            let all_valid = results.iter().all(|r| r.valid);

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for r in &results {
                    match &r.error {
                        None => println!("{}\tvalid", r.input),
                        Some(e) => println!("{}\tinvalid: {}", r.input, e),
                    }
                }
            }
            Ok(all_valid)
        }
        Command::Convert { isbn, exact } => {
            let isbn = Isbn::from_raw(Some(&isbn), exact || config.exact)?;
            let tree: RangeTreeHandle = config.range_tree()?;
            let conversion = Conversion::new(&isbn, &tree);

            if json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                println!("EAN-13:  {}", conversion.ean13);
                if let Some(ean10) = &conversion.ean10 {
                    println!("EAN-10:  {}", ean10);
                }
                match isbn.to_isbn13(&tree) {
                    Ok(isbn13) => println!("ISBN-13: {}", isbn13),
                    Err(e) => println!("ISBN-13: {}", e),
                }
                if let Some(isbn10) = &conversion.isbn10 {
                    println!("ISBN-10: {}", isbn10);
                }
                if !conversion.is_isbn {
                    println!("(not in the 978/979 book numbering space)");
                }
            }
            Ok(true)
        }
        Command::Correct { isbn } => {
            let corrected = Isbn::corrected(Some(&isbn))?;
            if json {
                println!("{}", serde_json::to_string(&corrected)?);
            } else {
                println!("{}", corrected.as_str());
            }
            Ok(true)
        }
    }
}
