use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Filter and present product tables from declarative boards", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply the current filter selections to a dataset and render the result
    Show(ShowArgs),
    /// Summarize every filter's widget feed: distinct values, counts, bounds
    Facets(FacetsArgs),
    /// Diagnose a board against a dataset without rendering rows
    Check(CheckArgs),
    /// Write a starter dataset and board configuration
    Sample(SampleArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Input CSV dataset ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Board configuration YAML
    #[arg(short = 'b', long = "board")]
    pub board: PathBuf,
    /// Selections JSON file holding the current widget state
    #[arg(long = "selections")]
    pub selections: Option<PathBuf>,
    /// Set or feature selections of the form `id=value1,value2`
    #[arg(long = "select", action = clap::ArgAction::Append)]
    pub selects: Vec<String>,
    /// Range selections of the form `id=lo:hi`
    #[arg(long = "range", action = clap::ArgAction::Append)]
    pub ranges: Vec<String>,
    /// Flag filters to check, by filter id
    #[arg(long = "flag", action = clap::ArgAction::Append)]
    pub flags: Vec<String>,
    /// Override the board's sort as `column[:asc|desc]`
    #[arg(long = "sort")]
    pub sort: Option<String>,
    /// Limit displayed rows (the match count is unaffected)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Write the filtered table as CSV instead of rendering it
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct FacetsArgs {
    /// Input CSV dataset ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Board configuration YAML
    #[arg(short = 'b', long = "board")]
    pub board: PathBuf,
    /// Maximum distinct values to display per filter (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Input CSV dataset ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Board configuration YAML
    #[arg(short = 'b', long = "board")]
    pub board: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Directory to write the starter files into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
    /// Overwrite existing starter files
    #[arg(long)]
    pub force: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
