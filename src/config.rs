//! Command-line configuration for the `batch-parser` binary.

use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Where the batch file is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// Parse a batch transaction file and report net balances per account
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "batch-parser")]
#[command(about = "Parse a batch transaction file and report net balances per account", long_about = None)]
pub struct Config {
    /// Batch file to read; `-` or no value reads standard input
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output encoding
    #[arg(
        short,
        long,
        value_name = "FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    pub format: OutputFormat,
}

impl Config {
    /// Resolves the input argument into a line source.
    pub fn source(&self) -> Input {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => Input::File(path.clone()),
            _ => Input::Stdin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_stdin_and_json() {
        let config = Config::try_parse_from(["batch-parser"]).unwrap();
        assert_eq!(config.source(), Input::Stdin);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_file_and_format() {
        let config = Config::try_parse_from(["batch-parser", "batch.txt", "--format", "csv"]).unwrap();
        assert_eq!(config.source(), Input::File(PathBuf::from("batch.txt")));
        assert_eq!(config.format, OutputFormat::Csv);

        let config = Config::try_parse_from(["batch-parser", "-f", "json", "batch.txt"]).unwrap();
        assert_eq!(config.source(), Input::File(PathBuf::from("batch.txt")));
        assert_eq!(config.format, OutputFormat::Json);

        let config = Config::try_parse_from(["batch-parser", "--format=csv", "-"]).unwrap();
        assert_eq!(config.source(), Input::Stdin);
        assert_eq!(config.format, OutputFormat::Csv);
    }

    #[test]
    fn test_dash_prefixed_path_after_separator() {
        let config = Config::try_parse_from(["batch-parser", "--", "-data.txt"]).unwrap();
        assert_eq!(config.source(), Input::File(PathBuf::from("-data.txt")));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Config::try_parse_from(["batch-parser", "--format"]).is_err());
        assert!(Config::try_parse_from(["batch-parser", "--format", "xml"]).is_err());
        assert!(Config::try_parse_from(["batch-parser", "a.txt", "b.txt"]).is_err());
        assert!(Config::try_parse_from(["batch-parser", "--verbose"]).is_err());
    }
}
