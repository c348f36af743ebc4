use std::path::PathBuf;

use clap::Parser;

use crate::files::RecordType;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate typed Java record classes for the Wealth and Assets Survey",
    long_about = None
)]
pub struct Cli {
    /// Base data directory (defaults to $HOME/data/WaAS)
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,
    /// Record type to generate; repeat to generate several
    #[arg(
        short = 't',
        long = "record-type",
        value_enum,
        action = clap::ArgAction::Append,
        default_values_t = [RecordType::Person]
    )]
    pub record_types: Vec<RecordType>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Skip writing the YAML subset report
    #[arg(long = "no-report")]
    pub no_report: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_person_records() {
        let cli = Cli::try_parse_from(["waas-codegen"]).expect("parse");
        assert_eq!(cli.record_types, vec![RecordType::Person]);
        assert!(cli.data_dir.is_none());
        assert!(!cli.no_report);
    }

    #[test]
    fn accepts_repeated_record_types() {
        let cli = Cli::try_parse_from([
            "waas-codegen",
            "--data-dir",
            "/tmp/waas",
            "-t",
            "hhold",
            "-t",
            "person",
            "--no-report",
        ])
        .expect("parse");
        assert_eq!(
            cli.record_types,
            vec![RecordType::Household, RecordType::Person]
        );
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/waas")));
        assert!(cli.no_report);
    }

    #[test]
    fn rejects_unknown_record_type() {
        assert!(Cli::try_parse_from(["waas-codegen", "-t", "benefit"]).is_err());
    }
}
