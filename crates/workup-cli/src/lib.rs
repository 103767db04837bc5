pub mod input;
pub mod runner;

use clap::{Arg, ArgAction, Command, ValueHint};

pub use runner::Runner;

pub fn command() -> Command {
    Command::new("workup")
        .version(clap::crate_version!())
        .about("Clean peptide sequences out of PEAKS de novo exports")
        .arg(
            Arg::new("parameters")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to configuration parameters (JSON file)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path to the PEAKS de novo export. Overrides the input \
                     specified in the configuration file.",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output_directory")
                .short('o')
                .long("output_directory")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path where cleaned peptides will be written. \
                     Overrides the directory specified in the configuration file.",
                )
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("column")
                .short('c')
                .long("column")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Name of the column holding peptide sequences (default = Peptide)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Field delimiter of the input table (default = inferred from extension)")
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("no-annotations")
                .long("no-annotations")
                .action(ArgAction::SetTrue)
                .help("Skip writing the parenthesised annotations file"),
        )
        .arg(
            Arg::new("strip-all")
                .long("strip-all")
                .action(ArgAction::SetTrue)
                .help("Also remove parenthesised annotations not listed in `tags`"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
