use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use workup_core::modification::{default_tags, Tag};
use workup_core::table::{infer_delimiter, PEPTIDE_COLUMN};

#[derive(Serialize, Clone, Debug)]
/// Actual workup parameters - may include overrides or default values not set by user
pub struct Workup {
    pub version: String,
    pub input: PathBuf,
    pub column: String,
    #[serde(serialize_with = "serialize_delimiter")]
    pub delimiter: u8,
    pub stem: String,
    pub annotations: bool,
    pub tags: Vec<Tag>,
    pub strip_all_annotations: bool,
    pub output_paths: Vec<PathBuf>,

    #[serde(skip_serializing)]
    pub output_directory: PathBuf,
}

fn serialize_delimiter<S>(delimiter: &u8, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_char(*delimiter as char)
}

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
/// Input workup parameters deserialized from JSON file
pub struct Input {
    input: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    column: Option<String>,
    delimiter: Option<String>,
    stem: Option<String>,
    annotations: Option<bool>,
    tags: Option<Vec<Tag>>,
    strip_all_annotations: Option<bool>,
}

impl Input {
    pub fn from_arguments(matches: ArgMatches) -> anyhow::Result<Self> {
        let mut input = match matches.get_one::<String>("parameters") {
            Some(path) => Input::load(path)
                .with_context(|| format!("Failed to read parameters from `{path}`"))?,
            None => Input::default(),
        };

        // Handle JSON configuration overrides
        if let Some(path) = matches.get_one::<String>("input") {
            log::trace!("overriding `input` parameter.");
            input.input = Some(path.into());
        }
        if let Some(output_directory) = matches.get_one::<String>("output_directory") {
            log::trace!("overriding `output_directory` parameter.");
            input.output_directory = Some(output_directory.into());
        }
        if let Some(column) = matches.get_one::<String>("column") {
            log::trace!("overriding `column` parameter.");
            input.column = Some(column.into());
        }
        if let Some(delimiter) = matches.get_one::<String>("delimiter") {
            log::trace!("overriding `delimiter` parameter.");
            input.delimiter = Some(delimiter.into());
        }
        if matches.get_flag("no-annotations") {
            input.annotations = Some(false);
        }
        if matches.get_flag("strip-all") {
            input.strip_all_annotations = Some(true);
        }

        ensure!(
            input.input.is_some(),
            "`input` must be set. For more information try '--help'"
        );

        Ok(input)
    }

    pub fn load<S: AsRef<str>>(path: S) -> anyhow::Result<Self> {
        workup_core::read_json(path.as_ref()).map_err(anyhow::Error::from)
    }

    fn parse_delimiter(delimiter: &str) -> anyhow::Result<u8> {
        // Allow the escaped form, since a literal tab is awkward to pass on a shell
        let delimiter = match delimiter {
            "\\t" => "\t",
            d => d,
        };
        let mut chars = delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' => Ok(c as u8),
            _ => anyhow::bail!(
                "`delimiter` must be a single ASCII character other than a quote or newline, got {:?}",
                delimiter
            ),
        }
    }

    pub fn build(self) -> anyhow::Result<Workup> {
        let input = self.input.context("'input' must be provided!")?;

        let delimiter = match self.delimiter {
            Some(d) => Self::parse_delimiter(&d)?,
            None => {
                let d = infer_delimiter(&input);
                log::trace!("inferred delimiter {:?} for `{}`", d as char, input.display());
                d
            }
        };

        let stem = self.stem.unwrap_or_else(|| "peptides".into());
        ensure!(
            !stem.is_empty() && !stem.contains(std::path::is_separator),
            "`stem` must be a non-empty file name, got {:?}",
            stem
        );

        let tags = self.tags.unwrap_or_else(default_tags);
        if tags.is_empty() && !self.strip_all_annotations.unwrap_or(false) {
            log::warn!("no modification tags configured - sequences will be copied unchanged");
        }

        let output_directory = match self.output_directory {
            Some(path) => {
                std::fs::create_dir_all(&path).with_context(|| {
                    format!("Failed to create output directory `{}`", path.display())
                })?;
                path
            }
            None => std::env::current_dir()?,
        };

        Ok(Workup {
            version: clap::crate_version!().into(),
            input,
            column: self.column.unwrap_or_else(|| PEPTIDE_COLUMN.into()),
            delimiter,
            stem,
            annotations: self.annotations.unwrap_or(true),
            tags,
            strip_all_annotations: self.strip_all_annotations.unwrap_or(false),
            output_paths: Vec::new(),
            output_directory,
        })
    }
}
