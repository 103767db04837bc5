use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use log::info;
use serde::Serialize;
use workup_core::annotation::{self, StripSummary};
use workup_core::modification::{RemovalSummary, TagSet};
use workup_core::table::{self, Column};

use super::input::Workup;

pub struct Runner {
    pub parameters: Workup,
    start: Instant,
}

/// Summary of a finished run, also written out as `results.json`
#[derive(Serialize, Debug)]
pub struct Report {
    #[serde(flatten)]
    pub parameters: Workup,
    pub peptides: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<StripSummary>,
    pub modifications: RemovalSummary,
    pub runtime_secs: f64,
}

/// Absolute form of `path`, resolving symlinks and relative components even
/// when the file itself does not exist yet
fn resolve(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = match parent.as_os_str().is_empty() {
                true => Path::new("."),
                false => parent,
            };
            parent
                .canonicalize()
                .map(|parent| parent.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

impl Runner {
    pub fn new(parameters: Workup) -> Self {
        Self {
            parameters,
            start: Instant::now(),
        }
    }

    fn make_path<S: AsRef<str>>(&self, suffix: S) -> PathBuf {
        self.parameters
            .output_directory
            .join(format!("{}{}", self.parameters.stem, suffix.as_ref()))
    }

    /// Every file this run will create or truncate
    fn planned_outputs(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.make_path(".csv"), self.make_path(".txt")];
        if self.parameters.annotations {
            paths.push(self.make_path("_annotations.txt"));
        }
        paths.push(self.make_path("_unmodified.txt"));
        paths.push(self.parameters.output_directory.join("results.json"));
        paths
    }

    fn check_outputs(&self) -> anyhow::Result<()> {
        let input = resolve(&self.parameters.input);
        for path in self.planned_outputs() {
            if resolve(&path) == input {
                bail!(
                    "Output file `{}` would overwrite the input `{}`. \
                     Choose a different `stem` or `output_directory`",
                    path.display(),
                    self.parameters.input.display()
                );
            }
        }
        Ok(())
    }

    fn extract_column(&self) -> anyhow::Result<Column> {
        let input = &self.parameters.input;
        let column = table::read_column(input, self.parameters.delimiter, &self.parameters.column)
            .with_context(|| {
                format!(
                    "Failed to extract column `{}` from `{}`",
                    self.parameters.column,
                    input.display()
                )
            })?;
        info!(
            "extracted {} values of column `{}` in {:#?}",
            column.len(),
            column.name,
            self.start.elapsed()
        );
        Ok(column)
    }

    fn write_column(&mut self, column: &Column, suffix: &str) -> anyhow::Result<PathBuf> {
        let path = self.make_path(suffix);
        column
            .write_to_path(&path, b',')
            .with_context(|| format!("Failed to write peptides to `{}`", path.display()))?;
        info!("wrote {} peptides to {}", column.len(), path.display());
        self.parameters.output_paths.push(path.clone());
        Ok(path)
    }

    fn strip_annotations(&mut self, source: &Path) -> anyhow::Result<StripSummary> {
        let path = self.make_path("_annotations.txt");
        let summary = workup_core::open(source)
            .and_then(|rdr| {
                let wtr = workup_core::create(&path)?;
                annotation::strip(rdr, wtr)
            })
            .with_context(|| {
                format!(
                    "Failed to extract annotations from `{}` into `{}`",
                    source.display(),
                    path.display()
                )
            })?;
        info!(
            "extracted {} annotations from {} peptides in {:#?}",
            summary.groups,
            summary.lines,
            self.start.elapsed()
        );
        self.parameters.output_paths.push(path);
        Ok(summary)
    }

    fn remove_modifications(&mut self, source: &Path) -> anyhow::Result<RemovalSummary> {
        let path = self.make_path("_unmodified.txt");
        let tags = TagSet::new(self.parameters.tags.clone())
            .strip_all(self.parameters.strip_all_annotations);
        let summary = workup_core::open(source)
            .and_then(|rdr| {
                let wtr = workup_core::create(&path)?;
                tags.remove(rdr, wtr)
            })
            .with_context(|| {
                format!(
                    "Failed to remove modifications from `{}` into `{}`",
                    source.display(),
                    path.display()
                )
            })?;
        for count in &summary.tags {
            info!(
                "- removed {} x {} {}",
                count.removed,
                count.tag,
                count.name.unwrap_or_default()
            );
        }
        if let Some(other) = summary.other {
            info!("- removed {} other annotations", other);
        }
        info!(
            "cleaned {} of {} peptides in {:#?}",
            summary.modified_lines,
            summary.lines,
            self.start.elapsed()
        );
        self.parameters.output_paths.push(path);
        Ok(summary)
    }

    fn write_report(&self, report: &Report) -> anyhow::Result<PathBuf> {
        let path = self.parameters.output_directory.join("results.json");
        let bytes = serde_json::to_vec_pretty(report)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write run report to `{}`", path.display()))?;
        Ok(path)
    }

    pub fn run(mut self) -> anyhow::Result<Report> {
        self.check_outputs()?;
        let column = self.extract_column()?;

        self.write_column(&column, ".csv")?;
        let peptides = self.write_column(&column, ".txt")?;

        let annotations = match self.parameters.annotations {
            true => Some(self.strip_annotations(&peptides)?),
            false => None,
        };
        let modifications = self.remove_modifications(&peptides)?;

        let path = self.parameters.output_directory.join("results.json");
        self.parameters.output_paths.push(path);

        let report = Report {
            parameters: self.parameters.clone(),
            peptides: column.len(),
            annotations,
            modifications,
            runtime_secs: self.start.elapsed().as_secs_f64(),
        };
        let path = self.write_report(&report)?;

        info!("finished in {:#?}", self.start.elapsed());
        info!("results:");
        for path in &report.parameters.output_paths {
            info!("- {}", path.display());
        }
        log::trace!("report written to {}", path.display());
        Ok(report)
    }
}
