//! Directory batch processing.
//!
//! Every PDF and JSON feed file in an input directory gets its outline
//! written to `<stem>.json` in the output directory. One bad document never
//! stops the batch: its error is logged and recorded in the report.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::feed::ExtractOptions;
use crate::outline::OutlineConfig;
use crate::render::{self, JsonFormat};
use crate::Outliner;

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned for `*.pdf` and `*.json` inputs
    pub input_dir: PathBuf,
    /// Directory receiving one `<stem>.json` per input
    pub output_dir: PathBuf,
    /// Output JSON format
    pub format: JsonFormat,
    /// PDF extraction options
    pub extract: ExtractOptions,
}

impl BatchOptions {
    /// Create options for an input and output directory.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            format: JsonFormat::Pretty,
            extract: ExtractOptions::default(),
        }
    }

    /// Set the output JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set PDF extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new("input", "output")
    }
}

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent<'a> {
    /// The outline was written to `output`
    Done { input: &'a Path, output: &'a Path },
    /// The input failed with `error`
    Failed { input: &'a Path, error: &'a str },
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// (input, written output) for each successful document
    pub processed: Vec<(PathBuf, PathBuf)>,
    /// (input, error message) for each failed document
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of inputs attempted.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Whether every input succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// List batch inputs: `*.pdf` (any case) and `*.json` files, sorted by path.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Other(format!(
            "input directory not found: {}",
            dir.display()
        )));
    }

    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_batch_input(path))
        .collect();
    inputs.sort();
    Ok(inputs)
}

fn is_batch_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf") || ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Output path for an input: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Process every input in `options.input_dir`.
pub fn run_batch(options: &BatchOptions, config: &OutlineConfig) -> Result<BatchReport> {
    run_batch_with_progress(options, config, |_| {})
}

/// Process every input, reporting each outcome to `progress`.
///
/// Fails only when the directories themselves are unusable.
pub fn run_batch_with_progress<F>(
    options: &BatchOptions,
    config: &OutlineConfig,
    mut progress: F,
) -> Result<BatchReport>
where
    F: FnMut(BatchEvent<'_>),
{
    let inputs = discover_inputs(&options.input_dir)?;
    fs::create_dir_all(&options.output_dir)?;

    log::info!(
        "Processing {} files from {}",
        inputs.len(),
        options.input_dir.display()
    );

    let outliner = Outliner::new()
        .with_config(config.clone())
        .with_extract_options(options.extract.clone());
    let mut report = BatchReport::default();

    for input in inputs {
        let output = output_path(&input, &options.output_dir);
        // A JSON input must not be overwritten by its own outline
        if output == input {
            let error = "output would overwrite input".to_string();
            log::error!("{}: {}", input.display(), error);
            progress(BatchEvent::Failed {
                input: &input,
                error: &error,
            });
            report.failed.push((input, error));
            continue;
        }

        match process_one(&outliner, &input, &output, options.format) {
            Ok(()) => {
                log::info!("{} -> {}", input.display(), output.display());
                progress(BatchEvent::Done {
                    input: &input,
                    output: &output,
                });
                report.processed.push((input, output));
            }
            Err(e) => {
                let error = e.to_string();
                log::error!("Failed to process {}: {}", input.display(), error);
                progress(BatchEvent::Failed {
                    input: &input,
                    error: &error,
                });
                report.failed.push((input, error));
            }
        }
    }

    Ok(report)
}

fn process_one(outliner: &Outliner, input: &Path, output: &Path, format: JsonFormat) -> Result<()> {
    let doc = outliner.outline_file(input)?;
    let json = render::to_json(&doc, format)?;
    fs::write(output, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("in/Report.PDF"), Path::new("out")),
            PathBuf::from("out/Report.json")
        );
    }

    #[test]
    fn test_is_batch_input() {
        assert!(is_batch_input(Path::new("a.pdf")));
        assert!(is_batch_input(Path::new("a.PDF")));
        assert!(is_batch_input(Path::new("a.json")));
        assert!(!is_batch_input(Path::new("a.txt")));
        assert!(!is_batch_input(Path::new("pdf")));
    }

    #[test]
    fn test_discover_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.json", "c.txt", "A.PDF"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let names: Vec<String> = discover_inputs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["A.PDF", "a.json", "b.pdf"]);
    }

    #[test]
    fn test_missing_input_dir() {
        let options = BatchOptions::new("/nonexistent/input", "/nonexistent/output");
        assert!(run_batch(&options, &OutlineConfig::default()).is_err());
    }

    #[test]
    fn test_same_dir_json_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("feed.json"), b"{}").unwrap();
        let options = BatchOptions::new(dir.path(), dir.path());
        let report = run_batch(&options, &OutlineConfig::default()).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(fs::read(dir.path().join("feed.json")).unwrap(), b"{}");
    }
}
