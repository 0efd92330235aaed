//! Question catalog loader.
//!
//! Every `*.csv` file in the categories directory is one category named after
//! the file stem. Each file is validated on its own: a broken source is
//! skipped and reported, the rest still load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quiz_core::model::{Category, QuestionBank};
use thiserror::Error;
use tracing::{info, warn};

mod csv_source;

/// Errors that stop the whole catalog from loading.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("cannot read categories directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a source was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipReason {
    #[error("unreadable: {0}")]
    Unreadable(String),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no rows with level, question and answer")]
    NoQuestions,
}

/// Validation result for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Loaded { category: Category, dropped_rows: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub name: String,
    pub path: PathBuf,
    pub levels: usize,
    pub questions: usize,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub name: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of loading a categories directory.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub bank: QuestionBank,
    pub loaded: Vec<LoadedSource>,
    pub skipped: Vec<SkippedSource>,
}

fn is_source(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Validate and read one source file.
#[must_use]
pub fn read_source(path: &Path) -> SourceOutcome {
    csv_source::read_source(path)
}

/// Load every category under `dir`. A missing directory is created and
/// yields an empty catalog.
///
/// # Errors
///
/// Returns `CatalogError::Directory` if the directory cannot be created or
/// listed. Problems with individual files never fail the load.
pub fn load_categories(dir: &Path) -> Result<CatalogLoad, CatalogError> {
    let dir_error = |source| CatalogError::Directory {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(dir_error)?;

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(dir_error)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_source(path))
        .collect();
    paths.sort();

    let mut categories = BTreeMap::new();
    let mut load = CatalogLoad::default();

    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        match read_source(&path) {
            SourceOutcome::Loaded {
                category,
                dropped_rows,
            } => {
                load.loaded.push(LoadedSource {
                    name: name.clone(),
                    path: path.clone(),
                    levels: category.level_numbers().count(),
                    questions: category.question_count(),
                    dropped_rows,
                });
                categories.insert(name, category);
            }
            SourceOutcome::Skipped(reason) => {
                warn!(
                    target: "catalog",
                    path = %path.display(),
                    %reason,
                    "question source skipped"
                );
                load.skipped.push(SkippedSource { name, path, reason });
            }
        }
    }

    load.bank = QuestionBank::new(categories);
    info!(
        target: "catalog",
        dir = %dir.display(),
        categories = load.loaded.len(),
        skipped = load.skipped.len(),
        "catalog loaded"
    );
    Ok(load)
}
