use std::cell::RefCell;
use std::fs;
use std::path::Path;

use ranalysis::analysis::{AnalysisContainer, Inputs};
use ranalysis::catalog::Catalog;
use ranalysis::error::{AnalysisError, RuntimeFailure};
use ranalysis::execution::{RawResult, Runtime};
use ranalysis::fields::{self, Series};
use ranalysis::introspect::DEFAULT_ENTRY;
use ranalysis::marshal::RVector;

/// In-memory runtime that records its calls and replays canned results.
struct FakeRuntime {
    results: Vec<RawResult>,
    calls: RefCell<Vec<(String, Vec<RVector>)>>,
}

impl FakeRuntime {
    fn returning(results: Vec<RawResult>) -> Self {
        Self {
            results,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Runtime for FakeRuntime {
    async fn invoke(
        &self,
        _script: &Path,
        entry: &str,
        args: &[RVector],
    ) -> Result<Vec<RawResult>, RuntimeFailure> {
        self.calls.borrow_mut().push((entry.to_string(), args.to_vec()));
        Ok(self.results.clone())
    }
}

struct UnnamedRuntime;

impl Runtime for UnnamedRuntime {
    async fn invoke(
        &self,
        _script: &Path,
        _entry: &str,
        _args: &[RVector],
    ) -> Result<Vec<RawResult>, RuntimeFailure> {
        Err(RuntimeFailure::UnnamedResult)
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn xyz_container(dir: &Path) -> AnalysisContainer {
    let path = write_script(
        dir,
        "sums.R",
        "process_data <- function(x, y, z) {\n  list(total = sum(x, y, z))\n}\n",
    );
    AnalysisContainer::new(path, DEFAULT_ENTRY).unwrap()
}

fn inputs(pairs: &[(&str, Series)]) -> Inputs {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn construction_extracts_name_and_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let container = xyz_container(dir.path());
    assert_eq!(container.name(), "sums");
    assert_eq!(container.entry(), DEFAULT_ENTRY);
    assert_eq!(container.parameters(), ["x", "y", "z"]);
}

#[test]
fn missing_script_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = AnalysisContainer::new(dir.path().join("absent.R"), DEFAULT_ENTRY).unwrap_err();
    assert!(matches!(err, AnalysisError::NotFound { .. }));
    assert_eq!(err.kind(), "NotFoundError");
}

#[test]
fn script_without_entry_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(dir.path(), "other.R", "analyse <- function(x) x\n");
    let err = AnalysisContainer::new(path, DEFAULT_ENTRY).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse { .. }));
    assert!(err.to_string().contains("process_data"));
}

#[tokio::test]
async fn run_rejects_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let container = xyz_container(dir.path());
    let runtime = FakeRuntime::returning(vec![RawResult::new("total", "[1] 6")]);

    let partial = inputs(&[
        ("x", Series::from(vec![1.0])),
        ("y", Series::from(vec![2.0])),
    ]);
    match container.run(&runtime, &partial).await {
        Err(AnalysisError::Validation { expected, received }) => {
            assert_eq!(expected, vec!["x", "y", "z"]);
            assert_eq!(received, vec!["x", "y"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(runtime.calls.borrow().is_empty());
}

#[tokio::test]
async fn run_rejects_unexpected_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let container = xyz_container(dir.path());
    let runtime = FakeRuntime::returning(vec![]);
    let extra = inputs(&[
        ("x", Series::from(vec![1.0])),
        ("y", Series::from(vec![2.0])),
        ("z", Series::from(vec![3.0])),
        ("w", Series::from(vec![4.0])),
    ]);
    let err = container.run(&runtime, &extra).await.unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
}

#[tokio::test]
async fn run_passes_arguments_in_declared_order() {
    let dir = tempfile::tempdir().unwrap();
    let container = xyz_container(dir.path());
    let runtime = FakeRuntime::returning(vec![
        RawResult::new("total", "[1] 21"),
        RawResult::new("note", "[1] \"three\\ncolumns\""),
    ]);

    let table = fields::parse("1 2 a\n3 4 b\n5 6 c");
    let shuffled = inputs(&[
        ("z", table.get("Field 3").unwrap().clone()),
        ("x", table.get("Field 1").unwrap().clone()),
        ("y", table.get("Field 2").unwrap().clone()),
    ]);

    let results = container.run(&runtime, &shuffled).await.unwrap();
    assert_eq!(results.labels(), vec!["TOTAL", "NOTE"]);
    assert_eq!(results.get("TOTAL"), Some(&["21".to_string()][..]));
    assert_eq!(
        results.get("NOTE"),
        Some(&["three".to_string(), "columns".to_string()][..])
    );

    let calls = runtime.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (entry, args) = &calls[0];
    assert_eq!(entry, DEFAULT_ENTRY);
    assert_eq!(
        args,
        &vec![
            RVector::Numeric(vec![1.0, 3.0, 5.0]),
            RVector::Numeric(vec![2.0, 4.0, 6.0]),
            RVector::Character(vec!["a".into(), "b".into(), "c".into()]),
        ]
    );
}

#[tokio::test]
async fn mixed_field_fails_before_execution() {
    let dir = tempfile::tempdir().unwrap();
    let container = xyz_container(dir.path());
    let runtime = FakeRuntime::returning(vec![]);
    let table = fields::parse("1 2 3\nn/a 4 5");
    let bound = inputs(&[
        ("x", table.get("Field 1").unwrap().clone()),
        ("y", table.get("Field 2").unwrap().clone()),
        ("z", table.get("Field 3").unwrap().clone()),
    ]);
    let err = container.run(&runtime, &bound).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Type { ref parameter, .. } if parameter == "x"));
    assert!(runtime.calls.borrow().is_empty());
}

#[tokio::test]
async fn runtime_failures_surface_as_runtime_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(dir.path(), "none.R", "process_data <- function() NULL\n");
    let container = AnalysisContainer::new(path, DEFAULT_ENTRY).unwrap();
    let err = container.run(&UnnamedRuntime, &Inputs::new()).await.unwrap_err();
    assert_eq!(err.kind(), "RuntimeError");
    assert!(err
        .to_string()
        .contains("entry function must return a named result collection"));
}

#[test]
fn catalog_scans_matching_scripts_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "regression.R", "process_data <- function(y, x, new_x) list(a = 1)\n");
    write_script(dir.path(), "anova.R", "process_data <- function(groups, values) list(a = 1)\n");
    write_script(dir.path(), "broken.R", "# no entry point here\n");
    write_script(dir.path(), "lower.r", "process_data <- function(x) list(a = 1)\n");
    write_script(dir.path(), "notes.txt", "process_data <- function(x) list(a = 1)\n");
    fs::create_dir(dir.path().join("nested.R")).unwrap();

    let catalog = Catalog::scan(dir.path(), DEFAULT_ENTRY, "R").unwrap();
    assert_eq!(catalog.names(), vec!["anova", "regression"]);
    assert_eq!(catalog.get("regression").unwrap().parameters(), ["y", "x", "new_x"]);
    assert!(catalog.get("lower").is_none());

    assert_eq!(catalog.rejected().len(), 1);
    assert!(catalog.rejected()[0].path.ends_with("broken.R"));
    assert!(matches!(catalog.rejected()[0].error, AnalysisError::Parse { .. }));
}

#[test]
fn catalog_of_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::scan(&dir.path().join("gone"), DEFAULT_ENTRY, "R").unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.rejected().is_empty());
}

#[test]
fn rescan_rebuilds_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_script(dir.path(), "first.R", "process_data <- function(a) list(a = a)\n");
    let before = Catalog::scan(dir.path(), DEFAULT_ENTRY, "R").unwrap();
    let held = before.get("first").unwrap().clone();

    fs::remove_file(first).unwrap();
    write_script(dir.path(), "second.R", "process_data <- function(b) list(b = b)\n");
    let after = Catalog::scan(dir.path(), DEFAULT_ENTRY, "R").unwrap();

    assert_eq!(after.names(), vec!["second"]);
    assert!(after.get("first").is_none());
    assert_eq!(held.parameters(), ["a"]);
}
