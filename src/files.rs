//! Moving a ledger to and from files: format detection by path, and every
//! read/write run under a time limit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::ledger::{ImportReport, Ledger};
use crate::sheet::{csv_io, xlsx, Workbook};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xlsx,
    Json,
    /// A single `.csv` file holding one region.
    Csv,
    /// A directory of `.csv` files, one per region.
    CsvDir,
}

impl Format {
    /// Pick the format from the path: existing directories and paths without
    /// an extension are CSV directories, otherwise the extension decides.
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self::CsvDir);
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(Self::CsvDir);
        };
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" | "xls" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => bail!("Unsupported file type '.{other}' (expected xlsx, xls, json or csv)"),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Json => "json",
            Self::Csv | Self::CsvDir => "csv",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Xlsx => "spreadsheet",
            Self::Json => "JSON",
            Self::Csv => "CSV file",
            Self::CsvDir => "CSV directory",
        };
        write!(f, "{label}")
    }
}

/// True for the file types the importer understands.
pub fn is_importable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| matches!(e.as_str(), "xlsx" | "xlsm" | "xls" | "json" | "csv"))
}

/// `smeta-YYYYmmdd_HHMMSS.<ext>`, in local time.
pub fn timestamped_name(format: Format) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    match format {
        Format::CsvDir => format!("smeta-{stamp}"),
        other => format!("smeta-{stamp}.{}", other.extension()),
    }
}

/// Write the whole ledger to `path` in `format`. Returns the files written.
pub fn export(
    ledger: &Ledger,
    path: &Path,
    format: Format,
    timeout: Duration,
) -> Result<Vec<PathBuf>> {
    if ledger.is_empty() {
        bail!("Nothing to export: the ledger has no regions");
    }

    let target = path.to_path_buf();
    let written = match format {
        Format::Xlsx => {
            if target
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("xls"))
            {
                bail!("Only .xlsx can be written; .xls is read-only");
            }
            let book = ledger.export_all();
            export_staged(timeout, "Spreadsheet export", target, Layout::File, move |file| {
                xlsx::write_workbook(&book, file)?;
                Ok(vec![file.to_path_buf()])
            })?
        }
        Format::Json => {
            let json = ledger.export_json().context("Failed to serialize ledger")?;
            export_staged(timeout, "JSON export", target, Layout::File, move |file| {
                std::fs::write(file, json)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                Ok(vec![file.to_path_buf()])
            })?
        }
        Format::Csv => {
            let book = ledger.export_all();
            let [sheet] = book.sheets.as_slice() else {
                bail!(
                    "A single CSV file holds one region; export {} regions to a directory instead",
                    book.sheets.len()
                );
            };
            let sheet = sheet.clone();
            export_staged(timeout, "CSV export", target, Layout::File, move |file| {
                csv_io::write_sheet(&sheet, file)?;
                Ok(vec![file.to_path_buf()])
            })?
        }
        Format::CsvDir => {
            let book = ledger.export_all();
            export_staged(timeout, "CSV export", target, Layout::Dir, move |dir| {
                csv_io::write_workbook_dir(&book, dir)
            })?
        }
    };

    info!(path = %path.display(), %format, files = written.len(), "ledger exported");
    Ok(written)
}

/// Read `path` (format from [`Format::detect`]) into `ledger`.
///
/// Unreadable sheets and invalid records end up in the report; only a file
/// that cannot be opened at all, malformed JSON or a timeout is an error.
pub fn import(ledger: &mut Ledger, path: &Path, timeout: Duration) -> Result<ImportReport> {
    let format = Format::detect(path)?;
    let source = path.to_path_buf();

    let report = match format {
        Format::Json => {
            let text = run_with_timeout(timeout, "JSON import", move || {
                std::fs::read_to_string(&source)
                    .with_context(|| format!("Failed to read {}", source.display()))
            })?;
            ledger
                .import_json(&text)
                .with_context(|| format!("{} is not a valid ledger snapshot", path.display()))?
        }
        Format::Xlsx | Format::Csv | Format::CsvDir => {
            let (book, read_issues) =
                run_with_timeout(timeout, "Spreadsheet import", move || {
                    read_workbook(format, &source)
                })?;
            let mut report = ledger.import_all(&book);
            report.prepend_issues(read_issues);
            report
        }
    };

    info!(
        path = %path.display(),
        imported = report.imported_count(),
        issues = report.issues.len(),
        "import finished"
    );
    Ok(report)
}

fn read_workbook(
    format: Format,
    path: &Path,
) -> Result<(Workbook, Vec<crate::ledger::ImportIssue>)> {
    match format {
        Format::Xlsx => xlsx::read_workbook(path),
        Format::Csv => Ok((
            Workbook {
                sheets: vec![csv_io::read_sheet(path)?],
            },
            Vec::new(),
        )),
        Format::CsvDir => csv_io::read_workbook_dir(path),
        Format::Json => bail!("JSON is not a workbook"),
    }
}

/// Run `job` on a worker thread and give up waiting after `timeout`.
///
/// A job that overruns keeps running detached and its result is dropped, so
/// only jobs without side effects (reads) go through here. Exports use
/// [`export_staged`].
pub fn run_with_timeout<T, F>(timeout: Duration, what: &str, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("smeta-io".into())
        .spawn(move || {
            let _ = tx.send(job());
        })
        .context("Failed to start I/O worker")?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            bail!("{what} timed out after {}s", timeout.as_secs_f32())
        }
        Err(RecvTimeoutError::Disconnected) => bail!("{what} stopped unexpectedly"),
    }
}

/// What the export target is: one file, or a directory of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    File,
    Dir,
}

/// Who got to the commit point first: the worker or the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Writing,
    Committed,
    Abandoned,
}

/// Write an export into a staging directory beside `target`, then move the
/// files into place, all under `timeout`.
///
/// `write` gets the staging path to fill (a file path for [`Layout::File`],
/// a directory for [`Layout::Dir`]) and returns the files it created. Nothing
/// reaches `target` unless the caller is still waiting when the write
/// finishes; an export that times out leaves the target untouched and its
/// staging directory is removed.
fn export_staged<F>(
    timeout: Duration,
    what: &str,
    target: PathBuf,
    layout: Layout,
    write: F,
) -> Result<Vec<PathBuf>>
where
    F: FnOnce(&Path) -> Result<Vec<PathBuf>> + Send + 'static,
{
    let stage = Arc::new(Mutex::new(Stage::Writing));
    let worker_stage = Arc::clone(&stage);
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("smeta-export".into())
        .spawn(move || {
            let _ = tx.send(stage_and_commit(&target, layout, &worker_stage, write));
        })
        .context("Failed to start I/O worker")?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            let mut state = stage.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == Stage::Committed {
                // Files are already in place; the result is on its way.
                drop(state);
                return match rx.recv() {
                    Ok(result) => result,
                    Err(_) => bail!("{what} stopped unexpectedly"),
                };
            }
            *state = Stage::Abandoned;
            warn!(%what, "export abandoned after its time limit");
            bail!(
                "{what} timed out after {}s; nothing was written",
                timeout.as_secs_f32()
            )
        }
        Err(RecvTimeoutError::Disconnected) => bail!("{what} stopped unexpectedly"),
    }
}

fn stage_and_commit<F>(
    target: &Path,
    layout: Layout,
    stage: &Mutex<Stage>,
    write: F,
) -> Result<Vec<PathBuf>>
where
    F: FnOnce(&Path) -> Result<Vec<PathBuf>>,
{
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if layout == Layout::Dir {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file_name = target
        .file_name()
        .with_context(|| format!("{} has no file name", target.display()))?;

    let staging = tempfile::Builder::new()
        .prefix(".smeta-export-")
        .tempdir_in(parent)
        .with_context(|| format!("Failed to create a staging directory in {}", parent.display()))?;
    let staged = write(&staging.path().join(file_name))?;

    let mut state = stage.lock().unwrap_or_else(PoisonError::into_inner);
    if *state == Stage::Abandoned {
        bail!("export finished after its time limit; discarded");
    }
    *state = Stage::Committed;

    if layout == Layout::Dir {
        std::fs::create_dir_all(target)
            .with_context(|| format!("Failed to create directory {}", target.display()))?;
    }
    let mut placed = Vec::with_capacity(staged.len());
    for file in staged {
        let dest = match layout {
            Layout::File => target.to_path_buf(),
            Layout::Dir => match file.file_name() {
                Some(name) => target.join(name),
                None => continue,
            },
        };
        std::fs::rename(&file, &dest)
            .with_context(|| format!("Failed to move export into {}", dest.display()))?;
        placed.push(dest);
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn sample() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set_total_budget("Bakı", dec!(1000)).unwrap();
        ledger.add_item("Bakı", "01", "Roads", dec!(600)).unwrap();
        ledger.set_total_budget("Sumqayıt", dec!(300)).unwrap();
        ledger.add_item("Sumqayıt", "01", "Parks", dec!(100)).unwrap();
        ledger
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(Format::detect(Path::new("a.xlsx")).unwrap(), Format::Xlsx);
        assert_eq!(Format::detect(Path::new("a.XLS")).unwrap(), Format::Xlsx);
        assert_eq!(Format::detect(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::detect(Path::new("a.csv")).unwrap(), Format::Csv);
        assert_eq!(Format::detect(Path::new("out")).unwrap(), Format::CsvDir);
        assert!(Format::detect(Path::new("a.pdf")).is_err());
    }

    #[test]
    fn test_detect_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Format::detect(dir.path()).unwrap(), Format::CsvDir);
    }

    #[test]
    fn test_is_importable() {
        assert!(is_importable(Path::new("budget.xlsx")));
        assert!(is_importable(Path::new("Budget.JSON")));
        assert!(!is_importable(Path::new("notes.txt")));
        assert!(!is_importable(Path::new("README")));
    }

    #[test]
    fn test_timestamped_name() {
        let name = timestamped_name(Format::Xlsx);
        assert!(name.starts_with("smeta-"));
        assert!(name.ends_with(".xlsx"));
        // smeta- + 8 date digits + _ + 6 time digits + .xlsx
        assert_eq!(name.len(), 6 + 15 + 5);
        assert!(!timestamped_name(Format::CsvDir).contains('.'));
    }

    #[test]
    fn test_export_empty_ledger_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = export(&Ledger::new(), &dir.path().join("x.json"), Format::Json, TIMEOUT)
            .unwrap_err();
        assert!(err.to_string().contains("Nothing to export"));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let original = sample();

        let written = export(&original, &path, Format::Json, TIMEOUT).unwrap();
        assert_eq!(written, vec![path.clone()]);

        let mut restored = Ledger::new();
        let report = import(&mut restored, &path, TIMEOUT).unwrap();
        assert_eq!(report.imported_count(), 2);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_xlsx_file_round_trip_applies_margin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");
        export(&sample(), &path, Format::Xlsx, TIMEOUT).unwrap();

        let mut restored = Ledger::new();
        let report = import(&mut restored, &path, TIMEOUT).unwrap();
        assert!(!report.has_issues());
        assert_eq!(restored.record("Bakı").unwrap().total_budget(), dec!(660));
        assert_eq!(restored.record("Sumqayıt").unwrap().total_budget(), dec!(110));
    }

    #[test]
    fn test_export_xls_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export(&sample(), &dir.path().join("a.xls"), Format::Xlsx, TIMEOUT).is_err());
    }

    #[test]
    fn test_csv_single_file_needs_one_region() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export(&sample(), &dir.path().join("a.csv"), Format::Csv, TIMEOUT).is_err());

        let mut one = Ledger::new();
        one.set_total_budget("Quba", dec!(50)).unwrap();
        one.add_item("Quba", "01", "Apples", dec!(20)).unwrap();
        let path = dir.path().join("Quba.csv");
        export(&one, &path, Format::Csv, TIMEOUT).unwrap();

        let mut restored = Ledger::new();
        import(&mut restored, &path, TIMEOUT).unwrap();
        assert_eq!(restored.record("Quba").unwrap().used_amount(), dec!(20));
    }

    #[test]
    fn test_csv_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("regions");
        let written = export(&sample(), &out, Format::CsvDir, TIMEOUT).unwrap();
        assert_eq!(written.len(), 2);

        let mut restored = Ledger::new();
        let report = import(&mut restored, &out, TIMEOUT).unwrap();
        assert_eq!(report.imported, vec!["Bakı", "Sumqayıt"]);
    }

    #[test]
    fn test_import_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::new();
        assert!(import(&mut ledger, &dir.path().join("gone.xlsx"), TIMEOUT).is_err());
        assert!(import(&mut ledger, &dir.path().join("gone.json"), TIMEOUT).is_err());
    }

    #[test]
    fn test_run_with_timeout_gives_up() {
        let err = run_with_timeout(Duration::from_millis(20), "Slow job", || {
            thread::sleep(Duration::from_millis(500));
            Ok(())
        })
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_run_with_timeout_passes_result() {
        let value = run_with_timeout(TIMEOUT, "Quick job", || Ok(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_timed_out_export_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("late.json");
        let err = export_staged(
            Duration::from_millis(20),
            "Slow export",
            target.clone(),
            Layout::File,
            |file| {
                thread::sleep(Duration::from_millis(200));
                std::fs::write(file, "{}")?;
                Ok(vec![file.to_path_buf()])
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));

        // Give the worker time to finish and discard its staging directory.
        thread::sleep(Duration::from_millis(800));
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_into_existing_dir_leaves_no_staging() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("regions");
        std::fs::create_dir(&out).unwrap();

        let written = export(&sample(), &out, Format::CsvDir, TIMEOUT).unwrap();
        assert_eq!(written, vec![out.join("Bakı.csv"), out.join("Sumqayıt.csv")]);

        let path = dir.path().join("ledger.xlsx");
        export(&sample(), &path, Format::Xlsx, TIMEOUT).unwrap();

        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["ledger.xlsx", "regions"]);
    }
}
