//! Bulk-import files: typed records written as a delimited file in a unique temp file.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::domain::{Failure, Outcome};

const FILE_PREFIX: &str = "dotmailer-contacts-";
const FILE_SUFFIX: &str = ".csv";
const RANDOM_LEN: usize = 10;
const EMPTY_INPUT: &str = "List is empty, nothing to write";

/// Renders one cell from the serialized field value.
pub type CellTransform = Arc<dyn Fn(&Value) -> String + Send + Sync>;

#[derive(Clone)]
/// How records are laid out in an export file.
///
/// Without explicit `fields`, the field list is the key order of the first record's
/// serialized form. Without explicit `headers`, the field list doubles as the header row.
pub struct CsvExport {
    headers: Option<Vec<String>>,
    fields: Option<Vec<String>>,
    transforms: HashMap<String, CellTransform>,
    delimiter: u8,
}

impl Default for CsvExport {
    fn default() -> Self {
        Self {
            headers: None,
            fields: None,
            transforms: HashMap::new(),
            delimiter: b',',
        }
    }
}

impl fmt::Debug for CsvExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut transformed: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        transformed.sort_unstable();
        f.debug_struct("CsvExport")
            .field("headers", &self.headers)
            .field("fields", &self.fields)
            .field("transforms", &transformed)
            .field("delimiter", &char::from(self.delimiter))
            .finish()
    }
}

impl CsvExport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header row to write instead of the field names.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Serialized field names to emit, in column order.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Render `field` with `transform` instead of the default cell rendering.
    pub fn transform<F>(mut self, field: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.transforms.insert(field.into(), Arc::new(transform));
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[derive(Debug)]
/// A written export file. The file is removed on [`ExportFile::close`] or drop.
pub struct ExportFile {
    file: NamedTempFile,
    records: usize,
}

impl ExportFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of data rows (the header row excluded).
    pub fn records(&self) -> usize {
        self.records
    }

    /// Delete the file now, reporting any error.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

#[derive(Debug, thiserror::Error)]
enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("record {index} does not serialize to a map of fields")]
    NotAMap { index: usize },
    #[error("export task failed: {0}")]
    Task(String),
}

/// Write `records` to a new uniquely named file under `dir`.
///
/// An empty slice is rejected with `ERROR_CSV` before anything touches the filesystem.
/// Any I/O, serialization or layout problem is reported as `ERROR_CSV` and the partial
/// file is removed. The file is written on the calling thread; async callers should
/// prefer [`write_csv_blocking_task`].
pub fn write_csv<R: Serialize>(records: &[R], export: &CsvExport, dir: &Path) -> Outcome<ExportFile> {
    if records.is_empty() {
        tracing::warn!("export requested for an empty record list");
        return Failure::csv(EMPTY_INPUT).into();
    }

    let written = serialize_rows(records).and_then(|rows| write_rows(&rows, export, dir));
    into_outcome(written, dir)
}

/// Like [`write_csv`], but the file is written on tokio's blocking thread pool.
///
/// Records are serialized on the calling task; only the file I/O moves off it.
pub async fn write_csv_blocking_task<R: Serialize>(
    records: &[R],
    export: &CsvExport,
    dir: &Path,
) -> Outcome<ExportFile> {
    if records.is_empty() {
        tracing::warn!("export requested for an empty record list");
        return Failure::csv(EMPTY_INPUT).into();
    }

    let rows = match serialize_rows(records) {
        Ok(rows) => rows,
        Err(err) => return into_outcome(Err(err), dir),
    };
    let task_export = export.clone();
    let task_dir = dir.to_path_buf();
    let written = tokio::task::spawn_blocking(move || write_rows(&rows, &task_export, &task_dir))
        .await
        .unwrap_or_else(|err| Err(ExportError::Task(err.to_string())));
    into_outcome(written, dir)
}

fn into_outcome(written: Result<ExportFile, ExportError>, dir: &Path) -> Outcome<ExportFile> {
    match written {
        Ok(file) => {
            tracing::debug!(path = %file.path().display(), records = file.records, "export file written");
            Outcome::Success(file)
        }
        Err(err) => {
            tracing::error!(dir = %dir.display(), error = %err, "failed to write export file");
            Failure::csv(err.to_string()).into()
        }
    }
}

/// Field names in the serialized key order of `record`, or `None` if it is not a map.
pub fn derive_field_names<R: Serialize>(record: &R) -> Option<Vec<String>> {
    match serde_json::to_value(record).ok()? {
        Value::Object(map) => Some(map.keys().cloned().collect()),
        _ => None,
    }
}

fn serialize_rows<R: Serialize>(records: &[R]) -> Result<Vec<Map<String, Value>>, ExportError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(ExportError::NotAMap { index }),
        })
        .collect()
}

fn write_rows(
    rows: &[Map<String, Value>],
    export: &CsvExport,
    dir: &Path,
) -> Result<ExportFile, ExportError> {

    // Empty lists count as not given.
    let fields = match &export.fields {
        Some(fields) if !fields.is_empty() => fields.clone(),
        _ => rows
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default(),
    };
    let headers = export
        .headers
        .as_ref()
        .filter(|headers| !headers.is_empty())
        .unwrap_or(&fields);

    let mut file = tempfile::Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(FILE_SUFFIX)
        .rand_bytes(RANDOM_LEN)
        .tempfile_in(dir)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(export.delimiter)
            .from_writer(file.as_file_mut());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(fields.iter().map(|field| render(row, field, export)))?;
        }
        writer.flush()?;
    }

    Ok(ExportFile {
        file,
        records: rows.len(),
    })
}

fn render(row: &Map<String, Value>, field: &str, export: &CsvExport) -> String {
    let value = row.get(field).unwrap_or(&Value::Null);
    match export.transforms.get(field) {
        Some(transform) => transform(value),
        None => render_cell(value),
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
