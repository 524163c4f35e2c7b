//! Transport layer: wire-format details (paths, error bodies, export files).

mod error;
mod export;
pub(crate) mod path;
mod translate;

pub use error::classify_error_body;
pub use export::{
    CellTransform, CsvExport, ExportFile, derive_field_names, write_csv, write_csv_blocking_task,
};
pub use translate::ErrorTranslator;
