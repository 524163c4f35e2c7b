//! Resource facades: one borrowing handle per API area.
//!
//! Facades only assemble paths and pick the request shape; paging, error mapping and
//! file handling live in the client and transport layers.

mod account_info;
mod address_book;
mod campaign;
mod contact;
mod data_field;
mod program;
mod transactional;

pub use account_info::AccountInfoResource;
pub use address_book::AddressBookResource;
pub use campaign::CampaignResource;
pub use contact::ContactResource;
pub use data_field::DataFieldResource;
pub use program::ProgramResource;
pub use transactional::TransactionalResource;

use serde::Serialize;

use crate::client::DotmailerClient;
use crate::domain::{JobStatus, ListOptions, Outcome, date};
use crate::transport::{CsvExport, path, write_csv_blocking_task};

/// `url` with the `withFullData` attribute.
fn with_full_data(url: &str, options: &ListOptions) -> String {
    let value = if options.with_full_data { "true" } else { "false" };
    path::add_attribute(url, path::WITH_FULL_DATA, value)
}

fn path_date(since: &chrono::DateTime<chrono::Utc>, options: &ListOptions) -> String {
    date::format_for_path(since, options.round_to_date)
}

/// Write `records` to an export file, upload it to `url`, then delete the file.
async fn upload_records<R: Serialize>(
    client: &DotmailerClient,
    url: &str,
    records: &[R],
    export: &CsvExport,
) -> Outcome<JobStatus> {
    let file = match write_csv_blocking_task(records, export, client.export_dir()).await {
        Outcome::Success(file) => file,
        Outcome::SuccessEmpty => return Outcome::SuccessEmpty,
        Outcome::Failure(failure) => return failure.into(),
    };
    tracing::debug!(url, records = file.records(), "uploading import file");

    let outcome = client.post_file(url, file.path()).await;

    let file_path = file.path().to_path_buf();
    if let Err(err) = file.close() {
        tracing::warn!(path = %file_path.display(), error = %err, "import file could not be deleted");
    }
    outcome
}
