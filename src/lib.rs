//! Typed Rust client for the dotmailer email marketing REST API.
//!
//! The crate is split into a domain layer of strong types and payload models, a
//! transport layer for wire-format quirks (resource paths, error bodies, CSV
//! exports), and a client layer that orchestrates requests, pagination and bulk
//! imports. Every operation reports its result as an [`Outcome`] or a
//! [`Listing`]; nothing panics or returns early on provider errors.
//!
//! ```rust,no_run
//! use dotmailer::{Credentials, DotmailerClient, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dotmailer::DotmailerError> {
//!     let client = DotmailerClient::autobuild(Credentials::new("apiuser-...", "...")?).await?;
//!     let contacts = client.contacts().list(ListOptions::new().limit(500)).await;
//!     if let Some(failure) = contacts.failure() {
//!         eprintln!("stopped early: {failure}");
//!     }
//!     println!("{} contacts", contacts.records().len());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod resource;
mod transport;

pub use client::{Credentials, DotmailerClient, DotmailerClientBuilder, DotmailerError};
pub use domain::{
    AccountInfo, AddressBook, AggregatedBy, BatchSummary, Campaign, CampaignInfo, Contact,
    DataField, DataFields, ErrorCode, Failure, JobReport, JobStatus, KnownErrorCode, ListOptions,
    Listing, Outcome, PersonalisedContact, Program, StatisticsQuery, TriggeredEmail,
    ValidationError,
};
pub use transport::{
    CellTransform, CsvExport, ExportFile, ErrorTranslator, classify_error_body,
    derive_field_names, write_csv, write_csv_blocking_task,
};
