//! Domain layer: strong types, payload models and operation outcomes (no I/O).

pub mod date;
mod model;
mod outcome;
mod request;
mod validation;
mod value;

pub use model::{
    AccountInfo, AccountProperty, AddressBook, AggregatedBy, Campaign, CampaignContactActivity,
    CampaignInfo, CampaignSummary, Contact, DataField, DataFieldType, DataFieldVisibility,
    DataFields, FromAddress, JobReport, JobStatus, KeyVal, NewProgramEnrolment,
    PersonalisedContact, Program, ProgramEnrolment, SuppressedContact,
    TransactionalEmailStatistics,
};
pub use outcome::{BatchSummary, Failure, Listing, Outcome};
pub use request::{
    ListOptions, MAX_PAGE_SIZE, PROCESS_BATCH_SIZE, StatisticsQuery, TriggeredEmail,
};
pub use validation::ValidationError;
pub use value::{ApiUrl, ApiVersion, ErrorCode, KnownErrorCode, Password, Username};
