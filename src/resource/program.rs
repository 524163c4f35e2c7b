use crate::client::DotmailerClient;
use crate::domain::{
    ListOptions, Listing, NewProgramEnrolment, Outcome, Program, ProgramEnrolment,
};
use crate::transport::path;

#[derive(Clone, Copy)]
/// Automation programs and enrolments.
pub struct ProgramResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> ProgramResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// Automation programs of the account.
    pub async fn list(&self, options: ListOptions) -> Listing<Program> {
        let url = self.client.url(path::PROGRAMS);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Fetch a program by id.
    pub async fn get(&self, id: i64) -> Outcome<Program> {
        let url = self.client.url(&path::with_id(path::PROGRAM, id));
        self.client.get(&url).await
    }

    /// Enrol contacts and/or address books into a program.
    pub async fn enrol(&self, enrolment: &NewProgramEnrolment) -> Outcome<ProgramEnrolment> {
        let url = self.client.url(path::PROGRAM_ENROLMENTS);
        self.client.post(&url, enrolment).await
    }

    /// Fetch an enrolment by its id.
    pub async fn enrolment(&self, id: &str) -> Outcome<ProgramEnrolment> {
        let url = self
            .client
            .url(&path::with_param(path::PROGRAM_ENROLMENT, id));
        self.client.get(&url).await
    }

    /// Enrolments in the given status, e.g. `"Active"` or `"Finished"`.
    pub async fn enrolments_by_status(
        &self,
        status: &str,
        options: ListOptions,
    ) -> Listing<ProgramEnrolment> {
        let url = self
            .client
            .url(&path::with_param(path::PROGRAM_ENROLMENT, status));
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }
}
