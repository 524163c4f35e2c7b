use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{path_date, upload_records, with_full_data};
use crate::client::DotmailerClient;
use crate::domain::{
    AddressBook, BatchSummary, Contact, Failure, JobReport, JobStatus, ListOptions, Listing,
    Outcome, PROCESS_BATCH_SIZE, PersonalisedContact, SuppressedContact,
};
use crate::transport::{CsvExport, path};

#[derive(Clone, Copy)]
/// Account-wide contacts.
pub struct ContactResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> ContactResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// Fetch a contact by id.
    pub async fn get(&self, id: i64) -> Outcome<Contact> {
        let url = self.client.url(&path::with_id(path::CONTACT, id));
        self.client.get(&url).await
    }

    /// Fetch a contact by email address.
    pub async fn get_by_email(&self, email: &str) -> Outcome<Contact> {
        let url = self.client.url(&path::with_param(path::CONTACT, email));
        self.client.get(&url).await
    }

    /// All contacts, or those created since `options.since` when it is set.
    pub async fn list(&self, options: ListOptions) -> Listing<Contact> {
        self.fetch_contacts(&options).await
    }

    /// Contacts with their data fields decoded into `D`.
    pub async fn list_personalised<D: DeserializeOwned>(
        &self,
        options: ListOptions,
    ) -> Listing<PersonalisedContact<D>> {
        self.fetch_contacts(&options).await
    }

    /// Stream every contact to `callback`, one batch of up to [`PROCESS_BATCH_SIZE`]
    /// contacts at a time, until a batch comes back empty.
    pub async fn process_all<D, F>(&self, options: ListOptions, callback: F) -> Outcome<BatchSummary>
    where
        D: DeserializeOwned,
        F: FnMut(Vec<PersonalisedContact<D>>),
    {
        let url = self.contacts_url(&options);
        self.client
            .for_each_batch(&url, options.page_size(), PROCESS_BATCH_SIZE, callback)
            .await
    }

    /// Contacts that unsubscribed account-wide since `since`.
    pub async fn list_unsubscribed(
        &self,
        since: DateTime<Utc>,
        options: ListOptions,
    ) -> Listing<SuppressedContact> {
        self.fetch_since(path::CONTACTS_UNSUBSCRIBED_SINCE, &since, &options)
            .await
    }

    /// Contacts suppressed since `since` (unsubscribes, bounces, complaints).
    pub async fn list_suppressed(
        &self,
        since: DateTime<Utc>,
        options: ListOptions,
    ) -> Listing<SuppressedContact> {
        self.fetch_since(path::CONTACTS_SUPPRESSED_SINCE, &since, &options)
            .await
    }

    /// Address books the contact belongs to.
    pub async fn list_address_books(&self, id: i64, options: ListOptions) -> Listing<AddressBook> {
        let url = self.client.url(&path::with_id(path::CONTACT_ADDRESS_BOOKS, id));
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Create a contact. Provider-assigned fields such as `id` may be left unset.
    pub async fn create(&self, contact: &Contact) -> Outcome<Contact> {
        let url = self.client.url(path::CONTACTS);
        self.client.post(&url, contact).await
    }

    /// Update a contact identified by its `id`.
    pub async fn update(&self, contact: &Contact) -> Outcome<Contact> {
        let Some(id) = contact.id else {
            return Failure::input("contact id is required to update a contact").into();
        };
        let url = self.client.url(&path::with_id(path::CONTACT, id));
        self.client.put(&url, contact).await
    }

    /// Delete a contact by id.
    pub async fn delete(&self, id: i64) -> Outcome<()> {
        let url = self.client.url(&path::with_id(path::CONTACT, id));
        self.client.delete(&url).await
    }

    /// Write `records` to a transient file and start an account-wide import job.
    pub async fn import_contacts<R: Serialize>(
        &self,
        records: &[R],
        export: &CsvExport,
    ) -> Outcome<JobStatus> {
        let url = self.client.url(path::CONTACTS_IMPORT);
        upload_records(self.client, &url, records, export).await
    }

    /// Progress of an import job started with [`ContactResource::import_contacts`].
    pub async fn import_status(&self, job_id: &str) -> Outcome<JobStatus> {
        let url = self
            .client
            .url(&path::with_param(path::CONTACTS_IMPORT_STATUS, job_id));
        self.client.get(&url).await
    }

    /// Counts of a finished import job.
    pub async fn import_report(&self, job_id: &str) -> Outcome<JobReport> {
        let url = self
            .client
            .url(&path::with_param(path::CONTACTS_IMPORT_REPORT, job_id));
        self.client.get(&url).await
    }

    fn contacts_url(&self, options: &ListOptions) -> String {
        let resource = match &options.since {
            Some(since) => path::with_param(path::CONTACTS_CREATED_SINCE, &path_date(since, options)),
            None => path::CONTACTS.to_owned(),
        };
        with_full_data(&self.client.url(&resource), options)
    }

    async fn fetch_contacts<T: DeserializeOwned>(&self, options: &ListOptions) -> Listing<T> {
        let url = self.contacts_url(options);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    async fn fetch_since<T: DeserializeOwned>(
        &self,
        template: &str,
        since: &DateTime<Utc>,
        options: &ListOptions,
    ) -> Listing<T> {
        let url = self
            .client
            .url(&path::with_param(template, &path_date(since, options)));
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::client::HttpMethod;
    use crate::client::testing::{FakeTransport, make_client};
    use crate::domain::DataFields;

    use super::*;

    #[tokio::test]
    async fn list_without_since_uses_contacts_endpoint() {
        let transport = FakeTransport::remote(3);
        let client = make_client(transport.clone());

        let contacts = client.contacts().list(ListOptions::default()).await;
        assert_eq!(contacts.records().len(), 3);
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/contacts?withFullData=false&select=1000&skip=0"
        );
    }

    #[tokio::test]
    async fn list_with_since_uses_created_since_endpoint() {
        let transport = FakeTransport::remote(0);
        let client = make_client(transport.clone());
        let since = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();

        let _ = client
            .contacts()
            .list(ListOptions::new().since(since).limit(10))
            .await;
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/contacts/created-since/2023-12-31?withFullData=false&select=10&skip=0"
        );
    }

    #[tokio::test]
    async fn personalised_contacts_decode_data_fields() {
        let body = r#"[
          {"id": 1, "email": "ann@example.com", "dataFields": [{"key": "FIRSTNAME", "value": "Ann"}]}
        ]"#;
        let client = make_client(FakeTransport::new(200, body));

        let contacts = client
            .contacts()
            .list_personalised::<DataFields>(ListOptions::new().with_full_data(true))
            .await;
        assert!(contacts.is_complete());
        assert_eq!(contacts.records()[0].details.get("FIRSTNAME"), Some("Ann"));
    }

    #[tokio::test]
    async fn process_all_streams_until_empty_batch() {
        let transport = FakeTransport::remote(50_010);
        let client = make_client(transport.clone());

        let mut sizes = Vec::new();
        let outcome = client
            .contacts()
            .process_all(ListOptions::new(), |batch: Vec<PersonalisedContact<DataFields>>| {
                sizes.push(batch.len())
            })
            .await;

        assert_eq!(sizes, vec![50_000, 10]);
        assert_eq!(outcome.data().map(|s| s.batches), Some(2));
        let skips: Vec<usize> = transport.page_requests().iter().map(|(_, skip)| *skip).collect();
        assert_eq!(skips.last(), Some(&100_000));
    }

    #[tokio::test]
    async fn suppressed_and_unsubscribed_use_their_endpoints() {
        let transport = FakeTransport::remote(0);
        let client = make_client(transport.clone());
        let since = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();

        let _ = client.contacts().list_suppressed(since, ListOptions::new()).await;
        let _ = client.contacts().list_unsubscribed(since, ListOptions::new()).await;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.invalid/v2/contacts/suppressed-since/2024-02-03?select=1000&skip=0",
                "https://example.invalid/v2/contacts/unsubscribed-since/2024-02-03?select=1000&skip=0",
            ]
        );
    }

    #[tokio::test]
    async fn update_requires_an_id() {
        let transport = FakeTransport::new(200, "{}");
        let client = make_client(transport.clone());

        let contact = Contact {
            email: "ann@example.com".to_owned(),
            ..Default::default()
        };
        let outcome = client.contacts().update(&contact).await;
        assert_eq!(outcome.failure().map(|f| f.code().as_str()), Some("ERROR_INPUT"));
        assert!(transport.requests().is_empty());

        let transport = FakeTransport::new(200, r#"{"id": 5, "email": "ann@example.com"}"#);
        let client = make_client(transport.clone());
        let contact = Contact {
            id: Some(5),
            ..contact
        };
        let outcome = client.contacts().update(&contact).await;
        assert_eq!(outcome.data().and_then(|c| c.id), Some(5));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "https://example.invalid/v2/contacts/5");
    }

    #[tokio::test]
    async fn import_status_and_report_use_job_id() {
        let transport = FakeTransport::new(200, r#"{"id": "abc", "status": "Finished"}"#);
        let client = make_client(transport.clone());

        let status = client.contacts().import_status("abc").await;
        assert_eq!(status.data().and_then(|s| s.status.as_deref()), Some("Finished"));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/contacts/import/abc"
        );

        let transport = FakeTransport::new(200, r#"{"newContacts": 4, "failures": 1}"#);
        let client = make_client(transport.clone());
        let report = client.contacts().import_report("abc").await;
        assert_eq!(report.data().and_then(|r| r.new_contacts), Some(4));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/contacts/import/abc/report"
        );
    }

    #[tokio::test]
    async fn delete_and_lookup_by_email() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(transport.clone());
        assert_eq!(client.contacts().delete(9).await, Outcome::SuccessEmpty);
        assert_eq!(transport.last_request().unwrap().method, HttpMethod::Delete);

        let transport = FakeTransport::new(200, r#"{"id": 9, "email": "ann@example.com"}"#);
        let client = make_client(transport.clone());
        let contact = client.contacts().get_by_email("ann@example.com").await;
        assert_eq!(contact.data().and_then(|c| c.id), Some(9));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/contacts/ann@example.com"
        );
    }
}
