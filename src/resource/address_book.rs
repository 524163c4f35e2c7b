use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{path_date, upload_records, with_full_data};
use crate::client::DotmailerClient;
use crate::domain::{
    AddressBook, BatchSummary, Contact, JobStatus, ListOptions, Listing, Outcome,
    PROCESS_BATCH_SIZE, PersonalisedContact, SuppressedContact,
};
use crate::transport::{CsvExport, path};

#[derive(Clone, Copy)]
/// Address books and their contacts.
pub struct AddressBookResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> AddressBookResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// All address books (`limit` applies).
    pub async fn list(&self, options: ListOptions) -> Listing<AddressBook> {
        let url = self.client.url(path::ADDRESS_BOOKS);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Fetch one address book, with its contact count.
    pub async fn get(&self, id: i64) -> Outcome<AddressBook> {
        let url = self.client.url(&path::with_id(path::ADDRESS_BOOK, id));
        self.client.get(&url).await
    }

    /// Create an address book. `id` and `contacts` are ignored by the provider.
    pub async fn create(&self, address_book: &AddressBook) -> Outcome<AddressBook> {
        let url = self.client.url(path::ADDRESS_BOOKS);
        self.client.post(&url, address_book).await
    }

    /// Add (or update) a contact in the address book.
    pub async fn add_contact(&self, id: i64, contact: &Contact) -> Outcome<Contact> {
        let url = self
            .client
            .url(&path::with_id(path::ADDRESS_BOOK_CONTACTS, id));
        self.client.post(&url, contact).await
    }

    /// Remove contacts from the address book. Succeeds only on `204 No Content`.
    pub async fn delete_contacts(&self, id: i64, contact_ids: &[i64]) -> Outcome<()> {
        let url = self
            .client
            .url(&path::with_id(path::ADDRESS_BOOK_CONTACTS_DELETE, id));
        self.client.post_expecting_no_content(&url, contact_ids).await
    }

    /// Contacts of the address book (`with_full_data` and `limit` apply).
    pub async fn list_contacts(&self, id: i64, options: ListOptions) -> Listing<Contact> {
        self.fetch_contacts(id, &options).await
    }

    /// Contacts unsubscribed from the address book since `since`.
    pub async fn list_unsubscribed_contacts(
        &self,
        id: i64,
        since: DateTime<Utc>,
        options: ListOptions,
    ) -> Listing<SuppressedContact> {
        let resource = path::with_id_and_param(
            path::ADDRESS_BOOK_CONTACTS_UNSUBSCRIBED_SINCE,
            id,
            &path_date(&since, &options),
        );
        let url = self.client.url(&resource);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Contacts of the address book with their data fields decoded into `D`.
    pub async fn list_personalised_contacts<D: DeserializeOwned>(
        &self,
        id: i64,
        options: ListOptions,
    ) -> Listing<PersonalisedContact<D>> {
        self.fetch_contacts(id, &options).await
    }

    /// Stream every contact of the address book to `callback`, one batch of up to
    /// [`PROCESS_BATCH_SIZE`] contacts at a time.
    ///
    /// The address book's contact count decides how many batches are requested.
    pub async fn process_contacts<D, F>(
        &self,
        id: i64,
        options: ListOptions,
        callback: F,
    ) -> Outcome<BatchSummary>
    where
        D: DeserializeOwned,
        F: FnMut(Vec<PersonalisedContact<D>>),
    {
        let book = match self.get(id).await {
            Outcome::Success(book) => book,
            Outcome::SuccessEmpty => return Outcome::SuccessEmpty,
            Outcome::Failure(failure) => return failure.into(),
        };
        tracing::info!(address_book = id, contacts = book.contacts, "processing address book contacts");

        let url = self.contacts_url(id, &options);
        self.client
            .for_each_counted_batch(
                &url,
                options.page_size(),
                PROCESS_BATCH_SIZE,
                book.contacts,
                callback,
            )
            .await
    }

    /// Write `records` to a transient file and start an import job into the address
    /// book. The file is deleted once the upload has been attempted.
    pub async fn import_contacts<R: Serialize>(
        &self,
        id: i64,
        records: &[R],
        export: &CsvExport,
    ) -> Outcome<JobStatus> {
        let url = self
            .client
            .url(&path::with_id(path::ADDRESS_BOOK_CONTACTS_IMPORT, id));
        upload_records(self.client, &url, records, export).await
    }

    /// Start an import job from an existing file. The file is left in place.
    pub async fn import_file(&self, id: i64, file: impl AsRef<Path>) -> Outcome<JobStatus> {
        let url = self
            .client
            .url(&path::with_id(path::ADDRESS_BOOK_CONTACTS_IMPORT, id));
        self.client.post_file(&url, file.as_ref()).await
    }

    fn contacts_url(&self, id: i64, options: &ListOptions) -> String {
        let url = self
            .client
            .url(&path::with_id(path::ADDRESS_BOOK_CONTACTS, id));
        with_full_data(&url, options)
    }

    async fn fetch_contacts<T: DeserializeOwned>(&self, id: i64, options: &ListOptions) -> Listing<T> {
        let url = self.contacts_url(id, options);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }
}
