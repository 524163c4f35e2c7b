//! Paginated fetches: whole collections, bounded listings and batch streaming.

use serde::de::DeserializeOwned;

use super::DotmailerClient;
use crate::domain::{BatchSummary, Failure, Listing, Outcome};
use crate::transport::path;

const PAGING_IN_PATH: &str = "remove the select and skip attributes from the path to fetch the full list; \
     paging is managed by the client";

impl DotmailerClient {
    /// Fetch every record of the collection at `url`, `page_size` records per request.
    ///
    /// Pages are requested one after another with `skip = initial_skip, initial_skip +
    /// page_size, ...` until a short or empty page arrives, or until `limit` records
    /// (when `limit > 0`) have been gathered. The result never holds more than `limit`
    /// records. A failing page stops the fetch; the records gathered so far are kept.
    pub(crate) async fn fetch_all<T: DeserializeOwned>(
        &self,
        url: &str,
        page_size: usize,
        limit: usize,
        initial_skip: usize,
    ) -> Listing<T> {
        if path::has_paging_attributes(url) {
            return Listing::partial(Vec::new(), Failure::input(PAGING_IN_PATH), 0);
        }

        let page_size = page_size.max(1);
        let select = page_size.to_string();
        let mut records = Vec::new();
        let mut requests = 0;
        let mut skip = initial_skip;

        loop {
            let page_url = path::add_attribute(
                &path::add_attribute(url, path::SELECT, &select),
                path::SKIP,
                &skip.to_string(),
            );
            tracing::trace!(url = %page_url, "fetching page");
            requests += 1;

            let page: Vec<T> = match self.get(&page_url).await {
                Outcome::Success(page) => page,
                Outcome::SuccessEmpty => Vec::new(),
                Outcome::Failure(failure) => {
                    return Listing::partial(records, failure, requests);
                }
            };

            let received = page.len();
            records.extend(page);
            skip += page_size;

            if limit > 0 && records.len() >= limit {
                records.truncate(limit);
                break;
            }
            if received < page_size {
                break;
            }
        }

        Listing::complete(records, requests)
    }

    /// Hand the collection at `url` to `callback` in batches of at most `step` records.
    ///
    /// Stops after an empty batch. On failure, the records of the failing batch that
    /// were fetched are still delivered before the failure is returned.
    pub(crate) async fn for_each_batch<T, F>(
        &self,
        url: &str,
        page_size: usize,
        step: usize,
        callback: F,
    ) -> Outcome<BatchSummary>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>),
    {
        self.process_batches(url, page_size, step, None, callback).await
    }

    /// Like [`DotmailerClient::for_each_batch`], but batches are requested while the
    /// running skip is below `total`.
    pub(crate) async fn for_each_counted_batch<T, F>(
        &self,
        url: &str,
        page_size: usize,
        step: usize,
        total: u64,
        callback: F,
    ) -> Outcome<BatchSummary>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>),
    {
        self.process_batches(url, page_size, step, Some(total), callback)
            .await
    }

    async fn process_batches<T, F>(
        &self,
        url: &str,
        page_size: usize,
        step: usize,
        total: Option<u64>,
        mut callback: F,
    ) -> Outcome<BatchSummary>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>),
    {
        let step = step.max(1);
        tracing::info!(url, step, total, "batch processing started");

        let mut summary = BatchSummary::default();
        let mut skip = 0usize;
        loop {
            if total.is_some_and(|total| skip as u64 >= total) {
                break;
            }

            let (batch, failure) = self
                .fetch_all::<T>(url, page_size.min(step), step, skip)
                .await
                .into_parts();
            let received = batch.len();
            if received > 0 {
                summary.batches += 1;
                summary.records += received;
                callback(batch);
            }
            if let Some(failure) = failure {
                tracing::debug!(skip, code = %failure.code(), "batch processing stopped");
                return failure.into();
            }
            if received == 0 {
                break;
            }
            skip += step;
        }

        tracing::info!(
            batches = summary.batches,
            records = summary.records,
            "batch processing finished"
        );
        Outcome::Success(summary)
    }
}
