//! In-process transport for unit tests: records requests and scripts responses.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::{BoxFuture, DotmailerClient, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::transport::ErrorTranslator;

pub(crate) const BASE_URL: &str = "https://example.invalid/v2";

#[derive(Debug, Clone)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    routes: Vec<(String, u16, String)>,
    script: VecDeque<(u16, String)>,
    remote: Option<Remote>,
    fallback: Option<(u16, String)>,
    failure: Option<String>,
}

/// Paginated collection honoring `select`/`skip`.
#[derive(Debug, Default)]
struct Remote {
    records: Vec<Value>,
    fail_from_skip: Option<(usize, u16, String)>,
}

impl Remote {
    fn page(&self, select: usize, skip: usize) -> (u16, String) {
        if let Some((from, status, body)) = &self.fail_from_skip {
            if skip >= *from {
                return (*status, body.clone());
            }
        }
        let page: Vec<&Value> = self.records.iter().skip(skip).take(select).collect();
        (200, serde_json::to_string(&page).unwrap())
    }
}

impl FakeTransport {
    fn with_state(state: FakeTransportState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Every request gets the same response.
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        Self::with_state(FakeTransportState {
            fallback: Some((status, body.into())),
            ..Default::default()
        })
    }

    /// Responses are handed out in order.
    pub(crate) fn scripted(responses: Vec<(u16, &str)>) -> Self {
        Self::with_state(FakeTransportState {
            script: responses
                .into_iter()
                .map(|(status, body)| (status, body.to_owned()))
                .collect(),
            ..Default::default()
        })
    }

    /// Every request fails before reaching a server.
    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self::with_state(FakeTransportState {
            failure: Some(message.into()),
            ..Default::default()
        })
    }

    /// A remote collection of `total` contact-shaped records.
    pub(crate) fn remote(total: usize) -> Self {
        let records = (0..total)
            .map(|i| json!({"id": i, "email": format!("user{i}@example.com"), "dataFields": []}))
            .collect();
        Self::with_state(FakeTransportState {
            remote: Some(Remote {
                records,
                fail_from_skip: None,
            }),
            ..Default::default()
        })
    }

    /// Pages starting at `skip` or later answer with `status` and `body`.
    pub(crate) fn fail_from_skip(self, skip: usize, status: u16, body: impl Into<String>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let remote = state.remote.get_or_insert_with(Remote::default);
            remote.fail_from_skip = Some((skip, status, body.into()));
        }
        self
    }

    /// Requests whose URL path ends with `suffix` get this response.
    pub(crate) fn with_route(self, suffix: &str, status: u16, body: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .push((suffix.to_owned(), status, body.into()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    /// `(select, skip)` of every paginated request, in order.
    pub(crate) fn page_requests(&self) -> Vec<(usize, usize)> {
        self.requests()
            .iter()
            .filter_map(|request| paging_of(&request.url))
            .collect()
    }
}

fn paging_of(url: &str) -> Option<(usize, usize)> {
    let url = url::Url::parse(url).ok()?;
    let mut select = None;
    let mut skip = None;
    for (name, value) in url.query_pairs() {
        match name.as_ref() {
            "select" => select = value.parse().ok(),
            "skip" => skip = value.parse().ok(),
            _ => {}
        }
    }
    Some((select?, skip?))
}

fn route_path(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());

            if let Some(message) = &state.failure {
                return Err(std::io::Error::other(message.clone()).into());
            }

            let routed = state
                .routes
                .iter()
                .find(|(suffix, _, _)| route_path(&request.url).ends_with(suffix.as_str()))
                .map(|(_, status, body)| (*status, body.clone()));
            let paged = match (&state.remote, paging_of(&request.url)) {
                (Some(remote), Some((select, skip))) => Some(remote.page(select, skip)),
                _ => None,
            };

            let (status, body) = routed
                .or(paged)
                .or_else(|| state.script.pop_front())
                .or_else(|| state.fallback.clone())
                .unwrap_or((500, String::new()));
            Ok(HttpResponse { status, body })
        })
    }
}

pub(crate) fn make_client(transport: FakeTransport) -> DotmailerClient {
    make_client_in(transport, &std::env::temp_dir())
}

pub(crate) fn make_client_in(transport: FakeTransport, export_dir: &Path) -> DotmailerClient {
    DotmailerClient {
        base_url: BASE_URL.to_owned(),
        translator: Some(Arc::new(ErrorTranslator::empty())),
        export_dir: export_dir.to_path_buf(),
        http: Arc::new(transport),
    }
}
