//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{
    AccountInfo, ApiUrl, ApiVersion, Failure, Outcome, Password, Username, ValidationError,
};
use crate::resource::{
    AccountInfoResource, AddressBookResource, CampaignResource, ContactResource,
    DataFieldResource, ProgramResource, TransactionalResource,
};
use crate::transport::{ErrorTranslator, classify_error_body, path};

mod paging;
#[cfg(test)]
pub(crate) mod testing;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type TransportError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequestBody {
    Empty,
    Json(String),
    File { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpRequest {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) body: RequestBody,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: HttpRequest)
    -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
                HttpMethod::Put => self.client.put(&request.url),
                HttpMethod::Delete => self.client.delete(&request.url),
            };
            let builder = builder
                .basic_auth(
                    self.credentials.username.as_str(),
                    Some(self.credentials.password.as_str()),
                )
                .header(reqwest::header::ACCEPT, "application/json");
            let builder = match request.body {
                RequestBody::Empty => builder,
                RequestBody::Json(json) => builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(json),
                RequestBody::File { file_name, bytes } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str("text/csv")?;
                    builder.multipart(reqwest::multipart::Form::new().part("file", part))
                }
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// API user credentials, sent with HTTP basic authentication.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate and pair an API user name and password.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors raised while constructing a [`DotmailerClient`].
///
/// Operations never return this type: they report problems through [`Outcome`].
pub enum DotmailerError {
    /// HTTP client could not be created.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The account's regional endpoint could not be detected.
    #[error("invalid account: {reason}")]
    InvalidAccount { reason: String },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`DotmailerClient`].
pub struct DotmailerClientBuilder {
    credentials: Credentials,
    api_url: String,
    version: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    export_dir: Option<PathBuf>,
    error_translations: Option<PathBuf>,
}

impl DotmailerClientBuilder {
    /// Create a builder targeting the default region (`r1`) and API version (`/v2`).
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_url: path::API_URL.to_owned(),
            version: path::VERSION.to_owned(),
            timeout: None,
            user_agent: None,
            export_dir: None,
            error_translations: None,
        }
    }

    /// Override the API base URL, e.g. `https://r2-api.dotmailer.com`.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the API version segment.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set an HTTP client timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Directory for the transient files written by bulk imports.
    ///
    /// Defaults to the system temp directory.
    pub fn export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// Properties file with error translations layered over the built-in table.
    pub fn error_translations(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_translations = Some(path.into());
        self
    }

    /// Build a [`DotmailerClient`].
    pub fn build(self) -> Result<DotmailerClient, DotmailerError> {
        let api_url = ApiUrl::new(self.api_url)?;
        let version = ApiVersion::new(self.version)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| DotmailerError::Transport(Box::new(err)))?;

        Ok(DotmailerClient {
            base_url: format!("{}{}", api_url.as_str(), version.as_str()),
            translator: self
                .error_translations
                .map(|path| Arc::new(ErrorTranslator::load(path))),
            export_dir: self.export_dir.unwrap_or_else(std::env::temp_dir),
            http: Arc::new(ReqwestTransport {
                client,
                credentials: self.credentials,
            }),
        })
    }

    /// Detect the account's regional endpoint, then build a client against it.
    ///
    /// The detection request goes to the currently configured `api_url`.
    pub async fn autobuild(self) -> Result<DotmailerClient, DotmailerError> {
        let probe = self.clone().build()?;
        let endpoint = detect_endpoint(&probe).await?;
        tracing::debug!(endpoint = %endpoint, "detected account endpoint");
        self.api_url(endpoint).build()
    }
}

async fn detect_endpoint(probe: &DotmailerClient) -> Result<String, DotmailerError> {
    let info = match probe.account_info().get().await {
        Outcome::Success(info) => info,
        Outcome::SuccessEmpty => {
            return Err(DotmailerError::InvalidAccount {
                reason: "account info response was empty".to_owned(),
            });
        }
        Outcome::Failure(failure) => {
            return Err(DotmailerError::InvalidAccount {
                reason: failure.to_string(),
            });
        }
    };

    info.property(AccountInfo::API_ENDPOINT_PROPERTY)
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| DotmailerError::InvalidAccount {
            reason: format!(
                "account has no {} property",
                AccountInfo::API_ENDPOINT_PROPERTY
            ),
        })
}

#[derive(Clone)]
/// High-level dotmailer client.
///
/// Cloning is cheap; clones share the HTTP connection pool. Resource groups are
/// reached through accessors such as [`DotmailerClient::contacts`].
pub struct DotmailerClient {
    base_url: String,
    translator: Option<Arc<ErrorTranslator>>,
    export_dir: PathBuf,
    http: Arc<dyn HttpTransport>,
}

impl DotmailerClient {
    /// Create a client for the default region using default settings.
    ///
    /// For more customization, use [`DotmailerClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, DotmailerError> {
        Self::builder(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> DotmailerClientBuilder {
        DotmailerClientBuilder::new(credentials)
    }

    /// Create a client bound to the regional endpoint reported by the account.
    pub async fn autobuild(credentials: Credentials) -> Result<Self, DotmailerError> {
        Self::builder(credentials).autobuild().await
    }

    /// API base URL including the version segment.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn account_info(&self) -> AccountInfoResource<'_> {
        AccountInfoResource::new(self)
    }

    pub fn address_books(&self) -> AddressBookResource<'_> {
        AddressBookResource::new(self)
    }

    pub fn campaigns(&self) -> CampaignResource<'_> {
        CampaignResource::new(self)
    }

    pub fn contacts(&self) -> ContactResource<'_> {
        ContactResource::new(self)
    }

    pub fn data_fields(&self) -> DataFieldResource<'_> {
        DataFieldResource::new(self)
    }

    pub fn programs(&self) -> ProgramResource<'_> {
        ProgramResource::new(self)
    }

    pub fn transactional(&self) -> TransactionalResource<'_> {
        TransactionalResource::new(self)
    }

    fn translator(&self) -> &ErrorTranslator {
        match &self.translator {
            Some(translator) => translator,
            None => ErrorTranslator::global(),
        }
    }

    /// Full, normalized URL of a resource path.
    pub(crate) fn url(&self, resource_path: &str) -> String {
        path::normalize(&format!("{}{}", self.base_url, resource_path))
    }

    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: RequestBody,
    ) -> Result<HttpResponse, Failure> {
        let request = HttpRequest {
            method,
            url: url.to_owned(),
            body,
        };
        self.http.send(request).await.map_err(|err| {
            tracing::error!(?method, url, error = %err, "request failed");
            Failure::unknown(err.to_string())
        })
    }

    async fn execute_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        body: &B,
    ) -> Result<HttpResponse, Failure> {
        let json = serde_json::to_string(body).map_err(|err| Failure::unknown(err.to_string()))?;
        self.execute(method, url, RequestBody::Json(json)).await
    }

    fn read<T: DeserializeOwned>(&self, response: HttpResponse, blank_is_success: bool) -> Outcome<T> {
        if is_valid_status(response.status) {
            if !response.body.trim().is_empty() {
                return match serde_json::from_str(&response.body) {
                    Ok(data) => Outcome::Success(data),
                    Err(err) => {
                        tracing::error!(status = response.status, error = %err, "response could not be decoded");
                        Failure::unknown(err.to_string()).into()
                    }
                };
            }
            if blank_is_success {
                return Outcome::SuccessEmpty;
            }
        }
        classify_error_body(response.status, &response.body, self.translator()).into()
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Outcome<T> {
        match self.execute(HttpMethod::Get, url, RequestBody::Empty).await {
            Ok(response) => self.read(response, false),
            Err(failure) => failure.into(),
        }
    }

    pub(crate) async fn post<T, B>(&self, url: &str, body: &B) -> Outcome<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.execute_json(HttpMethod::Post, url, body).await {
            Ok(response) => self.read(response, false),
            Err(failure) => failure.into(),
        }
    }

    /// Like [`DotmailerClient::post`], but a blank successful body is `SuccessEmpty`.
    pub(crate) async fn post_allowing_empty<T, B>(&self, url: &str, body: &B) -> Outcome<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.execute_json(HttpMethod::Post, url, body).await {
            Ok(response) => self.read(response, true),
            Err(failure) => failure.into(),
        }
    }

    /// POST where only `204 No Content` counts as success.
    pub(crate) async fn post_expecting_no_content<B>(&self, url: &str, body: &B) -> Outcome<()>
    where
        B: Serialize + ?Sized,
    {
        match self.execute_json(HttpMethod::Post, url, body).await {
            Ok(response) if response.status == NO_CONTENT => Outcome::SuccessEmpty,
            Ok(response) => classify_error_body(response.status, &response.body, self.translator()).into(),
            Err(failure) => failure.into(),
        }
    }

    pub(crate) async fn put<T, B>(&self, url: &str, body: &B) -> Outcome<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.execute_json(HttpMethod::Put, url, body).await {
            Ok(response) => self.read(response, false),
            Err(failure) => failure.into(),
        }
    }

    pub(crate) async fn delete(&self, url: &str) -> Outcome<()> {
        match self.execute(HttpMethod::Delete, url, RequestBody::Empty).await {
            Ok(response) if is_valid_status(response.status) || response.status == NO_CONTENT => {
                Outcome::SuccessEmpty
            }
            Ok(response) => classify_error_body(response.status, &response.body, self.translator()).into(),
            Err(failure) => failure.into(),
        }
    }

    /// Upload the file at `file` as a multipart form part.
    pub(crate) async fn post_file<T: DeserializeOwned>(&self, url: &str, file: &Path) -> Outcome<T> {
        let bytes = match tokio::fs::read(file).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(path = %file.display(), error = %err, "upload file could not be read");
                return Failure::unknown(err.to_string()).into();
            }
        };
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contacts.csv".to_owned());

        let body = RequestBody::File { file_name, bytes };
        match self.execute(HttpMethod::Post, url, body).await {
            Ok(response) => self.read(response, false),
            Err(failure) => failure.into(),
        }
    }
}

const NO_CONTENT: u16 = 204;

fn is_valid_status(status: u16) -> bool {
    matches!(status, 200..=202)
}
