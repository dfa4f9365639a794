pub mod error;
pub mod patch;
pub mod query;
pub mod response;
pub mod stream;

pub use error::{ApiError, Result};
pub use patch::PatchOperation;
pub use query::{QueryParams, ResponseFormat};
pub use reqwest::StatusCode;
pub use response::{ApiResponse, Payload};
pub use stream::{ByteStream, StreamResponse, STREAM_CHUNK_SIZE};

use futures::TryStreamExt;
use patch::JSON_PATCH_CONTENT_TYPE;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use stream::rechunk;
use tracing::{debug, warn};
use url::Url;

#[derive(Clone)]
struct BasicAuth {
    username: String,
    password: String,
}

/// Client for the clinical reporting REST API.
///
/// Every call is a single attempt: no retries, no client-side timeout beyond
/// the transport default, and certificates are always verified.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: Option<BasicAuth>,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(ApiError::InvalidUrl)?;

        let client = Client::builder()
            .user_agent(format!("omicia-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: url,
            auth: None,
        })
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base_url}{path}` followed by the encoded query pairs.
    pub fn url(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };

        let mut url = Url::parse(&joined)?;
        query.apply(&mut url);
        Ok(url)
    }

    pub async fn get(&self, path: &str, query: &QueryParams) -> Result<ApiResponse> {
        let url = self.url(path, query)?;
        self.execute(self.request(Method::GET, url)).await
    }

    /// GET whose body is handed back unread, for CSV and VCF exports.
    pub async fn get_stream(&self, path: &str, query: &QueryParams) -> Result<StreamResponse> {
        let url = self.url(path, query)?;
        let response = self.request(Method::GET, url).send().await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Streaming response body");

        let body = response.bytes_stream().map_err(ApiError::from);
        Ok(StreamResponse::new(status, rechunk(body, STREAM_CHUNK_SIZE)))
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let url = self.url(path, &QueryParams::new())?;
        let body = serde_json::to_vec(body)?;

        let request = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.execute(request).await
    }

    /// Sends `body` exactly as given, for callers holding pre-serialized payloads.
    pub async fn post_raw(&self, path: &str, body: impl Into<String>) -> Result<ApiResponse> {
        let url = self.url(path, &QueryParams::new())?;
        let request = self.request(Method::POST, url).body(body.into());
        self.execute(request).await
    }

    pub async fn patch(&self, path: &str, operations: &[PatchOperation]) -> Result<ApiResponse> {
        let url = self.url(path, &QueryParams::new())?;
        let body = serde_json::to_vec(operations)?;

        let request = self
            .request(Method::PATCH, url)
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body);
        self.execute(request).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "Sending request");

        let request = self.client.request(method, url);
        match &self.auth {
            Some(BasicAuth { username, password }) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request.send().await.map_err(ApiError::RequestFailed)?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Received response");

        let payload = Payload::from_text(text);
        if matches!(payload, Payload::Raw(_)) {
            warn!(status = status.as_u16(), "Response body is not valid JSON");
        }

        Ok(ApiResponse::new(status, payload))
    }
}
