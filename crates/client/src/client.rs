//! HTTP plumbing shared by every resource module.

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, Url};
use safewatch_core::pagination::PageInfo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Path prefix of every backend endpoint.
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Shared client for the external REST backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

/// A [`BackendClient`] bound to one user's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct ApiSession<'a> {
    backend: &'a BackendClient,
    token: &'a str,
}

/// A list page as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

/// Raw binary payload (report downloads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<PageInfo>,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`, e.g.
    /// `http://localhost:5000`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::unknown(format!("Invalid backend URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::unknown(format!("Invalid backend URL '{base_url}'")));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Bind the client to a user's backend token.
    pub fn session<'a>(&'a self, token: &'a str) -> ApiSession<'a> {
        ApiSession {
            backend: self,
            token,
        }
    }

    /// Whether the backend answers its health endpoint.
    pub async fn ping(&self) -> ApiResult<()> {
        let request = self.request(Method::GET, &["health"])?;
        let response = self.execute(request).await?;
        check_status(response).await
    }

    /// `{base}/api/v1/{segments...}` with every segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::unknown("Backend URL cannot carry a path"))?;
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    pub(crate) async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        match self.client.execute(request).await {
            Ok(response) => {
                tracing::debug!(%method, %path, status = response.status().as_u16(), "Backend call");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(%method, %path, error = %e, "Backend unreachable");
                Err(e.into())
            }
        }
    }

    pub(crate) async fn post_public<T, B>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        parse_response(self.execute(request).await?).await
    }
}

impl<'a> ApiSession<'a> {
    pub fn backend(&self) -> &'a BackendClient {
        self.backend
    }

    fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        if self.token.is_empty() {
            return Err(ApiError::AuthRequired);
        }
        Ok(self.backend.request(method, segments)?.bearer_auth(self.token))
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        self.backend.execute(request).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let request = self.request(Method::GET, segments)?;
        parse_response(self.send(request).await?).await
    }

    /// Like [`get`](Self::get) but a 404 becomes `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<Option<T>> {
        match self.get(segments).await {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn list<T, Q>(&self, segments: &[&str], query: &Q) -> ApiResult<Paged<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, segments)?.query(query);
        parse_list(self.send(request).await?).await
    }

    pub(crate) async fn post<T, B>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        parse_response(self.send(request).await?).await
    }

    /// POST without a body, discarding any response payload.
    pub(crate) async fn post_empty(&self, segments: &[&str]) -> ApiResult<()> {
        let request = self.request(Method::POST, segments)?;
        check_status(self.send(request).await?).await
    }

    pub(crate) async fn put<T, B>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, segments)?.json(body);
        parse_response(self.send(request).await?).await
    }

    /// PUT without a body, discarding any response payload.
    pub(crate) async fn put_empty(&self, segments: &[&str]) -> ApiResult<()> {
        let request = self.request(Method::PUT, segments)?;
        check_status(self.send(request).await?).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> ApiResult<()> {
        let request = self.request(Method::DELETE, segments)?;
        check_status(self.send(request).await?).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(&self, segments: &[&str], form: Form) -> ApiResult<T> {
        let request = self.request(Method::POST, segments)?.multipart(form);
        parse_response(self.send(request).await?).await
    }

    /// POST a JSON body and take the response as raw bytes.
    pub(crate) async fn download<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> ApiResult<Blob> {
        let request = self.request(Method::POST, segments)?.json(body);
        let response = ensure_success(self.send(request).await?).await?;
        let content_type = header_str(response.headers(), CONTENT_TYPE.as_str()).map(str::to_string);
        let file_name = header_str(response.headers(), CONTENT_DISPOSITION.as_str()).and_then(disposition_file_name);
        let data = response.bytes().await?.to_vec();
        Ok(Blob {
            content_type,
            file_name,
            data,
        })
    }
}

/// Ensure the response has a success status code, turning anything else into
/// the matching [`ApiError`].
async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_status(status.as_u16(), &body);

    match &err {
        ApiError::Server { .. } | ApiError::Unknown { .. } => {
            tracing::error!(%path, status = status.as_u16(), code = err.code(), "Backend request failed");
        }
        _ => {
            tracing::debug!(%path, status = status.as_u16(), code = err.code(), "Backend rejected request");
        }
    }
    Err(err)
}

/// Check status and content type, then unwrap the `{ "data": ... }` envelope.
async fn parse_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = expect_json(ensure_success(response).await?)?;
    let envelope = response.json::<DataEnvelope<T>>().await?;
    Ok(envelope.data)
}

async fn parse_list<T: DeserializeOwned>(response: Response) -> ApiResult<Paged<T>> {
    let response = expect_json(ensure_success(response).await?)?;
    let envelope = response.json::<ListEnvelope<T>>().await?;
    let page_info = envelope
        .pagination
        .unwrap_or_else(|| PageInfo::single(envelope.data.len() as u64));
    Ok(Paged {
        items: envelope.data,
        page_info,
    })
}

/// Assert the response has a success status code, discarding the body.
async fn check_status(response: Response) -> ApiResult<()> {
    ensure_success(response).await?;
    Ok(())
}

fn expect_json(response: Response) -> ApiResult<Response> {
    if is_json(response.headers()) {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let found = header_str(response.headers(), CONTENT_TYPE.as_str()).unwrap_or("none");
    tracing::error!(status, content_type = found, "Backend sent a non-JSON success response");
    Err(ApiError::Unknown {
        status: Some(status),
        message: format!("Expected a JSON response, got '{found}'"),
    })
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub(crate) fn is_json(headers: &HeaderMap) -> bool {
    header_str(headers, CONTENT_TYPE.as_str()).is_some_and(|value| {
        let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        essence == "application/json" || essence.ends_with("+json")
    })
}

/// `attachment; filename="report.pdf"` -> `report.pdf`.
fn disposition_file_name(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let name = part.strip_prefix("filename=")?;
        let name = name.trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
