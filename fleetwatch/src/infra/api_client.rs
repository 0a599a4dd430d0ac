use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use super::credential::Credential;

/// Errors surfaced by REST calls against the delivery backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please sign in first: no session token is available")]
    MissingCredential,

    #[error("Unauthorized - please login again")]
    Unauthorized,

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// True when the caller has to obtain a new credential before retrying.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::MissingCredential | ApiError::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// REST client for the delivery backend.
///
/// The credential is fixed at construction; authorized calls made without
/// one fail before any request leaves the process.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credential: Option<Credential>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_credential", &self.credential.is_some())
            .finish()
    }
}

/// Adds `http://` when the scheme is missing and trims trailing slashes so
/// joined paths never double up.
pub fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

    match url::Url::parse(&with_scheme) {
        Ok(parsed) if parsed.host_str().is_some() => {}
        _ => return Err(ApiError::InvalidUrl(raw.to_string())),
    }

    if with_scheme != raw {
        debug!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    Ok(with_scheme)
}

impl ApiClient {
    /// Create a new API client with no credential attached.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        info!("[ApiClient] Creating API client with base URL: {}", base_url);

        Ok(Self {
            client,
            base_url,
            credential: None,
        })
    }

    /// Returns a copy of this client that authorizes with `credential`.
    pub fn with_credential(&self, credential: Option<Credential>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            credential,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let path = path.as_ref();
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> ApiResult<RequestBuilder> {
        match &self.credential {
            Some(credential) => Ok(builder
                .header(
                    reqwest::header::AUTHORIZATION,
                    credential.authorization_header(),
                )),
            None => Err(ApiError::MissingCredential),
        }
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("[ApiClient] Request rejected as unauthorized");
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status,
            message: error_message(&body),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET request with authentication
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.authorize(self.client.get(self.build_url(path)))?;
        self.execute(request).await
    }

    /// POST request with authentication
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request =
            self.authorize(self.client.post(self.build_url(path)).json(body))?;
        self.execute(request).await
    }

    /// PUT request with authentication
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request =
            self.authorize(self.client.put(self.build_url(path)).json(body))?;
        self.execute(request).await
    }

    /// DELETE request with authentication; any response body is discarded.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.authorize(self.client.delete(self.build_url(path)))?;
        self.send(request).await?;
        Ok(())
    }

    /// POST request WITHOUT authentication (login endpoints)
    pub async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.execute(request).await
    }

    /// Public POST whose response body is not needed.
    pub async fn post_public_discard<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.send(request).await?;
        Ok(())
    }
}

/// Prefers the backend's `{"message": ...}` error body, then the raw text.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && !parsed.message.is_empty()
    {
        return parsed.message;
    }
    let text = body.trim();
    if text.is_empty() {
        "Unknown error".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        assert_eq!(
            normalize_base_url("localhost:6014/").unwrap(),
            "http://localhost:6014"
        );
        assert_eq!(
            normalize_base_url("https://example.com").unwrap(),
            "https://example.com"
        );
        assert!(normalize_base_url("").is_err());
    }

    #[test]
    fn build_url_joins_without_double_slash() {
        let client =
            ApiClient::new("http://localhost:8000/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.build_url("/delivery"),
            "http://localhost:8000/delivery"
        );
        assert_eq!(
            client.build_url("delivery/a"),
            "http://localhost:8000/delivery/a"
        );
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"message":"Driver not found"}"#),
            "Driver not found"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "Unknown error");
    }
}
