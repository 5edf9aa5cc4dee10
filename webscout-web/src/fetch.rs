//! Pinned-address HTTP fetching
//!
//! Fetches validated URLs while defending against DNS rebinding: every
//! request is sent through a client whose resolver is pinned to the
//! addresses that passed security validation, and redirects are never
//! followed automatically. Each redirect target goes through the full
//! validation pipeline before the next hop is requested.

use crate::config::WebConfig;
use crate::security::{SecurityError, SecurityValidator, ValidatedUrl};
use futures::StreamExt;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use std::net::IpAddr;
use url::Url;

/// Errors that can occur while fetching a URL
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// URL failed security validation (initial or on a redirect hop)
    #[error(transparent)]
    Security(#[from] SecurityError),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Redirect chain exceeded the hop limit
    #[error("Too many redirects (limit {limit})")]
    TooManyRedirects {
        /// The configured redirect hop limit
        limit: usize,
    },
    /// Redirect response carried no usable Location header
    #[error("Redirect response missing Location header")]
    MissingRedirectLocation,
    /// Redirect target could not be resolved against the current URL
    #[error("Invalid redirect target: {0}")]
    InvalidRedirect(String),
    /// Response content type is not on the allow-list
    #[error("Unsupported content type '{content_type}'")]
    UnsupportedContentType {
        /// The rejected content type
        content_type: String,
    },
    /// Upstream returned a non-success status
    #[error("Upstream returned status {status}")]
    UpstreamStatus {
        /// The HTTP status code
        status: u16,
    },
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(reqwest::Error),
}

/// A fetched document that passed the content-type gate
#[derive(Debug)]
pub struct FetchedDocument {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status of the final response
    pub status: u16,
    /// Content type of the final response, without parameters
    pub content_type: String,
    /// Response body, decoded lossily as UTF-8
    pub body: String,
    /// Whether the body was cut off at the byte cap
    pub body_truncated: bool,
}

/// HTTP fetcher that validates and pins every connection
#[derive(Debug)]
pub struct WebFetcher {
    validator: SecurityValidator,
    config: WebConfig,
}

impl WebFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: WebConfig) -> Self {
        let validator = SecurityValidator::new(config.security_policy());
        Self { validator, config }
    }

    /// Access the validator, shared with redirect handling
    pub fn validator(&self) -> &SecurityValidator {
        &self.validator
    }

    /// Fetch a URL, following up to `max_redirects` hops
    ///
    /// Every hop is validated before it is requested; the connection for
    /// each hop is pinned to the addresses that validation resolved.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedDocument, FetchError> {
        let mut validated = self.validator.validate_str(raw_url).await?;

        for hop in 0..=self.config.max_redirects {
            let client = self.build_client(&validated)?;
            let response = client
                .get(validated.url.clone())
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or(FetchError::MissingRedirectLocation)?;
                let target = validated
                    .url
                    .join(location)
                    .map_err(|e| FetchError::InvalidRedirect(format!("{location}: {e}")))?;

                tracing::debug!(
                    "Redirect hop {} from {} to {}",
                    hop + 1,
                    validated.url,
                    target
                );

                // Redirect targets are untrusted input like the original URL
                validated = self.validator.validate(&target).await?;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::UpstreamStatus {
                    status: status.as_u16(),
                });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(content_type_essence)
                .unwrap_or_default();

            if !self
                .config
                .allowed_content_types
                .iter()
                .any(|allowed| allowed == &content_type)
            {
                return Err(FetchError::UnsupportedContentType { content_type });
            }

            let (body, body_truncated) = self.read_body(response).await?;

            return Ok(FetchedDocument {
                url: validated.url,
                status: status.as_u16(),
                content_type,
                body,
                body_truncated,
            });
        }

        Err(FetchError::TooManyRedirects {
            limit: self.config.max_redirects,
        })
    }

    /// Build a client pinned to the validated addresses
    fn build_client(&self, validated: &ValidatedUrl) -> Result<reqwest::Client, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&self.config.user_agent)
            .timeout(self.config.request_timeout)
            .redirect(reqwest::redirect::Policy::none());

        // IP-literal hosts never consult the resolver
        if validated.host.parse::<IpAddr>().is_err() {
            builder = builder.resolve_to_addrs(&validated.host, &validated.addresses);
        }

        builder.build().map_err(map_reqwest_error)
    }

    /// Stream the body, stopping at the configured byte cap
    async fn read_body(&self, response: reqwest::Response) -> Result<(String, bool), FetchError> {
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut truncated = false;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let remaining = self.config.max_body_bytes - buffer.len();
            if chunk.len() > remaining {
                buffer.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            buffer.extend_from_slice(&chunk);
            if buffer.len() == self.config.max_body_bytes {
                // A body that ends exactly at the cap is not truncated;
                // only data beyond the cap counts
                truncated = stream.next().await.is_some();
                break;
            }
        }

        Ok((String::from_utf8_lossy(&buffer).into_owned(), truncated))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error)
    }
}

/// Strip parameters and normalize a Content-Type header value
fn content_type_essence(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}
