use async_trait::async_trait;
use mirror_api::{RawUpstreamRecord, UpstreamCredentials};
use mirror_core::{UpstreamError, UpstreamSource};
use reqwest::header::{HeaderMap, ACCEPT};
use tracing::{debug, error, info, Span};

use crate::envelope;

const SYSTEM_ID: &str = "erp";

/// HTTP client for the ERP read API.
///
/// Every fetch is a single `GET <base>/<service>/<collection>?format=json` with Basic
/// auth. No retries and no timeout beyond the HTTP client's defaults.
pub struct ErpClient {
    base_url: String,
    client: reqwest::Client,
}

impl ErpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, service_namespace: &str, resource_collection: &str) -> String {
        format!(
            "{}/{}/{}?format=json",
            self.base_url, service_namespace, resource_collection
        )
    }

    /// Helper to create better error messages from reqwest errors
    fn format_reqwest_error(e: &reqwest::Error, url: &str) -> String {
        if e.is_timeout() {
            format!("timeout requesting {}: {}", url, e)
        } else if e.is_connect() {
            format!(
                "connection error requesting {} - check network connectivity and the configured base URL: {}",
                url, e
            )
        } else if e.is_request() || e.is_builder() {
            format!("invalid request for {}: {}", url, e)
        } else {
            format!("request to {} failed: {:?}", url, e)
        }
    }

    /// W3C trace-context headers for the current OpenTelemetry context
    pub(crate) fn trace_headers() -> HeaderMap {
        use opentelemetry::global;
        use opentelemetry::Context;

        struct HeaderInjector {
            headers: HeaderMap,
        }
        impl opentelemetry::propagation::Injector for HeaderInjector {
            fn set(&mut self, key: &str, value: String) {
                if let Ok(header_name) = reqwest::header::HeaderName::from_bytes(key.as_bytes()) {
                    if let Ok(header_value) = reqwest::header::HeaderValue::from_str(&value) {
                        self.headers.insert(header_name, header_value);
                    }
                }
            }
        }

        let mut injector = HeaderInjector {
            headers: HeaderMap::new(),
        };
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&Context::current(), &mut injector);
        });
        injector.headers
    }
}

#[async_trait]
impl UpstreamSource for ErpClient {
    #[tracing::instrument(
        name = "upstream.erp.fetch",
        skip(self, credentials),
        fields(http.status = tracing::field::Empty, records = tracing::field::Empty)
    )]
    async fn fetch(
        &self,
        service_namespace: &str,
        resource_collection: &str,
        credentials: &UpstreamCredentials,
    ) -> Result<Vec<RawUpstreamRecord>, UpstreamError> {
        let url = self.resource_url(service_namespace, resource_collection);
        debug!("[ErpClient] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(Self::trace_headers())
            .header(ACCEPT, "application/json")
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| {
                let error_msg = Self::format_reqwest_error(&e, &url);
                error!("[ErpClient] Fetch failed: {}", error_msg);
                UpstreamError::Transport(error_msg)
            })?;

        let status = response.status();
        Span::current().record("http.status", status.as_u16());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            error!(
                "[ErpClient] HTTP {} from {}: {}",
                status.as_u16(),
                url,
                body.chars().take(500).collect::<String>()
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            let error_msg = format!("Failed to read response body from {}: {}", url, e);
            error!("[ErpClient] {}", error_msg);
            UpstreamError::Transport(error_msg)
        })?;

        let records = envelope::parse_records(&body).map_err(|e| {
            let error_msg = format!(
                "{} - Response (first 200 chars): {}",
                e,
                body.chars().take(200).collect::<String>()
            );
            error!("[ErpClient] Failed to decode payload from {}: {}", url, error_msg);
            UpstreamError::Decode(error_msg)
        })?;

        Span::current().record("records", records.len());
        info!(
            "[ErpClient] Fetched {} records from {}/{}",
            records.len(),
            service_namespace,
            resource_collection
        );
        Ok(records)
    }

    fn system_id(&self) -> &str {
        SYSTEM_ID
    }
}
