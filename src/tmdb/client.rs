use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::types::TmdbErrorBody;
use crate::browse::metrics::Metrics;
use crate::config::AppConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Raw response as seen by the gateway, before status classification
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Blocking GET. `Err` is a transport-level failure (DNS, TLS, timeout);
/// HTTP error statuses come back as `Ok` with the status set.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, String>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build(),
        }
    }

    fn read(response: ureq::Response) -> Result<HttpResponse, String> {
        let status = response.status();
        let status_text = response.status_text().to_string();
        let body = response
            .into_string()
            .map_err(|e| format!("Failed to read response body: {}", e))?;
        Ok(HttpResponse { status, status_text, body })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        match self.agent.get(url).set("Accept", "application/json").call() {
            Ok(response) => Self::read(response),
            Err(ureq::Error::Status(_, response)) => Self::read(response),
            Err(ureq::Error::Transport(e)) => Err(e.to_string()),
        }
    }
}

/// A query parameter value. Falsy values (empty text, zero, `false`,
/// absent) are dropped from the request instead of being serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Flag(bool),
    Absent,
}

impl ParamValue {
    pub fn is_falsy(&self) -> bool {
        match self {
            ParamValue::Text(s) => s.is_empty(),
            ParamValue::Int(n) => *n == 0,
            ParamValue::Flag(b) => !b,
            ParamValue::Absent => true,
        }
    }

    fn render(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Flag(b) => b.to_string(),
            ParamValue::Absent => String::new(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Flag(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ParamValue::Absent)
    }
}

/// Ordered query parameters for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.pairs.push((key, value.into()));
        self
    }

    /// Pairs that will actually be sent
    pub fn effective(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        self.pairs
            .iter()
            .filter(|(_, v)| !v.is_falsy())
            .map(|(k, v)| (*k, v.render()))
    }
}

/// Gateway to the TMDB REST API: URL construction, optional relay wrapping,
/// status classification and call counting.
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    use_cors_proxy: bool,
    cors_proxy: String,
    transport: Arc<dyn HttpTransport>,
    metrics: Arc<Metrics>,
}

impl TmdbClient {
    pub fn new(config: &AppConfig, metrics: Arc<Metrics>) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()), metrics)
    }

    pub fn with_transport(
        config: &AppConfig,
        transport: Arc<dyn HttpTransport>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            use_cors_proxy: config.use_cors_proxy,
            cors_proxy: config.cors_proxy.clone(),
            transport,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Direct request URL: base + endpoint, credential first, then every
    /// non-falsy parameter in insertion order.
    pub fn direct_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| ApiError::Decode(format!("invalid request URL for {}: {}", endpoint, e)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (key, value) in params.effective() {
                query.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// URL actually requested. With the relay enabled the direct URL is
    /// percent-encoded and appended to the relay prefix.
    pub fn request_url(&self, endpoint: &str, params: &QueryParams) -> Result<String, ApiError> {
        let direct = self.direct_url(endpoint, params)?;
        if self.use_cors_proxy {
            Ok(format!("{}{}", self.cors_proxy, urlencoding::encode(direct.as_str())))
        } else {
            Ok(direct.into())
        }
    }

    /// Perform one GET and return the body of a successful response.
    pub fn get_with_query(&self, endpoint: &str, params: &QueryParams) -> Result<String, ApiError> {
        let url = self.request_url(endpoint, params)?;

        self.metrics.record_call();
        log::debug!(
            "TMDB request: {} (url: {}, proxy: {})",
            endpoint,
            url,
            self.use_cors_proxy
        );

        let response = self.transport.get(&url).map_err(|e| {
            log::error!("TMDB transport failure for {}: {}", endpoint, e);
            if !self.use_cors_proxy {
                log::warn!("Network error detected; enabling the CORS relay may help");
            }
            ApiError::Network(e)
        })?;

        log::debug!("TMDB response: {} {} ({})", response.status, response.status_text, endpoint);

        if response.status >= 400 {
            // Error bodies are best-effort: anything unparseable counts as empty
            let body: TmdbErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
            let message = body
                .status_message
                .filter(|m| !m.is_empty())
                .unwrap_or(response.status_text);
            let error = ApiError::from_status(response.status, message);
            log::error!("TMDB error response for {}: {}", endpoint, error);
            return Err(error);
        }

        Ok(response.body)
    }

    pub fn get_parsed_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<T, ApiError> {
        let body = self.get_with_query(endpoint, params)?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse TMDB response for {}: {}", endpoint, e);
            ApiError::Decode(format!("{} (endpoint: {})", e, endpoint))
        })
    }
}
