use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, info};

use super::parse::{decode_body, parse_observations};
use super::query::StatQuery;
use crate::error::{IiveError, Result};
use crate::types::StatTable;

/// Statistics Estonia PxWeb endpoint for table RV032
pub const DEFAULT_API_URL: &str = "https://andmed.stat.ee/api/v1/et/stat/RV032";

/// Status and body of an HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends JSON requests to the statistics service
pub trait Transport {
    fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
        (**self).post_json(url, body)
    }
}

/// Blocking HTTP transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent("iive-map").build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()?;

        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(RawResponse { status, body })
    }
}

pub struct StatClient<T = HttpTransport> {
    transport: T,
    url: String,
}

impl StatClient<HttpTransport> {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, url))
    }
}

impl<T: Transport> StatClient<T> {
    pub fn with_transport(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the query and parse the CSV answer into observations
    pub fn fetch_observations(&self, query: &StatQuery) -> Result<StatTable> {
        let payload = serde_json::to_value(query.payload()).map_err(IiveError::Encode)?;

        info!("Fetching natural increase from {}", self.url);
        let response = self.transport.post_json(&self.url, &payload)?;

        if !response.is_success() {
            return Err(IiveError::Fetch {
                status: response.status,
            });
        }
        debug!("Received {} bytes", response.body.len());

        let text = decode_body(&response.body)?;
        let table = parse_observations(text)?;
        info!("Parsed {} observations", table.observations.len());

        Ok(table)
    }
}
