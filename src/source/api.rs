use crate::config::Config;
use crate::error::FetchError;
use crate::models::{Page, Property};
use crate::source::response::{error_message, interpret_listing, interpret_single};
use crate::source::sample::SampleSource;
use crate::source::traits::PropertySource;
use crate::source::types::Filter;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Client for the property listing backend
pub struct ApiClient {
    client: Client,
    config: Config,
    fallback: SampleSource,
}

impl ApiClient {
    /// Create a client for the backend described by `config`
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("property-scout/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config,
            fallback: SampleSource::new(),
        })
    }

    /// Full listing URL with the filter's query string
    pub fn listing_url(&self, filter: &Filter) -> Result<Url, FetchError> {
        let pairs = filter.query_pairs()?;
        let mut url = Url::parse(&self.config.properties_url())
            .map_err(|e| FetchError::InvalidFilter(format!("Invalid backend URL: {}", e)))?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn detail_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.config.properties_url())
            .map_err(|e| FetchError::InvalidFilter(format!("Invalid backend URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidFilter("Backend URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(id.trim());
        Ok(url)
    }

    /// Single GET, decoded as JSON
    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed: {}", e);
                FetchError::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Backend returned status: {}", status);
            let body = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read error body: {}", e);
                String::new()
            });
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), status.canonical_reason(), &body),
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::transport)?;
        debug!("Downloaded {} bytes", bytes.len());

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Response body is not valid JSON: {}", e);
            FetchError::parse()
        })
    }

    async fn fetch_remote(&self, filter: &Filter) -> Result<Page<Property>, FetchError> {
        let url = self.listing_url(filter)?;
        let body = self.get_json(url).await?;
        let page = interpret_listing(&body);
        info!(
            "Fetched {} properties (page {} of {}, {} total)",
            page.properties.len(),
            page.page,
            page.total_pages,
            page.total_count
        );
        Ok(page)
    }

    fn should_fall_back(&self, err: &FetchError) -> bool {
        err.is_transport() && !self.config.environment.is_production()
    }
}

#[async_trait]
impl PropertySource for ApiClient {
    async fn fetch_properties(&self, filter: &Filter) -> Result<Page<Property>, FetchError> {
        match self.fetch_remote(filter).await {
            Err(err) if self.should_fall_back(&err) => {
                warn!("Backend unreachable ({}), serving sample data", err);
                self.fallback.fetch_properties(filter).await
            }
            result => result,
        }
    }

    async fn fetch_property(&self, id: &str) -> Result<Property, FetchError> {
        let url = self.detail_url(id)?;
        match self.get_json(url).await {
            Ok(body) => interpret_single(&body),
            Err(err) if self.should_fall_back(&err) => {
                warn!("Backend unreachable ({}), serving sample data", err);
                self.fallback.fetch_property(id).await
            }
            Err(err) => Err(err),
        }
    }

    fn source_name(&self) -> &'static str {
        "API"
    }
}
