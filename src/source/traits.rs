use crate::error::FetchError;
use crate::models::{Page, Property};
use crate::source::types::Filter;
use async_trait::async_trait;

/// Common trait for anything that can serve property listings.
/// The HTTP backend and the built-in sample dataset both implement it.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch one page of properties matching the filter
    async fn fetch_properties(&self, filter: &Filter) -> Result<Page<Property>, FetchError>;

    /// Fetch a single property for the detail view
    async fn fetch_property(&self, id: &str) -> Result<Property, FetchError>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
