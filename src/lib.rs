//! Property listing client: filtered fetches against the listing backend,
//! normalization of the backend's record shapes, and the UI-side helpers
//! (image selection, formatting, debounced filter changes).

pub mod config;
pub mod debounce;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod images;
pub mod listing;
pub mod models;
pub mod normalize;
pub mod source;

pub use config::{Config, Environment};
pub use error::{ConfigError, FetchError, NormalizationError};
pub use listing::{Listing, ListingState, LoadOutcome};
pub use models::{Image, Owner, Page, Property, Trace};
pub use source::{ApiClient, Filter, PropertySource, SampleSource, SortDirection};
