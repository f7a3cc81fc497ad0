pub mod api;
pub mod response;
pub mod sample;
pub mod traits;
pub mod types;

pub use api::ApiClient;
pub use sample::SampleSource;
pub use traits::PropertySource;
pub use types::{Filter, SortDirection};
