pub mod brochure;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod prompts;
pub mod stream;
pub mod summary;
pub mod traits;
pub mod urls;

#[cfg(test)]
pub mod testutil;

pub use brochure::BrochurePipeline;
pub use config::{BackendConfig, BackendKind};
pub use error::AppError;
pub use extract::PageExtractor;
pub use models::{ChatRequest, LinkSelection, Message, NO_TITLE, Page, Role};
pub use stream::{ChatStream, StreamState};
pub use summary::SummaryPipeline;
pub use traits::{ChatBackend, Fetcher, PageParser};
pub use urls::{is_valid_url, normalize_url};
