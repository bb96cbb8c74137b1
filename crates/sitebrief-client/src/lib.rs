pub mod backend;
pub mod fetcher;
mod http;
pub mod ollama;
pub mod openai;
pub mod parser;
mod stream;

pub use backend::ConfiguredBackend;
pub use fetcher::ReqwestFetcher;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;
pub use parser::HtmlParser;
