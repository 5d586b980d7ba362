pub mod article;
pub mod error;
pub mod fallacy;
pub mod llm;
pub mod misconception;
pub mod response;

pub use article::{ArticleError, ArticleService};
pub use error::AnalysisError;
pub use fallacy::FallacyService;
pub use llm::{CompletionBackend, LlmClient, LlmError};
pub use misconception::MisconceptionService;
pub use response::MalformedResponse;
