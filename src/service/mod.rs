pub mod claims;
pub mod llm;
pub mod study;
pub mod summary;

pub use claims::ClaimValidationService;
pub use llm::{AnthropicClient, ApiCredential, ReasoningBackend};
pub use study::StudyService;
pub use summary::SummaryService;
