pub mod openai;
pub mod streaming;
pub mod traits;
pub mod types;

pub use openai::OpenAIClient;
pub use streaming::CompletionEvent;
pub use traits::{CompletionClient, CompletionRequest, CompletionStream};
pub use types::{ApiKey, Message};
