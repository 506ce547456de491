use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),
}
