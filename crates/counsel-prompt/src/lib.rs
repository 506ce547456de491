mod builder;
mod catalog;
mod error;
mod persona;
mod templates;

pub use builder::build_messages;
pub use catalog::PromptCatalog;
pub use error::PromptError;
pub use persona::Persona;
pub use templates::{HEALTH_TEMPLATE, LEGAL_TEMPLATE, QUESTION_SLOT};
