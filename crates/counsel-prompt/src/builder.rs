use counsel_llm::Message;

use crate::catalog::PromptCatalog;
use crate::error::PromptError;
use crate::persona::Persona;
use crate::templates::QUESTION_SLOT;

/// Build the two-message payload for one submission.
///
/// The system message is the persona's template with its question slot
/// filled; the user message carries the raw question verbatim. Emptiness is
/// the caller's concern, not checked here.
pub fn build_messages(
    catalog: &PromptCatalog,
    selector: &str,
    question: &str,
) -> Result<Vec<Message>, PromptError> {
    let persona: Persona = selector.parse()?;

    let template = catalog
        .template(persona)
        .ok_or_else(|| PromptError::UnknownPersona(selector.to_string()))?;

    let system = template.replace(QUESTION_SLOT, question);

    Ok(vec![Message::system(system), Message::user(question)])
}
