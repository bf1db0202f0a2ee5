//! Single-item classification: one abstract, one template, one decision.

use crate::error::Result;
use crate::prompts::{render, PersonaWrapper, PromptTemplate};
use crate::textgen::{is_affirmative, TextgenClient};
use tracing::{debug, info};

/// Decide whether one abstract matches the researcher's interests.
///
/// Renders the prompt, logs the active model from the info endpoint
/// (informational only), sends the prompt to the chat endpoint, and
/// interprets the reply. Errors from the client propagate unchanged.
pub async fn classify(
    client: &TextgenClient,
    template: &PromptTemplate,
    persona: &PersonaWrapper,
    abstract_text: &str,
) -> Result<bool> {
    debug!(abstract = %abstract_text, "Processing abstract");

    let subject = abstract_text.trim().replace('\n', "");
    let prompt = render(template, persona, &subject);
    debug!(prompt = %prompt, "Full prompt");

    let model = client.model_info().await?;
    debug!(model = %model.model_name, "Active model");
    debug!(context = %model.context, "System context");

    let reply = client.chat(&prompt).await?;
    info!(reply = %reply, "Got reply");

    Ok(is_affirmative(&reply))
}
