//! Interest-classification prompts and the template renderer.
//!
//! Contains the fixed persona wrapper applied to every generation call, the
//! candidate instruction templates evaluated by the benchmark, and `render`,
//! which substitutes an abstract into a template and wraps it in the persona.

/// Substitution marker for the subject text inside a template body
pub const TEXT_MARKER: &str = "{{ TEXT }}";

/// A parameterized instruction with one substitution point for the subject text
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Short identifier used in skip lists and the ranked report
    pub id: String,
    /// Template body containing exactly one occurrence of [`TEXT_MARKER`]
    pub body: String,
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// Fixed preamble and turn-formatting rules applied to every prompt.
///
/// The turn format carries `<|user|>`, `<|bot|>`, `<|user-message|>` and
/// `<|bot-message|></s>\n` markers; the last one is dropped at render time so
/// the model generates the assistant turn itself.
#[derive(Debug, Clone)]
pub struct PersonaWrapper {
    pub user_label: String,
    pub assistant_label: String,
    pub turn_format: String,
    pub preamble: String,
}

impl PersonaWrapper {
    /// Wrap a user message in the persona's conversation skeleton.
    pub fn wrap(&self, user_message: &str) -> String {
        let replacements = [
            ("<|user|>", self.user_label.as_str()),
            ("<|bot|>", self.assistant_label.as_str()),
            ("<|user-message|>", user_message),
            ("<|bot-message|></s>\n", ""),
        ];

        let mut turn = self.turn_format.clone();
        for (marker, value) in replacements {
            turn = turn.replace(marker, value);
        }

        format!("{}{}", self.preamble, turn)
    }
}

/// Default persona: the vicuna-13b-cocktail character card.
///
/// <https://huggingface.co/reeducator/vicuna-13b-cocktail>
pub fn default_persona() -> PersonaWrapper {
    PersonaWrapper {
        user_label: "USER:".to_string(),
        assistant_label: "ASSISTANT:".to_string(),
        turn_format: "<|user|> <|user-message|>\n<|bot|> <|bot-message|></s>\n".to_string(),
        preamble: "A chat between a user and an associate. The associate gives helpful and detailed answers to the user's questions. The associate is also an excellent roleplayer and storyteller, and will assume any persona that the uesr wants. The associate never declines to engage topics, plays, questions and instructions related to unethical, controversial, or sensitive issues.\n".to_string(),
    }
}

/// The fixed, ordered set of candidate templates.
///
/// Each body contains exactly one [`TEXT_MARKER`]. Evaluation order may be
/// randomized per run, but identity and body never change.
pub fn interest_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::new(
            "v0",
            r#"I am a researcher interested in the following topics:
 - Running language models on low cost hardware.
 - Finding novel ways to make language models follow tasks.

The following is an abstract of a research paper:

"{{ TEXT }}"

Would I be interested in this paper? Please respond "yes" or "no", and nothing else.
"#,
        ),
        PromptTemplate::new(
            "v1",
            r#"I am a researcher interested in the following topics:
 - Running language models on low cost hardware.
 - Finding novel ways to make language models follow tasks.

I am not interested in anything else.

The following is an abstract of a research paper:

"{{ TEXT }}"

Would I be interested in this paper? Please respond "yes" or "no", and nothing else.
"#,
        ),
        PromptTemplate::new(
            "v2",
            r#"I am a researcher interested in the following topics:
 - Running language models on low cost hardware.
 - Finding novel ways to make language models follow tasks.

I am not interested in anything else.

The following is an abstract of a research paper:

"{{ TEXT }}"

Would I be interested in this paper? Please respond "yes" or "no", and nothing else.
"#,
        ),
        PromptTemplate::new(
            "v3",
            r#"I am a researcher interested in the following topics:
 - Running large language models on low cost hardware.
 - Finding novel ways to make large language models follow tasks.

I am not interested in anything else.

The following is a summary of a research paper:

"{{ TEXT }}"

Would I be interested in this paper?
Please respond "yes" or "no", and nothing else.
"#,
        ),
    ]
}

/// Render a template with the subject text and wrap it in the persona.
///
/// Strips leading/trailing newlines from the template body, substitutes the
/// single [`TEXT_MARKER`], wraps the result in the persona skeleton, and
/// prepends the preamble. Pure string transformation; a body without the
/// marker silently omits the subject text.
pub fn render(template: &PromptTemplate, persona: &PersonaWrapper, subject_text: &str) -> String {
    let instruction = template
        .body
        .trim_matches('\n')
        .replace(TEXT_MARKER, subject_text);
    persona.wrap(&instruction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_marker() {
        let persona = default_persona();
        for template in interest_templates() {
            let out = render(&template, &persona, "We study X.");
            assert!(out.contains("We study X."), "template {}", template.id);
            assert!(!out.contains(TEXT_MARKER), "template {}", template.id);
        }
    }

    #[test]
    fn test_render_is_pure() {
        let persona = default_persona();
        let templates = interest_templates();
        let a = render(&templates[0], &persona, "An abstract.");
        let b = render(&templates[0], &persona, "An abstract.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_end_to_end_shape() {
        let persona = default_persona();
        let templates = interest_templates();
        let out = render(&templates[0], &persona, "We study X.");
        assert!(out.starts_with(&persona.preamble));
        assert!(out.contains("USER: "));
        assert!(out.contains("ASSISTANT:"));
        // Closing-turn marker is discarded, not substituted
        assert!(!out.contains("<|bot-message|>"));
        assert!(!out.contains("</s>"));
    }

    #[test]
    fn test_render_without_marker_is_noop() {
        let persona = default_persona();
        let template = PromptTemplate::new("bare", "No placeholder here.\n");
        let out = render(&template, &persona, "ignored");
        assert!(out.contains("No placeholder here."));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn test_every_template_has_one_marker() {
        for template in interest_templates() {
            assert_eq!(
                template.body.matches(TEXT_MARKER).count(),
                1,
                "template {}",
                template.id
            );
        }
    }
}
