//! Batch scoring: evaluate every candidate template against the labeled
//! dataset and rank the templates by correct predictions.
//!
//! Template order and example order are each randomized once per run as
//! explicit permutations; given a fixed RNG seed, a run is reproducible.

use crate::dataset::LabeledExample;
use crate::error::Result;
use crate::prompts::{render, PersonaWrapper, PromptTemplate};
use crate::textgen::TextGenerator;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::info;

/// Final tally for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateScore {
    pub template_id: String,
    pub correct: usize,
    pub total: usize,
}

/// Score every template (except the skipped ones) against every example.
///
/// The reply is matched against the expected label string ("yes"/"no") with
/// a case-insensitive prefix comparison, so extra words after the answer do
/// not affect scoring. A template with zero correct predictions still gets
/// an explicit zero entry. The report is sorted descending by correct count;
/// ties break lexicographically by template id.
pub async fn score_all<G: TextGenerator, R: Rng>(
    generator: &G,
    templates: &[PromptTemplate],
    persona: &PersonaWrapper,
    examples: &[LabeledExample],
    skip_ids: &HashSet<String>,
    rng: &mut R,
) -> Result<Vec<TemplateScore>> {
    let mut template_order: Vec<&PromptTemplate> = templates.iter().collect();
    template_order.shuffle(rng);

    // One permutation, reused across all templates
    let mut example_order: Vec<&LabeledExample> = examples.iter().collect();
    example_order.shuffle(rng);

    let mut tallies = Vec::new();

    for template in template_order {
        info!(template = %template.id, "Testing template");
        if skip_ids.contains(&template.id) {
            info!(template = %template.id, "Skipped");
            continue;
        }

        let mut correct = 0;
        for (idx, example) in example_order.iter().enumerate() {
            let subject = example.summary.trim().replace('\n', "");
            let expected = if example.interested { "yes" } else { "no" };

            let prompt = render(template, persona, &subject);
            let reply = generator.generate(&prompt).await?;
            let normalized = reply.trim().to_lowercase();

            if normalized.starts_with(expected) {
                correct += 1;
                info!(example = idx, "pass");
            } else {
                info!(example = idx, got = %normalized, wanted = expected, "fail");
            }
        }

        tallies.push(TemplateScore {
            template_id: template.id.clone(),
            correct,
            total: example_order.len(),
        });
    }

    tallies.sort_by(|a, b| {
        b.correct
            .cmp(&a.correct)
            .then_with(|| a.template_id.cmp(&b.template_id))
    });

    Ok(tallies)
}
