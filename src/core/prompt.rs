//! Instruction text for one generation.
//!
//! The text is opaque to the rest of the engine. The only structural rule is
//! that excluded terms are rendered as JSON string literals, so a term that
//! contains quotes, commas or line breaks cannot spill into the surrounding
//! instruction.

use crate::domain::model::{Difficulty, GenerationConfig};
use rand::seq::SliceRandom;
use rand::Rng;

/// Fields the model picks from when the caller names no domain.
pub const ILLUSTRATIVE_FIELDS: [&str; 4] = [
    "web development",
    "software engineering",
    "artificial intelligence",
    "programming languages",
];

const EXAMPLE_CLUSTERS: [&[&str]; 3] = [
    &["useState", "useEffect", "useContext", "useReducer"],
    &["Waterfall", "Agile", "Spiral model", "Extreme Programming"],
    &["Logistic regression", "Random forest", "Cross-validation", "Grid search"],
];

pub const EXCLUSION_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    /// Difficulty level the prompt asks for.
    pub level: u8,
    /// Domain embedded in the prompt, `None` when the model chooses.
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    gloss_language: Option<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a reading in `language` after every English term.
    pub fn with_gloss_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.gloss_language = if language.trim().is_empty() {
            None
        } else {
            Some(language)
        };
        self
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        config: &GenerationConfig,
        history: &[String],
        rng: &mut R,
    ) -> Prompt {
        let level = pick_level(config.difficulty, rng);
        let domain = config.domains.choose(rng).cloned();
        let count = config.candidate_count.size();

        let mut text = String::from("# Task\n");
        match &domain {
            Some(domain) => text.push_str(&format!(
                "Work in the field \"{}\". Pick one sub-domain of it at random.\n",
                domain
            )),
            None => text.push_str(&format!(
                "Pick one field of computer science at random, for example {}. \
                 Then pick one sub-domain of that field at random.\n",
                ILLUSTRATIVE_FIELDS.join(", ")
            )),
        }
        text.push_str(&format!(
            "Generate exactly {} technical terms from that sub-domain at difficulty level {} \
             on a scale of 1 (well known) to 5 (specialist).\n",
            count, level
        ));
        text.push_str(
            "The terms must be closely related members of one category, so that any two \
             neighbouring terms are easy to confuse but still clearly different. \
             Do not repeat a term.\n",
        );
        if let Some(language) = &self.gloss_language {
            text.push_str(&format!(
                "If a term is in English, append its {} rendering in parentheses.\n",
                language
            ));
        }

        text.push_str("\n# Example term clusters\n");
        for cluster in EXAMPLE_CLUSTERS {
            text.push_str(&format!("- {}\n", cluster.join(" | ")));
        }

        if let Some(clause) = exclusion_clause(history) {
            text.push('\n');
            text.push_str(&clause);
            text.push('\n');
        }

        text.push_str("\n# Output format\nRespond with this JSON object only:\n");
        text.push_str(&schema_description(count));

        Prompt {
            text,
            level,
            domain,
        }
    }
}

fn pick_level<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> u8 {
    match difficulty {
        Difficulty::Fixed(level) => level,
        Difficulty::Range { min, max } => rng.gen_range(min..=max),
    }
}

/// `None` for an empty history; otherwise every term, in order.
pub fn exclusion_clause(history: &[String]) -> Option<String> {
    if history.is_empty() {
        return None;
    }
    let listed = history
        .iter()
        .map(|term| quote(term))
        .collect::<Vec<_>>()
        .join(EXCLUSION_SEPARATOR);
    Some(format!(
        "Do not use any of these recently used terms: {}.",
        listed
    ))
}

fn quote(term: &str) -> String {
    // serializing a &str cannot fail
    serde_json::to_string(term).unwrap_or_else(|_| format!("\"{}\"", term))
}

fn schema_description(count: usize) -> String {
    let words = (1..=count)
        .map(|i| format!("\"term {}\"", i))
        .collect::<Vec<_>>()
        .join(", ");
    let explanations = (1..=count)
        .map(|i| format!("\"explanation of term {}\"", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{{\n  \"domain\": \"field\",\n  \"sub_domain\": \"sub-domain\",\n  \
         \"difficulty_level\": <number from 1 to 5>,\n  \"words\": [{}],\n  \
         \"explanations\": [{}]\n}}\n",
        words, explanations
    )
}
