//! Tutor prompt assembly.
//!
//! The system instruction is rendered from a fixed template: role framing,
//! five behavioural directives, five style directives, then the recent
//! conversation. Rendering is pure and deterministic.

use lingo_tutor_conversation::Exchange;
use lingo_tutor_core::Proficiency;
use std::collections::HashMap;

/// Context text used before the first exchange.
pub const CONVERSATION_START: &str = "This is the start of the conversation.";

/// Speaker label for learner lines in the rendered context.
pub const USER_LABEL: &str = "User";

/// Speaker label for tutor lines in the rendered context.
pub const TUTOR_LABEL: &str = "AI";

const TUTOR_SYSTEM_TEMPLATE: &str = "\
You are Lingo AI, a friendly AI language tutor for {{language}} at {{proficiency}} level.

Your role:
1. Help users learn {{language}}
2. Correct grammar and vocabulary errors gently
3. Provide explanations for language rules
4. Have natural conversations
5. Adapt to the user's proficiency level ({{proficiency}})

Guidelines:
- Keep responses concise (max 3-4 sentences)
- Use simple language for beginners, more complex for advanced
- Always provide translations when introducing new words
- Give examples to illustrate points
- Be encouraging and positive

Current conversation context: {{context}}";

/// A prompt template with `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Template content with placeholders.
    pub content: &'static str,
}

impl PromptTemplate {
    /// The tutor system instruction.
    pub const TUTOR_SYSTEM: Self = Self {
        content: TUTOR_SYSTEM_TEMPLATE,
    };

    /// Renders the template in a single pass.
    ///
    /// Substituted values are never re-scanned, so a value containing
    /// `{{...}}` is emitted literally. Unknown placeholders are kept as-is.
    #[must_use]
    pub fn render(&self, variables: &HashMap<&str, &str>) -> String {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                out.push_str(&rest[open..]);
                return out;
            };
            let name = &after_open[..close];
            match variables.get(name.trim()) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = &after_open[close + 2..];
        }
        out.push_str(rest);
        out
    }
}

/// Renders recent exchanges as alternating speaker-labelled lines.
#[must_use]
pub fn render_context<'a>(recent: impl IntoIterator<Item = &'a Exchange>) -> String {
    let mut context = String::new();
    for exchange in recent {
        context.push_str(&format!("\n{USER_LABEL}: {}", exchange.user));
        context.push_str(&format!("\n{TUTOR_LABEL}: {}", exchange.reply));
    }
    if context.is_empty() {
        CONVERSATION_START.to_string()
    } else {
        context
    }
}

/// Builds the tutor system instruction.
#[must_use]
pub fn build_system_prompt<'a>(
    language: &str,
    proficiency: Proficiency,
    recent: impl IntoIterator<Item = &'a Exchange>,
) -> String {
    let context = render_context(recent);
    let variables = HashMap::from([
        ("language", language),
        ("proficiency", proficiency.as_str()),
        ("context", context.as_str()),
    ]);
    PromptTemplate::TUTOR_SYSTEM.render(&variables)
}

/// Greeting returned when a learner starts a new session.
#[must_use]
pub fn welcome_message(language: &str, proficiency: Proficiency) -> String {
    format!(
        "Hello! I'm your {language} tutor. I'll help you practice at the {proficiency} level. \
         What would you like to learn today?"
    )
}
