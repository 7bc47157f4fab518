//! Speech provider abstraction and text cleaning.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Longest text, in characters, sent to a speech provider.
pub const MAX_SPEECH_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

static EMPHASIS_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,2}(.*?)\*{1,2}").expect("valid regex"));
static EMPHASIS_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{1,2}(.*?)_{1,2}").expect("valid regex"));
static LINKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").expect("valid regex"));
static CODE_SPANS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`.*?`").expect("valid regex"));

/// Trait for speech providers.
///
/// Synthesis never fails the caller: a provider that cannot produce audio
/// (missing credentials, network failure, bad response) returns `None`.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Renders `text` as audio, using `language` to pick a voice.
    async fn synthesize(&self, text: &str, language: &str) -> Option<Vec<u8>>;
}

/// Prepares reply text for synthesis.
///
/// Emphasis markers are unwrapped, markdown links and inline code are
/// dropped, whitespace runs collapse to single spaces, and the result is
/// cut to [`MAX_SPEECH_CHARS`] characters ending in `...` when too long.
#[must_use]
pub fn clean_for_speech(text: &str) -> String {
    // Markup may span line breaks; flatten first so `.` sees the whole pair.
    let text = collapse_whitespace(text);
    let text = EMPHASIS_STARS.replace_all(&text, "$1");
    let text = EMPHASIS_UNDERSCORES.replace_all(&text, "$1");
    let text = LINKS.replace_all(&text, "");
    let text = CODE_SPANS.replace_all(&text, "");

    let collapsed = collapse_whitespace(&text);

    if collapsed.chars().count() > MAX_SPEECH_CHARS {
        let keep = MAX_SPEECH_CHARS - ELLIPSIS.len();
        let mut truncated: String = collapsed.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        collapsed
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
