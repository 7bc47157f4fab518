//! Turn orchestration.
//!
//! One turn: assemble the prompt from the memory as it stood before the
//! turn, ask the completion provider for a reply, record the exchange, and
//! optionally render the reply as speech. Provider failures degrade the
//! turn instead of failing it.

use crate::error::TutorError;
use crate::prompt::build_system_prompt;
use lingo_tutor_ai::{CompletionProvider, CompletionRequest, LlmError, SpeechProvider};
use lingo_tutor_conversation::{Exchange, SessionEntry};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Tutor reply, or the fallback text if the provider failed.
    pub reply: String,
    /// Synthesized speech, when requested and available.
    pub audio: Option<Vec<u8>>,
}

/// Reply recorded and returned when the completion provider fails.
#[must_use]
pub fn fallback_reply(error: &LlmError) -> String {
    format!("I'm having trouble responding. Please try again. (Error: {error})")
}

/// Drives a single tutoring turn against the provider collaborators.
#[derive(Clone)]
pub struct TurnOrchestrator {
    completion: Arc<dyn CompletionProvider>,
    speech: Option<Arc<dyn SpeechProvider>>,
}

impl TurnOrchestrator {
    /// Creates an orchestrator without speech output.
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            completion,
            speech: None,
        }
    }

    /// Attaches a speech provider.
    #[must_use]
    pub fn with_speech(mut self, speech: Arc<dyn SpeechProvider>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Returns whether spoken replies can be produced.
    #[must_use]
    pub fn speech_enabled(&self) -> bool {
        self.speech.is_some()
    }

    /// Runs one turn against a locked session entry.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::EmptyMessage`] for a blank message; nothing is
    /// sent to any provider and the memory is left untouched.
    #[instrument(skip(self, entry, message), fields(session_id = %entry.id()))]
    pub async fn handle_turn(
        &self,
        entry: &mut SessionEntry,
        message: &str,
        want_voice: bool,
    ) -> Result<TurnOutcome, TutorError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TutorError::EmptyMessage);
        }

        let system = build_system_prompt(
            entry.language(),
            entry.proficiency(),
            entry.memory().recent_context(),
        );
        let request = CompletionRequest::new(system, message);

        let reply = match self.completion.complete(&request).await {
            Ok(completion) => completion.content,
            Err(e) => {
                warn!(
                    error = %e,
                    model = self.completion.model(),
                    "completion failed, using fallback reply"
                );
                fallback_reply(&e)
            }
        };

        entry.record_exchange(Exchange::new(message, reply.clone()));
        debug!(memory_len = entry.memory().len(), "recorded exchange");

        let audio = match (&self.speech, want_voice) {
            (Some(speech), true) => speech.synthesize(&reply, entry.language()).await,
            (None, true) => {
                debug!("voice requested but no speech provider is configured");
                None
            }
            (_, false) => None,
        };

        Ok(TurnOutcome { reply, audio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lingo_tutor_ai::{Completion, TokenUsage};
    use lingo_tutor_conversation::SessionSettings;
    use lingo_tutor_core::Proficiency;
    use std::sync::Mutex;

    /// Records every request and answers from a script.
    struct ScriptedCompletion {
        result: Result<String, LlmError>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedCompletion {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: LlmError) -> Arc<Self> {
            Arc::new(Self {
                result: Err(error),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedCompletion {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            self.result.clone().map(|content| Completion {
                content,
                usage: TokenUsage::default(),
                model: "scripted".to_string(),
            })
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    struct RecordingSpeech {
        audio: Option<Vec<u8>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSpeech {
        fn new(audio: Option<Vec<u8>>) -> Arc<Self> {
            Arc::new(Self {
                audio,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SpeechProvider for RecordingSpeech {
        async fn synthesize(&self, text: &str, language: &str) -> Option<Vec<u8>> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), language.to_string()));
            self.audio.clone()
        }
    }

    fn entry() -> SessionEntry {
        SessionEntry::new(
            "turn-test".parse().unwrap(),
            SessionSettings::new("Spanish", Proficiency::Beginner),
        )
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_provider_call() {
        let completion = ScriptedCompletion::replying("never");
        let orchestrator = TurnOrchestrator::new(completion.clone());
        let mut entry = entry();

        let err = orchestrator
            .handle_turn(&mut entry, "   \n", false)
            .await
            .unwrap_err();

        assert_eq!(err, TutorError::EmptyMessage);
        assert!(completion.requests().is_empty());
        assert!(entry.memory().is_empty());
    }

    #[tokio::test]
    async fn successful_turn_records_trimmed_message_and_reply() {
        let completion = ScriptedCompletion::replying("¡Hola!");
        let orchestrator = TurnOrchestrator::new(completion.clone());
        let mut entry = entry();

        let outcome = orchestrator
            .handle_turn(&mut entry, "  Hola  ", false)
            .await
            .unwrap();

        assert_eq!(outcome.reply, "¡Hola!");
        assert_eq!(outcome.audio, None);
        let recorded: Vec<_> = entry.memory().iter().cloned().collect();
        assert_eq!(recorded, vec![Exchange::new("Hola", "¡Hola!")]);

        let requests = completion.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "Hola");
        assert!(requests[0].system.contains("tutor for Spanish at beginner level"));
    }

    #[tokio::test]
    async fn prompt_uses_memory_from_before_the_turn() {
        let completion = ScriptedCompletion::replying("reply");
        let orchestrator = TurnOrchestrator::new(completion.clone());
        let mut entry = entry();

        orchestrator.handle_turn(&mut entry, "first", false).await.unwrap();
        orchestrator.handle_turn(&mut entry, "second", false).await.unwrap();

        let requests = completion.requests();
        assert!(requests[0].system.contains("This is the start of the conversation."));
        assert!(!requests[0].system.contains("User: first"));
        assert!(requests[1].system.contains("User: first\nAI: reply"));
        assert!(!requests[1].system.contains("User: second"));
    }

    #[tokio::test]
    async fn provider_failure_produces_recorded_fallback() {
        let orchestrator = TurnOrchestrator::new(ScriptedCompletion::failing(LlmError::Timeout));
        let mut entry = entry();

        let outcome = orchestrator.handle_turn(&mut entry, "Hola", false).await.unwrap();

        assert!(outcome.reply.starts_with("I'm having trouble responding."));
        assert!(outcome.reply.contains("LLM request timed out"));
        assert_eq!(entry.memory().len(), 1);
        assert_eq!(
            entry.memory().iter().next().map(|e| e.reply.clone()),
            Some(outcome.reply)
        );
    }

    #[tokio::test]
    async fn voice_requested_calls_speech_with_reply_and_language() {
        let speech = RecordingSpeech::new(Some(vec![7, 7]));
        let orchestrator = TurnOrchestrator::new(ScriptedCompletion::replying("Muy bien"))
            .with_speech(speech.clone());
        let mut entry = entry();

        let outcome = orchestrator.handle_turn(&mut entry, "Hola", true).await.unwrap();

        assert_eq!(outcome.audio, Some(vec![7, 7]));
        assert_eq!(
            speech.calls.lock().unwrap().clone(),
            vec![("Muy bien".to_string(), "Spanish".to_string())]
        );
    }

    #[tokio::test]
    async fn voice_not_requested_skips_speech() {
        let speech = RecordingSpeech::new(Some(vec![1]));
        let orchestrator =
            TurnOrchestrator::new(ScriptedCompletion::replying("ok")).with_speech(speech.clone());
        let mut entry = entry();

        let outcome = orchestrator.handle_turn(&mut entry, "Hola", false).await.unwrap();

        assert_eq!(outcome.audio, None);
        assert!(speech.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn speech_failure_still_returns_reply() {
        let orchestrator = TurnOrchestrator::new(ScriptedCompletion::replying("ok"))
            .with_speech(RecordingSpeech::new(None));
        let mut entry = entry();

        let outcome = orchestrator.handle_turn(&mut entry, "Hola", true).await.unwrap();

        assert_eq!(outcome.reply, "ok");
        assert_eq!(outcome.audio, None);
    }

    #[tokio::test]
    async fn voice_without_speech_provider_is_silently_omitted() {
        let orchestrator = TurnOrchestrator::new(ScriptedCompletion::replying("ok"));
        assert!(!orchestrator.speech_enabled());
        let mut entry = entry();

        let outcome = orchestrator.handle_turn(&mut entry, "Hola", true).await.unwrap();

        assert_eq!(outcome.audio, None);
    }
}
