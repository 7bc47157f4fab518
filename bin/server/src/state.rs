//! Application state shared by all handlers.

use crate::config::ServerConfig;
use crate::error::StartupError;
use chrono::Duration as ChronoDuration;
use lingo_tutor_ai::{DeepgramClient, DeepgramConfig, GroqClient, GroqConfig};
use lingo_tutor_conversation::SessionSettings;
use lingo_tutor_tutor::{TurnOrchestrator, TutorService};
use rootcause::Report;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tutor: Arc<TutorService>,
}

impl AppState {
    /// Creates state around an already-built service.
    #[must_use]
    pub fn new(tutor: TutorService) -> Self {
        Self {
            tutor: Arc::new(tutor),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn session_ttl(seconds: i64) -> Result<ChronoDuration, StartupError> {
    ChronoDuration::try_seconds(seconds)
        .filter(|ttl| *ttl > ChronoDuration::zero())
        .ok_or_else(|| StartupError::InvalidConfiguration {
            key: "SESSION__TTL_SECONDS",
            reason: format!("expected a positive number of seconds, got {seconds}"),
        })
}

/// Builds the provider clients and the tutoring service from configuration.
///
/// # Errors
///
/// Returns [`StartupError::ConfigurationMissing`] if the completion
/// credential is absent, [`StartupError::InvalidConfiguration`] if the
/// session TTL is not a positive duration, or [`StartupError::ProviderInit`]
/// if a client cannot be constructed.
pub fn build_state(config: &ServerConfig) -> Result<AppState, Report<StartupError>> {
    let ttl = session_ttl(config.session.ttl_seconds)?;
    let groq_key = non_blank(config.groq_api_key.as_ref()).ok_or(
        StartupError::ConfigurationMissing {
            key: "GROQ_API_KEY",
        },
    )?;

    let groq_config = GroqConfig {
        temperature: config.completion.temperature,
        max_tokens: config.completion.max_tokens,
        ..GroqConfig::new(groq_key)
    }
    .with_base_url(&config.completion.base_url)
    .with_model(&config.completion.model)
    .with_timeout(Duration::from_secs(config.completion.timeout_seconds));

    let completion = GroqClient::new(groq_config).map_err(|e| StartupError::ProviderInit {
        provider: "groq",
        details: e.to_string(),
    })?;
    tracing::info!(model = %config.completion.model, "completion provider ready");

    let mut orchestrator = TurnOrchestrator::new(Arc::new(completion));

    match non_blank(config.deepgram_api_key.as_ref()) {
        Some(key) => {
            let speech_config = DeepgramConfig::new(key)
                .with_base_url(&config.speech.base_url)
                .with_timeout(Duration::from_secs(config.speech.timeout_seconds));
            let speech = DeepgramClient::new(speech_config).map_err(|e| {
                StartupError::ProviderInit {
                    provider: "deepgram",
                    details: e.to_string(),
                }
            })?;
            orchestrator = orchestrator.with_speech(Arc::new(speech));
            tracing::info!("speech provider ready");
        }
        None => {
            tracing::warn!("DEEPGRAM_API_KEY not set, voice replies are disabled");
        }
    }

    let tutor = TutorService::new(orchestrator)
        .with_defaults(SessionSettings::new(
            config.session.default_language.clone(),
            config.session.default_proficiency,
        ))
        .with_ttl(ttl);

    Ok(AppState::new(tutor))
}

/// Sweeps expired sessions every `interval`, starting one interval from now.
pub fn spawn_session_cleanup(tutor: Arc<TutorService>, interval: Duration) {
    // A zero period would panic in tokio.
    let interval = interval.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        loop {
            ticker.tick().await;
            let report = tutor.sweep_expired().await;
            if report.removed_count > 0 {
                tracing::debug!(
                    removed_sessions = report.removed_count,
                    "Periodic session cleanup"
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_environment(config::Environment::default().source(Some(source)))
            .expect("configuration should load")
    }

    fn server_config(groq: Option<&str>, deepgram: Option<&str>) -> ServerConfig {
        let mut vars = Vec::new();
        if let Some(key) = groq {
            vars.push(("GROQ_API_KEY", key));
        }
        if let Some(key) = deepgram {
            vars.push(("DEEPGRAM_API_KEY", key));
        }
        config_from(&vars)
    }

    #[test]
    fn missing_completion_key_is_fatal() {
        let err = build_state(&server_config(None, None)).err().expect("should fail");
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn blank_completion_key_is_fatal() {
        assert!(build_state(&server_config(Some("   "), None)).is_err());
    }

    #[test]
    fn missing_speech_key_disables_voice() {
        let state =
            build_state(&server_config(Some("gsk-test"), None)).expect("state should build");
        assert!(!state.tutor.speech_enabled());
    }

    #[test]
    fn speech_key_enables_voice() {
        let state = build_state(&server_config(Some("gsk-test"), Some("dg-test")))
            .expect("state should build");
        assert!(state.tutor.speech_enabled());
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        for ttl in ["0", "-60"] {
            let config =
                config_from(&[("GROQ_API_KEY", "gsk-test"), ("SESSION__TTL_SECONDS", ttl)]);
            let err = build_state(&config).err().expect("should fail");
            assert!(err.to_string().contains("SESSION__TTL_SECONDS"), "ttl {ttl}");
        }
    }

    #[test]
    fn out_of_range_ttl_is_rejected() {
        let max = i64::MAX.to_string();
        let config = config_from(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("SESSION__TTL_SECONDS", max.as_str()),
        ]);
        assert!(build_state(&config).is_err());
    }

    #[test]
    fn session_ttl_accepts_positive_seconds() {
        assert_eq!(session_ttl(7200).ok(), Some(ChronoDuration::hours(2)));
        assert!(matches!(
            session_ttl(-1),
            Err(StartupError::InvalidConfiguration { key: "SESSION__TTL_SECONDS", .. })
        ));
    }
}
