//! Session engine: one generation request in flight at a time.
//!
//! Owns the session-lifetime state (seen-sentence index, bounded history,
//! target language) and coordinates the async request lifecycle:
//!
//! - submit returns immediately; the request runs on a spawned task
//! - empty topics and submits while loading are silent no-ops
//! - cancellation is a token checked at the resolution boundary; a
//!   cancelled response is discarded without touching session state
//! - history and the dedup index are mutated only on the successful,
//!   non-cancelled completion path, under the state lock

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::GenerationClient;
use crate::error::GenerationError;
use crate::history::History;
use crate::language::Language;
use crate::processor::{GenerationResult, ResponseProcessor, SeenSentences};
use crate::prompt::{GenerationRequest, MAX_EXCLUDED_TITLES, build_prompt};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a submit call.
pub enum SubmitOutcome {
    /// Empty topic, or a request was already in flight. Nothing happened.
    Ignored,
    /// A request was started; the handle resolves when it completes.
    Started(JoinHandle<GenerationOutcome>),
}

/// Terminal state of one generation request.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Deduplicated results, already recorded in the session history.
    Completed(Vec<GenerationResult>),
    /// The request was cancelled; its response was discarded.
    Cancelled,
    /// The upstream call failed; session state is unchanged.
    Failed(GenerationError),
}

struct InFlight {
    request_id: u64,
    token: CancellationToken,
}

struct SessionState {
    seen: SeenSentences,
    history: History,
    language: Language,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

/// Generation session engine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionEngine {
    client: Arc<dyn GenerationClient>,
    state: Arc<Mutex<SessionState>>,
    timeout: Duration,
}

impl SessionEngine {
    pub fn new(client: Arc<dyn GenerationClient>, language: Language) -> Self {
        Self::new_with_timeout(client, language, DEFAULT_TIMEOUT)
    }

    pub fn new_with_timeout(
        client: Arc<dyn GenerationClient>,
        language: Language,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SessionState {
                seen: SeenSentences::new(),
                history: History::new(),
                language,
                in_flight: None,
                next_request_id: 0,
            })),
            timeout,
        }
    }

    /// Submit a topic for generation.
    ///
    /// Returns [`SubmitOutcome::Ignored`] for an empty or whitespace-only
    /// topic, or while another request is in flight. Otherwise spawns the
    /// request and returns a handle to its outcome; the call itself does
    /// not block.
    pub fn submit(&self, topic: &str) -> SubmitOutcome {
        let topic = topic.trim();
        if topic.is_empty() {
            tracing::debug!("ignoring empty topic");
            return SubmitOutcome::Ignored;
        }

        let (request, token, request_id) = {
            let mut state = self.lock_state();
            if state.in_flight.is_some() {
                tracing::debug!("ignoring submit while a request is in flight");
                return SubmitOutcome::Ignored;
            }

            let titles = state.history.recent_titles(MAX_EXCLUDED_TITLES);
            let request = GenerationRequest::new(topic, state.language, titles);

            let token = CancellationToken::new();
            let request_id = state.next_request_id;
            state.next_request_id += 1;
            state.in_flight = Some(InFlight {
                request_id,
                token: token.clone(),
            });
            (request, token, request_id)
        };

        tracing::info!(topic, language = request.language().tag(), "starting generation");

        let prompt = build_prompt(&request);
        let language = request.language();
        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            let resolved = tokio::select! {
                _ = token.cancelled() => None,
                result = tokio::time::timeout(timeout, client.generate(&prompt)) => Some(result),
            };

            let mut state = state.lock().expect("session state lock poisoned");
            // Clear the loading guard unless a newer request replaced it
            // after a cancel.
            if state
                .in_flight
                .as_ref()
                .is_some_and(|f| f.request_id == request_id)
            {
                state.in_flight = None;
            }

            match resolved {
                // Cancelled before or while resolving: discard silently.
                None => GenerationOutcome::Cancelled,
                Some(_) if token.is_cancelled() => {
                    tracing::debug!(request_id, "discarding cancelled response");
                    GenerationOutcome::Cancelled
                }
                Some(Ok(Ok(records))) => {
                    let processor = ResponseProcessor::new(language);
                    let results = processor.process(records, &mut state.seen);
                    for result in &results {
                        state.history.push(result.clone());
                    }
                    tracing::info!(
                        request_id,
                        results = results.len(),
                        "generation completed"
                    );
                    GenerationOutcome::Completed(results)
                }
                Some(Ok(Err(err))) => {
                    tracing::warn!(request_id, error = %err, "generation failed");
                    GenerationOutcome::Failed(err)
                }
                Some(Err(_elapsed)) => {
                    tracing::warn!(request_id, "generation timed out");
                    GenerationOutcome::Failed(GenerationError::Timeout(timeout.as_secs()))
                }
            }
        });

        SubmitOutcome::Started(handle)
    }

    /// Cancel the in-flight request, if any.
    ///
    /// The session leaves the loading state immediately; the background
    /// call discards its result when it resolves. Returns whether a
    /// request was actually cancelled.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock_state();
        match state.in_flight.take() {
            Some(in_flight) => {
                in_flight.token.cancel();
                tracing::info!(request_id = in_flight.request_id, "generation cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a request is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.lock_state().in_flight.is_some()
    }

    /// Snapshot of the session history, newest first.
    pub fn history(&self) -> Vec<GenerationResult> {
        self.lock_state().history.snapshot()
    }

    /// Number of distinct sentence fingerprints recorded this session.
    pub fn seen_sentence_count(&self) -> usize {
        self.lock_state().seen.len()
    }

    pub fn language(&self) -> Language {
        self.lock_state().language
    }

    /// Change the target language for subsequent requests. The dedup index
    /// and history carry over.
    pub fn set_language(&self, language: Language) {
        self.lock_state().language = language;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }
}
