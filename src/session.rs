//! Chat session controller
//!
//! The controller owns the transcript, the loading flag and the draft input,
//! and sequences each user turn:
//!
//! 1. a non-blank submission while idle appends the user message, clears the
//!    draft and marks the session as awaiting a response;
//! 2. the completion client is called exactly once;
//! 3. success appends the assistant reply, failure publishes an ephemeral
//!    notification; either way the session returns to idle.
//!
//! Submissions made while a response is outstanding are dropped, not queued.
//! Every state change is published to subscribed observers, which is how the
//! terminal surface stays in sync without the controller knowing about it.

use crate::config::ChatConfig;
use crate::error::{ExpertError, Result};
use crate::providers::CompletionClient;
use crate::transcript::{Message, Transcript};
use std::fmt;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready to accept a submission
    Idle,
    /// A completion request is in flight
    AwaitingResponse,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingResponse => write!(f, "awaiting response"),
        }
    }
}

/// Ephemeral notification for the presentation surface
///
/// Never part of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

/// State change published to observers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A message was added to the end of the transcript
    MessageAppended(Message),
    /// The loading indicator turned on or off
    LoadingChanged(bool),
    /// The draft input changed
    DraftChanged(String),
    /// A turn failed
    Notification(Notification),
}

/// Receives session events
pub trait SessionObserver {
    fn on_event(&self, event: &SessionEvent);
}

/// Ticket for an accepted submission whose reply is outstanding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    id: u64,
    text: String,
}

impl PendingTurn {
    /// The submitted text, trimmed
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Result of submitting or resolving a turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// A request was already outstanding, the submission was dropped
    Busy,
    /// The assistant reply was appended
    Replied(Message),
    /// The turn failed; no reply was appended
    Failed(String),
    /// The resolution did not belong to the outstanding request and was discarded
    Discarded,
}

/// Read-only summary of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub messages: usize,
    pub user_turns: usize,
    pub draft_len: usize,
}

/// Check that a submission has something to send
///
/// # Errors
///
/// Returns `ExpertError::Validation` for empty or whitespace-only input
pub fn validate_input(text: &str) -> std::result::Result<&str, ExpertError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExpertError::Validation("input is empty".to_string()));
    }
    Ok(trimmed)
}

/// Owns the transcript and sequences user turns
pub struct SessionController {
    transcript: Transcript,
    pending: Option<u64>,
    next_turn: u64,
    draft: String,
    failure_notice: String,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl SessionController {
    /// Creates an idle session whose transcript starts with `greeting`
    ///
    /// # Examples
    ///
    /// ```
    /// use iexpert::session::{SessionController, SessionState};
    ///
    /// let session = SessionController::new("Hello!", "Request failed");
    /// assert_eq!(session.state(), SessionState::Idle);
    /// assert_eq!(session.transcript().len(), 1);
    /// ```
    pub fn new(greeting: impl Into<String>, failure_notice: impl Into<String>) -> Self {
        let mut transcript = Transcript::new();
        transcript.append(Message::assistant(greeting));
        Self {
            transcript,
            pending: None,
            next_turn: 1,
            draft: String::new(),
            failure_notice: failure_notice.into(),
            observers: Vec::new(),
        }
    }

    /// Creates a session using the configured greeting and failure text
    pub fn from_config(chat: &ChatConfig) -> Self {
        Self::new(chat.greeting.clone(), chat.failure_notice.clone())
    }

    /// Registers an observer for all subsequent events
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    fn publish(&self, event: SessionEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            SessionState::AwaitingResponse
        } else {
            SessionState::Idle
        }
    }

    /// Whether the loading indicator is on
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current draft input
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft input
    pub fn set_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.draft {
            return;
        }
        self.draft = text;
        self.publish(SessionEvent::DraftChanged(self.draft.clone()));
    }

    /// Snapshot for status displays
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state(),
            messages: self.transcript.len(),
            user_turns: self
                .transcript
                .iter()
                .filter(|m| m.role() == crate::transcript::Role::User)
                .count(),
            draft_len: self.draft.chars().count(),
        }
    }

    /// Accepts a submission if the session is idle and the text is not blank
    ///
    /// On acceptance the user message is appended, the draft is cleared and
    /// the session waits for `finish_turn`. Returns `None` when the input is
    /// blank or a request is already outstanding; neither case changes state.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let trimmed = match validate_input(text) {
            Ok(t) => t.to_string(),
            Err(e) => {
                tracing::debug!("Ignoring submission: {}", e);
                return None;
            }
        };

        if let Some(outstanding) = self.pending {
            tracing::debug!(turn = outstanding, "Dropping submission while awaiting response");
            return None;
        }

        let id = self.next_turn;
        self.next_turn += 1;
        self.pending = Some(id);

        let message = Message::user(trimmed.clone());
        self.transcript.append(message.clone());
        tracing::debug!(turn = id, "User turn accepted");

        self.publish(SessionEvent::MessageAppended(message));
        if !self.draft.is_empty() {
            self.draft.clear();
            self.publish(SessionEvent::DraftChanged(String::new()));
        }
        self.publish(SessionEvent::LoadingChanged(true));

        Some(PendingTurn { id, text: trimmed })
    }

    /// Resolves an outstanding turn with the completion result
    pub fn finish_turn(&mut self, turn: PendingTurn, result: Result<String>) -> TurnOutcome {
        if self.pending != Some(turn.id) {
            tracing::debug!(turn = turn.id, "Discarding resolution for stale turn");
            return TurnOutcome::Discarded;
        }
        self.pending = None;

        let outcome = match result {
            Ok(content) => {
                let message = Message::assistant(content);
                self.transcript.append(message.clone());
                tracing::debug!(turn = turn.id, "Assistant reply appended");
                self.publish(SessionEvent::MessageAppended(message.clone()));
                TurnOutcome::Replied(message)
            }
            Err(err) => {
                let transport = err
                    .downcast_ref::<ExpertError>()
                    .map(ExpertError::is_transport)
                    .unwrap_or(false);
                if transport {
                    tracing::warn!(turn = turn.id, "Turn failed in transport: {}", err);
                } else {
                    tracing::error!(turn = turn.id, "Turn failed: {:#}", err);
                }
                self.publish(SessionEvent::Notification(Notification {
                    title: "Error".to_string(),
                    description: self.failure_notice.clone(),
                }));
                TurnOutcome::Failed(err.to_string())
            }
        };

        self.publish(SessionEvent::LoadingChanged(false));
        outcome
    }

    /// Runs one full turn: accept, call the client once, resolve
    pub async fn submit(&mut self, client: &dyn CompletionClient, text: &str) -> TurnOutcome {
        if validate_input(text).is_err() {
            return TurnOutcome::Ignored;
        }
        let turn = match self.begin_turn(text) {
            Some(turn) => turn,
            None => return TurnOutcome::Busy,
        };
        let result = client.complete(turn.text()).await;
        self.finish_turn(turn, result)
    }

    /// Submits the current draft
    pub async fn submit_draft(&mut self, client: &dyn CompletionClient) -> TurnOutcome {
        let draft = self.draft.clone();
        self.submit(client, &draft).await
    }
}
