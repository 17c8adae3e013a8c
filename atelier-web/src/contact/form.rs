//! Contact form state machine
//!
//! The submit flow as the UI sees it: `idle → submitting → {success,
//! error}`. Success returns to idle on a timer; error stays until the
//! next submit attempt clears it. The pure machine lives in
//! `FormState`; `FormController` adds the pipeline call, the success
//! reset clock, and the event feed.

use super::pipeline;
use crate::sched::Scheduled;
use crate::sink::SheetsClient;
use atelier_common::validation::{self, ContactSubmission};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// Outcome of the submit guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginSubmit {
    /// A submission is already in flight; ignored
    AlreadySubmitting,
    /// Whole-form validation failed; field errors populated, no
    /// transition
    FieldErrors,
    /// Now submitting
    Proceed,
}

#[derive(Debug)]
pub struct FormState {
    status: SubmitStatus,
    field_errors: BTreeMap<&'static str, String>,
    error_message: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            status: SubmitStatus::Idle,
            field_errors: BTreeMap::new(),
            error_message: None,
        }
    }

    /// Submit guard. Clears the previous attempt's error message and
    /// status, then gates on whole-form validation: any failing field
    /// blocks the transition and surfaces per-field errors instead.
    pub fn begin_submit(&mut self, submission: &ContactSubmission) -> BeginSubmit {
        if self.status == SubmitStatus::Submitting {
            return BeginSubmit::AlreadySubmitting;
        }
        self.error_message = None;
        self.status = SubmitStatus::Idle;

        let errors = validation::validate_form(submission);
        if !errors.is_empty() {
            self.field_errors = errors;
            return BeginSubmit::FieldErrors;
        }
        self.field_errors.clear();
        self.status = SubmitStatus::Submitting;
        BeginSubmit::Proceed
    }

    pub fn succeed(&mut self) {
        self.status = SubmitStatus::Success;
        self.field_errors.clear();
        self.error_message = None;
    }

    pub fn fail(&mut self, message: String) {
        self.status = SubmitStatus::Error;
        self.error_message = Some(message);
    }

    /// Timed return to idle. Only success auto-resets; an error stays
    /// visible until the user tries again.
    pub fn reset_after_success(&mut self) -> bool {
        if self.status == SubmitStatus::Success {
            self.status = SubmitStatus::Idle;
            true
        } else {
            false
        }
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn snapshot(&self) -> FormView {
        FormView {
            status: self.status,
            field_errors: self
                .field_errors
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            error_message: self.error_message.clone(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Form state as sent to the client
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub status: SubmitStatus,
    pub field_errors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum FormEvent {
    /// Sent once to each new SSE subscriber
    InitialState {
        state: FormView,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        state: FormView,
        timestamp: DateTime<Utc>,
    },
}

impl FormEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FormEvent::InitialState { .. } => "InitialState",
            FormEvent::StatusChanged { .. } => "StatusChanged",
        }
    }
}

/// Timer cadences, configurable so tests run in milliseconds
#[derive(Debug, Clone, Copy)]
pub struct FormTiming {
    /// How long the success indicator stays up
    pub success_reset: Duration,
}

impl Default for FormTiming {
    fn default() -> Self {
        Self {
            success_reset: Duration::from_millis(5000),
        }
    }
}

struct Inner {
    state: Mutex<FormState>,
    events: broadcast::Sender<FormEvent>,
    timing: FormTiming,
    sink: Option<Arc<SheetsClient>>,
    reset_task: Mutex<Option<Scheduled>>,
}

/// One live contact form session
pub struct FormController {
    inner: Arc<Inner>,
}

impl FormController {
    pub fn new(sink: Option<Arc<SheetsClient>>, timing: FormTiming) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(FormState::new()),
                events,
                timing,
                sink,
                reset_task: Mutex::new(None),
            }),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.inner.events.subscribe()
    }

    pub async fn snapshot(&self) -> FormView {
        self.inner.state.lock().await.snapshot()
    }

    /// Run one submit attempt to completion and return the resulting
    /// state. Intermediate transitions go out on the event feed.
    pub async fn submit(&self, submission: &ContactSubmission) -> FormView {
        let (outcome, view) = {
            let mut state = self.inner.state.lock().await;
            let outcome = state.begin_submit(submission);
            (outcome, state.snapshot())
        };
        match outcome {
            BeginSubmit::AlreadySubmitting | BeginSubmit::FieldErrors => return view,
            BeginSubmit::Proceed => {
                self.inner.emit_status(view);
            }
        }

        let result =
            pipeline::process_submission(self.inner.sink.as_deref(), submission).await;

        let view = {
            let mut state = self.inner.state.lock().await;
            match &result {
                Ok(_) => state.succeed(),
                Err(err) => state.fail(err.message().to_string()),
            }
            state.snapshot()
        };
        self.inner.emit_status(view.clone());

        if view.status == SubmitStatus::Success {
            self.schedule_success_reset().await;
        }
        view
    }

    async fn schedule_success_reset(&self) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = Scheduled::once(self.inner.timing.success_reset, async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let view = {
                let mut state = inner.state.lock().await;
                if !state.reset_after_success() {
                    return;
                }
                state.snapshot()
            };
            inner.emit_status(view);
        });
        *self.inner.reset_task.lock().await = Some(task);
    }
}

impl Inner {
    fn emit_status(&self, state: FormView) {
        let _ = self.events.send(FormEvent::StatusChanged {
            state,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactSubmission {
        ContactSubmission {
            email: "a@b.co".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            message: "A message long enough.".to_string(),
        }
    }

    fn invalid() -> ContactSubmission {
        ContactSubmission {
            email: "bad".to_string(),
            first_name: "A".to_string(),
            last_name: "Lovelace".to_string(),
            message: "short".to_string(),
        }
    }

    #[test]
    fn test_field_errors_block_transition() {
        let mut state = FormState::new();
        assert_eq!(state.begin_submit(&invalid()), BeginSubmit::FieldErrors);
        assert_eq!(state.status(), SubmitStatus::Idle);
        let view = state.snapshot();
        assert_eq!(view.field_errors.len(), 3);
        assert!(view.field_errors.contains_key("email"));
        assert!(view.field_errors.contains_key("firstName"));
        assert!(view.field_errors.contains_key("message"));
    }

    #[test]
    fn test_valid_submit_proceeds_and_clears_errors() {
        let mut state = FormState::new();
        state.begin_submit(&invalid());
        assert_eq!(state.begin_submit(&valid()), BeginSubmit::Proceed);
        assert_eq!(state.status(), SubmitStatus::Submitting);
        assert!(state.snapshot().field_errors.is_empty());
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut state = FormState::new();
        state.begin_submit(&valid());
        assert_eq!(state.begin_submit(&valid()), BeginSubmit::AlreadySubmitting);
    }

    #[test]
    fn test_error_persists_until_next_attempt() {
        let mut state = FormState::new();
        state.begin_submit(&valid());
        state.fail("Failed to submit form. Please try again.".to_string());
        assert_eq!(state.status(), SubmitStatus::Error);
        // No timed reset for errors
        assert!(!state.reset_after_success());
        assert_eq!(state.status(), SubmitStatus::Error);
        // The next attempt clears the message
        state.begin_submit(&valid());
        assert!(state.snapshot().error_message.is_none());
    }

    #[test]
    fn test_success_resets_once() {
        let mut state = FormState::new();
        state.begin_submit(&valid());
        state.succeed();
        assert!(state.reset_after_success());
        assert_eq!(state.status(), SubmitStatus::Idle);
        assert!(!state.reset_after_success());
    }
}
