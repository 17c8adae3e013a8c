//! Contact submission
//!
//! `pipeline` is the server-side flow shared by the bare endpoint and
//! the form controller; `form` is the per-session submit state machine
//! the UI observes.

pub mod form;
pub mod pipeline;

pub use form::{FormController, FormEvent, FormState, FormTiming, FormView, SubmitStatus};
pub use pipeline::{process_submission, SubmitError};
