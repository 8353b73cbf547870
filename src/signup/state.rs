use std::fmt;

use super::SubmissionPolicy;

pub const REJECTED_FALLBACK: &str = "Something went wrong. Please try again.";
pub const NETWORK_FAILURE: &str = "Network error. Please try again.";
pub const OPTIMISTIC_REJECTED: &str =
    "Your preview opened, but we couldn't confirm your signup. Please try again.";
pub const OPTIMISTIC_UNREACHABLE: &str =
    "Your preview opened, but we couldn't reach our signup service. Please try again.";

/// Submission status
/// The message of a failed submission lives inside the error variant
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let status = match self {
            Status::Idle => "idle",
            Status::Submitting => "submitting",
            Status::Success => "success",
            Status::Error(_) => "error",
        };

        write!(f, "{}", status)
    }
}

/// What can happen to a page's signup form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    Accepted,
    Rejected { error: Option<String> },
    Unreachable,
}

/// Submission state of one page view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionState {
    status: Status,
}

impl SubmissionState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn error_message(&self) -> &str {
        match &self.status {
            Status::Error(message) => message,
            _ => "",
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == Status::Submitting
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, Status::Error(_))
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    /// Apply an event
    /// A submit while submitting is ignored, responses are applied whatever the current status
    pub fn transition(self, event: &SubmissionEvent, policy: SubmissionPolicy) -> Self {
        let status = match event {
            SubmissionEvent::Submit if self.is_submitting() => return self,
            SubmissionEvent::Submit => Status::Submitting,
            SubmissionEvent::Accepted => Status::Success,
            SubmissionEvent::Rejected { error } => Status::Error(match policy {
                SubmissionPolicy::Confirm => error
                    .as_deref()
                    .filter(|error| !error.is_empty())
                    .unwrap_or(REJECTED_FALLBACK)
                    .to_owned(),
                SubmissionPolicy::Optimistic => OPTIMISTIC_REJECTED.to_owned(),
            }),
            SubmissionEvent::Unreachable => Status::Error(
                match policy {
                    SubmissionPolicy::Confirm => NETWORK_FAILURE,
                    SubmissionPolicy::Optimistic => OPTIMISTIC_UNREACHABLE,
                }
                .to_owned(),
            ),
        };

        Self { status }
    }
}
