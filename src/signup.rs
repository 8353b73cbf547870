pub mod controller;
pub mod document;
pub mod endpoint;
pub mod form;
pub mod state;
pub mod views;

use std::{fmt, str::FromStr};

/// How a signup relates to the preview document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPolicy {
    /// Wait for the form endpoint, then reveal the download link
    #[default]
    Confirm,
    /// Open the preview straight away and submit in the background
    Optimistic,
}

impl FromStr for SubmissionPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirm" => Ok(SubmissionPolicy::Confirm),
            "optimistic" => Ok(SubmissionPolicy::Optimistic),
            other => Err(other.to_owned()),
        }
    }
}

impl fmt::Display for SubmissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let policy = match self {
            SubmissionPolicy::Confirm => "confirm",
            SubmissionPolicy::Optimistic => "optimistic",
        };

        write!(f, "{}", policy)
    }
}

/// Error types
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupError {
    AlreadySubmitting,
    UnknownView,
}

impl fmt::Display for SignupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            SignupError::AlreadySubmitting => "Your signup is already being sent",
            SignupError::UnknownView => "This page has expired, please try again",
        };

        write!(f, "{}", message)
    }
}
