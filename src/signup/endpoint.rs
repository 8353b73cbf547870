use std::time::Duration;

use axum::async_trait;
use reqwest::{header::ACCEPT, multipart, Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::{form::ValidSignup, state::SubmissionEvent};

/// Payload sent to the hosted form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSubmission {
    pub name: String,
    pub email: String,
    pub source: Option<String>,
}

impl FormSubmission {
    pub fn from(signup: ValidSignup, source: Option<String>) -> Self {
        Self {
            name: signup.name,
            email: signup.email,
            source,
        }
    }
}

/// What the hosted form answered
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndpointResponse {
    Accepted,
    Rejected { error: Option<String> },
    Unreachable,
}

impl From<EndpointResponse> for SubmissionEvent {
    fn from(response: EndpointResponse) -> Self {
        match response {
            EndpointResponse::Accepted => SubmissionEvent::Accepted,
            EndpointResponse::Rejected { error } => SubmissionEvent::Rejected { error },
            EndpointResponse::Unreachable => SubmissionEvent::Unreachable,
        }
    }
}

/// Third-party service collecting the signups
#[async_trait]
pub trait FormEndpoint: Send + Sync {
    async fn submit(&self, submission: &FormSubmission) -> EndpointResponse;
}

/// Hosted form reached over HTTP
#[derive(Clone, Debug)]
pub struct HostedFormEndpoint {
    client: Client,
    url: Url,
}

impl HostedFormEndpoint {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl FormEndpoint for HostedFormEndpoint {
    async fn submit(&self, submission: &FormSubmission) -> EndpointResponse {
        let mut form = multipart::Form::new()
            .text("name", submission.name.clone())
            .text("email", submission.email.clone())
            .text("consent", "on");

        if let Some(source) = &submission.source {
            form = form.text("source", source.clone());
        }

        let response = match self
            .client
            .post(self.url.clone())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!("Sending signup to {} -> {:?}", self.url, error);
                return EndpointResponse::Unreachable;
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Signup accepted by {} with {}", self.url, status);
            return EndpointResponse::Accepted;
        }

        // A body that cannot be read is treated like an empty one
        let body = response.bytes().await.unwrap_or_default();
        warn!("Signup rejected by {} with {}", self.url, status);

        EndpointResponse::Rejected {
            error: parse_remote_error(&body),
        }
    }
}

/// Best-effort read of the `error` field of a JSON error body
pub fn parse_remote_error(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .filter(|error| !error.is_empty())
        .map(str::to_owned)
}
