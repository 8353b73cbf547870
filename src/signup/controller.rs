use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{
    document::{open_document, DocumentAccess, DocumentOpener},
    endpoint::{FormEndpoint, FormSubmission},
    form::ValidSignup,
    state::SubmissionState,
    views::{Draft, PageViews, Ticket, ViewId},
    SignupError, SubmissionPolicy,
};

/// Result of a submit
/// The endpoint call runs detached in both cases and settles the view even when the caller is gone.
/// `pending` yields the settled state, `None` when the view was evicted meanwhile
pub enum Submitted {
    /// Outcome is revealed once the endpoint answers
    Sending {
        pending: JoinHandle<Option<SubmissionState>>,
    },
    /// The preview is already being shown
    Opened {
        access: DocumentAccess,
        pending: JoinHandle<Option<SubmissionState>>,
    },
}

/// Signup form controller
#[derive(Clone)]
pub struct SignupController {
    endpoint: Arc<dyn FormEndpoint>,
    views: PageViews,
    policy: SubmissionPolicy,
    document_path: String,
    source: Option<String>,
}

impl SignupController {
    pub fn new(
        endpoint: Arc<dyn FormEndpoint>,
        views: PageViews,
        policy: SubmissionPolicy,
        document_path: String,
        source: Option<String>,
    ) -> Self {
        Self {
            endpoint,
            views,
            policy,
            document_path,
            source,
        }
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.policy
    }

    pub fn views(&self) -> &PageViews {
        &self.views
    }

    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    /// Submit a signup for a page view
    pub async fn submit(
        &self,
        view: ViewId,
        signup: ValidSignup,
        opener: &dyn DocumentOpener,
    ) -> Result<Submitted, SignupError> {
        let ticket = self.views.begin(
            view,
            Draft {
                name: signup.name.clone(),
                email: signup.email.clone(),
                consent: true,
            },
            self.policy,
        )?;
        info!("Submitting signup for view {} ({})", view, self.policy);

        let submission = FormSubmission::from(signup, self.source.clone());

        match self.policy {
            SubmissionPolicy::Confirm => Ok(Submitted::Sending {
                pending: self.dispatch(ticket, submission),
            }),
            SubmissionPolicy::Optimistic => {
                let access = open_document(opener, &self.document_path);

                Ok(Submitted::Opened {
                    access,
                    pending: self.dispatch(ticket, submission),
                })
            }
        }
    }

    fn dispatch(
        &self,
        ticket: Ticket,
        submission: FormSubmission,
    ) -> JoinHandle<Option<SubmissionState>> {
        let endpoint = self.endpoint.clone();
        let views = self.views.clone();
        let policy = self.policy;

        tokio::spawn(async move {
            let response = endpoint.submit(&submission).await;
            let settled = views.settle(&ticket, response.into(), policy);
            if settled.is_none() {
                debug!("View {} left before its signup settled", ticket.view());
            }

            settled
        })
    }
}
