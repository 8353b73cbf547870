use askama_axum::{IntoResponse, Response, Template};
use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Form, Router,
};
use http::StatusCode;
use serde::Deserialize;
use time::OffsetDateTime;
use tower_http::services::ServeDir;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    general::message::MessageBlock,
    signup::{
        controller::Submitted,
        document::{DocumentAccess, ResponseOpener},
        form::SignupForm,
        views::{Draft, ViewId, ViewSnapshot},
        SignupError, SubmissionPolicy,
    },
    AppState,
};

#[derive(Template)]
#[template(path = "landing_page.html")]
pub struct LandingPage {
    title: String,
    company: String,
    view: ViewId,
    optimistic: bool,
    snapshot: ViewSnapshot,
    message: MessageBlock,
    preview_href: String,
    year: i32,
}

impl LandingPage {
    pub fn from(state: &AppState, view: ViewId, snapshot: ViewSnapshot, message: MessageBlock) -> Self {
        let optimistic = state.signup.policy() == SubmissionPolicy::Optimistic;

        // Input notices take the place of the submission error, the status frame shows it otherwise
        let message = if message.is_empty() && snapshot.state.is_error() && !optimistic {
            MessageBlock::error(snapshot.state.error_message())
        } else {
            message
        };

        Self {
            title: state.site.title.clone(),
            company: state.site.company.clone(),
            view,
            optimistic,
            snapshot,
            message,
            preview_href: preview_href(state.signup.document_path()),
            year: OffsetDateTime::now_utc().year(),
        }
    }

    fn submit_disabled(&self) -> bool {
        self.snapshot.state.is_submitting()
    }

    /// Reload the view until the endpoint answers
    fn polling(&self) -> bool {
        self.snapshot.state.is_submitting()
    }

    fn submit_label(&self) -> &'static str {
        if self.submit_disabled() && !self.optimistic {
            "Sending…"
        } else {
            "Email me the preview"
        }
    }
}

/// Signup status frame
/// Embedded in the optimistic page, whose form answers in another browsing context
#[derive(Template)]
#[template(path = "signup/status.html")]
pub struct SignupStatus {
    optimistic: bool,
    snapshot: ViewSnapshot,
    message: MessageBlock,
    preview_href: String,
}

impl SignupStatus {
    pub fn from(state: &AppState, snapshot: ViewSnapshot) -> Self {
        let message = if snapshot.state.is_error() {
            MessageBlock::error(snapshot.state.error_message())
        } else {
            MessageBlock::empty()
        };

        Self {
            optimistic: state.signup.policy() == SubmissionPolicy::Optimistic,
            snapshot,
            message,
            preview_href: preview_href(state.signup.document_path()),
        }
    }

    /// Seconds until the next reload, none once the signup succeeded
    fn refresh_secs(&self) -> Option<u8> {
        if self.snapshot.state.is_success() {
            None
        } else if self.snapshot.state.is_submitting() {
            Some(1)
        } else {
            Some(3)
        }
    }
}

fn preview_href(path: &str) -> String {
    url_escape::encode_path(path).into_owned()
}

fn view_url(view: ViewId) -> String {
    format!("/?view={}", view)
}

fn signup_url(view: ViewId) -> String {
    format!("/?view={}#signup", view)
}

/// Query parameters definition
/// Unparsable ids are treated like missing ones
#[derive(Deserialize)]
pub struct ViewParams {
    view: Option<String>,
}

impl ViewParams {
    fn view_id(&self) -> Option<ViewId> {
        self.view.as_deref().and_then(|view| Uuid::parse_str(view).ok())
    }
}

/// Get handler
/// Renders an existing page view, or starts a new one
pub async fn get_handler(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Response {
    let views = state.signup.views();

    match params
        .view_id()
        .and_then(|view| views.snapshot(view).map(|snapshot| (view, snapshot)))
    {
        Some((view, snapshot)) => {
            LandingPage::from(&state, view, snapshot, MessageBlock::empty()).into_response()
        }
        None => {
            let view = views.open();
            debug!("Opened page view {} ({} live)", view, views.len());

            Redirect::to(&view_url(view)).into_response()
        }
    }
}

/// Status handler
/// The frame stops reloading once its view is gone
pub async fn status_handler(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<SignupStatus, StatusCode> {
    let snapshot = params
        .view_id()
        .and_then(|view| state.signup.views().snapshot(view))
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(SignupStatus::from(&state, snapshot))
}

/// Post handler
/// Validates the form then hands it to the signup controller, the view shows the outcome once settled
pub async fn post_handler(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
    Form(form): Form<SignupForm>,
) -> Result<Response, (StatusCode, LandingPage)> {
    let views = state.signup.views();

    let Some((view, snapshot)) = params
        .view_id()
        .and_then(|view| views.snapshot(view).map(|snapshot| (view, snapshot)))
    else {
        debug!("Signup posted for an unknown page view");
        return Ok(Redirect::to("/").into_response());
    };

    let draft = Draft {
        name: form.name.clone(),
        email: form.email.clone(),
        consent: form.consent.is_some(),
    };

    let signup = form.validate().map_err(|error| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            LandingPage::from(
                &state,
                view,
                ViewSnapshot {
                    state: snapshot.state.clone(),
                    draft: draft.clone(),
                },
                MessageBlock::notice(&error.to_string()),
            ),
        )
    })?;

    match state.signup.submit(view, signup, &ResponseOpener).await {
        Ok(Submitted::Sending { .. }) => Ok(Redirect::to(&signup_url(view)).into_response()),
        Ok(Submitted::Opened { access, .. }) => {
            let target = match access {
                DocumentAccess::CurrentContext(_) => preview_href(access.path()),
                DocumentAccess::NewContext(_) => signup_url(view),
            };

            Ok(Redirect::to(&target).into_response())
        }
        Err(SignupError::UnknownView) => Ok(Redirect::to("/").into_response()),
        Err(error @ SignupError::AlreadySubmitting) => {
            warn!("Signup posted again for view {} while in flight", view);

            Err((
                StatusCode::CONFLICT,
                LandingPage::from(
                    &state,
                    view,
                    views.snapshot(view).unwrap_or(snapshot),
                    MessageBlock::notice(&error.to_string()),
                ),
            ))
        }
    }
}

pub fn router(state: AppState, preview_dir: &str) -> Router {
    Router::new()
        .route("/", get(get_handler))
        .route("/signup", post(post_handler))
        .route("/signup/status", get(status_handler))
        .nest_service("/preview", ServeDir::new(preview_dir))
        .nest_service("/assets", ServeDir::new("assets"))
        .with_state(state)
}
