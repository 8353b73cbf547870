mod config;
mod general;
mod landing;
mod signup;

use std::sync::Arc;

use shuttle_runtime::SecretStore;
use tracing::info;

use crate::{
    config::LandingConfig,
    signup::{controller::SignupController, endpoint::HostedFormEndpoint, views::PageViews},
};

/// Branding of the landing variant
#[derive(Clone, Debug)]
pub struct Site {
    pub title: String,
    pub company: String,
}

#[derive(Clone)]
pub struct AppState {
    pub site: Site,
    pub signup: SignupController,
}

#[shuttle_runtime::main]
async fn main(#[shuttle_runtime::Secrets] secrets: SecretStore) -> shuttle_axum::ShuttleAxum {
    let config = LandingConfig::from_secrets(&secrets)
        .map_err(|error| shuttle_runtime::Error::Custom(error.into()))?;

    let endpoint = HostedFormEndpoint::new(config.form_endpoint.clone(), config.request_timeout)
        .map_err(|error| shuttle_runtime::Error::Custom(error.into()))?;

    info!(
        "Serving '{}' with {} signups to {}",
        config.site_title, config.policy, config.form_endpoint
    );

    let state = AppState {
        site: Site {
            title: config.site_title,
            company: config.company_name,
        },
        signup: SignupController::new(
            Arc::new(endpoint),
            PageViews::new(config.view_ttl, config.max_views),
            config.policy,
            config.preview_path,
            config.source_tag,
        ),
    };

    Ok(landing::router(state, &config.preview_dir).into())
}
