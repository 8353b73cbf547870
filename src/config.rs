use std::{error::Error, fmt, time::Duration};

use reqwest::Url;
use shuttle_runtime::SecretStore;

use crate::signup::SubmissionPolicy;

const DEFAULT_FORM_ENDPOINT: &str = "https://formspree.io/f/xwprzbyn";
const DEFAULT_PREVIEW_PATH: &str = "/preview/Borderless-by-Design-Preview.pdf";
const DEFAULT_PREVIEW_DIR: &str = "assets/preview";
const DEFAULT_SITE_TITLE: &str = "Borderless by Design";
const DEFAULT_COMPANY_NAME: &str = "Torvaire";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_VIEW_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_PAGE_VIEWS: usize = 10_000;

/// Error types
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEndpoint(String),
    InvalidPolicy(String),
    InvalidPreviewPath(String),
    InvalidSeconds(&'static str, String),
    InvalidCount(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidEndpoint(value) => {
                write!(f, "FORM_ENDPOINT is not a valid URL: {}", value)
            }
            ConfigError::InvalidPolicy(value) => write!(
                f,
                "SUBMISSION_POLICY must be 'confirm' or 'optimistic', got '{}'",
                value
            ),
            ConfigError::InvalidPreviewPath(value) => write!(
                f,
                "PREVIEW_PATH must be an absolute path below /preview/, got '{}'",
                value
            ),
            ConfigError::InvalidSeconds(key, value) => {
                write!(f, "{} must be a positive number of seconds, got '{}'", key, value)
            }
            ConfigError::InvalidCount(key, value) => {
                write!(f, "{} must be a positive number, got '{}'", key, value)
            }
        }
    }
}

impl Error for ConfigError {}

/// Landing site configuration
/// Read from the shuttle secrets, every key has a default
#[derive(Clone, Debug)]
pub struct LandingConfig {
    pub form_endpoint: Url,
    pub policy: SubmissionPolicy,
    pub preview_path: String,
    pub preview_dir: String,
    pub source_tag: Option<String>,
    pub site_title: String,
    pub company_name: String,
    pub request_timeout: Duration,
    pub view_ttl: Duration,
    pub max_views: usize,
}

impl LandingConfig {
    pub fn from_secrets(secrets: &SecretStore) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| secrets.get(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Blank values count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let form_endpoint = get("FORM_ENDPOINT").unwrap_or(DEFAULT_FORM_ENDPOINT.to_owned());
        let form_endpoint =
            Url::parse(&form_endpoint).map_err(|_| ConfigError::InvalidEndpoint(form_endpoint))?;

        let policy = match get("SUBMISSION_POLICY") {
            Some(policy) => policy.parse().map_err(ConfigError::InvalidPolicy)?,
            None => SubmissionPolicy::default(),
        };

        let preview_path = get("PREVIEW_PATH").unwrap_or(DEFAULT_PREVIEW_PATH.to_owned());
        if !preview_path.starts_with("/preview/") || preview_path.len() <= "/preview/".len() {
            return Err(ConfigError::InvalidPreviewPath(preview_path));
        }

        Ok(Self {
            form_endpoint,
            policy,
            preview_path,
            preview_dir: get("PREVIEW_DIR").unwrap_or(DEFAULT_PREVIEW_DIR.to_owned()),
            source_tag: get("SOURCE_TAG"),
            site_title: get("SITE_TITLE").unwrap_or(DEFAULT_SITE_TITLE.to_owned()),
            company_name: get("COMPANY_NAME").unwrap_or(DEFAULT_COMPANY_NAME.to_owned()),
            request_timeout: seconds(
                "REQUEST_TIMEOUT_SECS",
                get("REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            view_ttl: seconds("VIEW_TTL_SECS", get("VIEW_TTL_SECS"), DEFAULT_VIEW_TTL_SECS)?,
            max_views: match get("MAX_PAGE_VIEWS") {
                Some(value) => match value.parse::<usize>() {
                    Ok(count) if count > 0 => count,
                    _ => return Err(ConfigError::InvalidCount("MAX_PAGE_VIEWS", value)),
                },
                None => DEFAULT_MAX_PAGE_VIEWS,
            },
        })
    }
}

fn seconds(key: &'static str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => match value.parse::<u64>() {
            Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
            _ => Err(ConfigError::InvalidSeconds(key, value)),
        },
        None => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<LandingConfig, ConfigError> {
        let secrets: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        LandingConfig::from_lookup(|key| secrets.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_original_site() {
        let config = config(&[]).unwrap();

        assert_eq!(config.form_endpoint.as_str(), DEFAULT_FORM_ENDPOINT);
        assert_eq!(config.policy, SubmissionPolicy::Confirm);
        assert_eq!(config.preview_path, DEFAULT_PREVIEW_PATH);
        assert_eq!(config.source_tag, None);
        assert_eq!(config.site_title, "Borderless by Design");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.view_ttl, Duration::from_secs(3600));
        assert_eq!(config.max_views, 10_000);
    }

    #[test]
    fn reads_a_variant() {
        let config = config(&[
            ("SUBMISSION_POLICY", "optimistic"),
            ("SOURCE_TAG", "borderless-b"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("MAX_PAGE_VIEWS", "500"),
            ("SITE_TITLE", "  "),
        ])
        .unwrap();

        assert_eq!(config.policy, SubmissionPolicy::Optimistic);
        assert_eq!(config.source_tag.as_deref(), Some("borderless-b"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_views, 500);
        assert_eq!(config.site_title, DEFAULT_SITE_TITLE);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("SUBMISSION_POLICY", "eager")]).unwrap_err(),
            ConfigError::InvalidPolicy("eager".to_owned())
        );
        assert_eq!(
            config(&[("FORM_ENDPOINT", "not a url")]).unwrap_err(),
            ConfigError::InvalidEndpoint("not a url".to_owned())
        );
        assert_eq!(
            config(&[("PREVIEW_PATH", "/downloads/doc.pdf")]).unwrap_err(),
            ConfigError::InvalidPreviewPath("/downloads/doc.pdf".to_owned())
        );
        assert_eq!(
            config(&[("VIEW_TTL_SECS", "0")]).unwrap_err(),
            ConfigError::InvalidSeconds("VIEW_TTL_SECS", "0".to_owned())
        );
        assert_eq!(
            config(&[("MAX_PAGE_VIEWS", "lots")]).unwrap_err(),
            ConfigError::InvalidCount("MAX_PAGE_VIEWS", "lots".to_owned())
        );
    }
}
