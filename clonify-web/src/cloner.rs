use std::sync::Arc;

use chrono::{DateTime, Utc};
use clonify_common::{Result, ValidationError};
use serde::Serialize;
use url::Url;

use crate::extract::{ExtractionResult, extract};
use crate::source::PageSource;

/// A fetched page together with what was extracted from it.
#[derive(Debug, Clone, Serialize)]
pub struct ClonedSite {
    pub target: Url,
    pub fetched_at: DateTime<Utc>,
    pub result: ExtractionResult,
}

/// Trim `input` and require an absolute URL.
///
/// ```
/// use clonify_common::ValidationError;
/// use clonify_web::cloner::validate_url;
///
/// assert_eq!(validate_url("  "), Err(ValidationError::Empty));
/// assert!(matches!(validate_url("not a url"), Err(ValidationError::Malformed(_))));
/// assert_eq!(validate_url(" https://example.com ").unwrap().as_str(), "https://example.com/");
/// ```
pub fn validate_url(input: &str) -> std::result::Result<Url, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    Url::parse(trimmed).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Validates the input, fetches through a [`PageSource`] and runs extraction.
#[derive(Clone)]
pub struct Cloner {
    source: Arc<dyn PageSource>,
}

impl Cloner {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    pub async fn clone_site(&self, input: &str) -> Result<ClonedSite> {
        let target = validate_url(input)?;
        tracing::info!(target_url = %target, "clone.start");

        let html = self.source.fetch(&target).await.inspect_err(|e| {
            tracing::warn!(target_url = %target, error = %e, "clone.fetch_failed");
        })?;

        let result = extract(&html);
        tracing::info!(
            target_url = %target,
            html_bytes = html.len(),
            css_bytes = result.css.len(),
            js_bytes = result.js.len(),
            "clone.done"
        );
        Ok(ClonedSite {
            target,
            fetched_at: Utc::now(),
            result,
        })
    }
}
