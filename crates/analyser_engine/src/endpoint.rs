use url::Url;

use crate::{AnalysisError, FailureKind};

/// Placeholder substituted with the source identifier at resolution time.
pub const SOURCE_PLACEHOLDER: &str = "{source}";

/// Where and how a submission goes out on the wire: origin, path template,
/// and the name of the form field carrying the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    origin: Url,
    path_template: String,
    field: String,
}

impl EndpointTemplate {
    pub fn new(origin: Url, path_template: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            origin,
            path_template: path_template.into(),
            field: field.into(),
        }
    }

    /// Per-source analyser endpoint of the comment service.
    pub fn analyse_comments(origin: Url) -> Self {
        Self::new(origin, "analyse_comments/{source}", "input")
    }

    /// Fixed single-comment endpoint variant.
    pub fn classify(origin: Url) -> Self {
        Self::new(origin, "classify", "comment")
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Substitute the source identifier into the template and join it against
    /// the origin. Sources that are not plain path segments are rejected so a
    /// crafted identifier cannot redirect the request.
    pub fn resolve(&self, source: &str) -> Result<Url, AnalysisError> {
        if self.path_template.contains(SOURCE_PLACEHOLDER) && !is_plain_segment(source) {
            return Err(AnalysisError::new(
                FailureKind::InvalidEndpoint,
                format!("source {source:?} is not a valid path segment"),
            ));
        }
        let path = self.path_template.replace(SOURCE_PLACEHOLDER, source);
        self.origin
            .join(&path)
            .map_err(|err| AnalysisError::new(FailureKind::InvalidEndpoint, err.to_string()))
    }
}

fn is_plain_segment(source: &str) -> bool {
    !source.is_empty()
        && source
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
