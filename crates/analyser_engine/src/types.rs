use std::fmt;

use serde::Serialize;

use crate::fragment::FragmentDefect;

/// Identifier of the UI region a submission belongs to.
pub type SourceId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Submitting,
    Receiving,
    Decoding,
    Parsing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitProgress {
    pub source: SourceId,
    pub stage: Stage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(SubmitProgress),
    AnalysisCompleted {
        source: SourceId,
        result: Result<AnalysisReport, AnalysisError>,
    },
}

/// Typed result of one successful analysis exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub verdict: Verdict,
    /// Prediction score reported by the server, in [0, 1].
    pub score: f64,
    /// Distance from the threshold as a percentage.
    pub confidence: u32,
    /// Sanitized fragment body ready for splicing into the result region.
    pub display_html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Misinformation,
    Neutral,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Misinformation => "Misinformation",
            Verdict::Neutral => "Neutral",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Verdict::Misinformation => Tone::Danger,
            Verdict::Neutral => Tone::Success,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Danger,
    Success,
}

impl Tone {
    /// CSS class the result container is styled with.
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Danger => "alert-danger",
            Tone::Success => "alert-success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutput {
    pub bytes: Vec<u8>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub endpoint: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisError {
    pub kind: FailureKind,
    pub message: String,
}

impl AnalysisError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AnalysisError {}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    InvalidEndpoint,
    Network,
    Timeout,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    MalformedFragment(FragmentDefect),
    Classification,
    InvalidThreshold,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "undecodable response body"),
            FailureKind::MalformedFragment(defect) => write!(f, "malformed fragment: {defect}"),
            FailureKind::Classification => write!(f, "classification error"),
            FailureKind::InvalidThreshold => write!(f, "invalid classification threshold"),
        }
    }
}
