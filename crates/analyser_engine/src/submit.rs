use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};

use crate::{
    AnalysisError, EndpointTemplate, EngineEvent, FailureKind, ResponseMetadata, Stage,
    SubmitOutput, SubmitProgress,
};

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Shortest duration a control stays visibly busy per submission.
    pub min_visible_busy: Duration,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            min_visible_busy: Duration::from_secs(1),
            max_bytes: 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        source: &str,
        input: &str,
        sink: &dyn ProgressSink,
    ) -> Result<SubmitOutput, AnalysisError>;
}

/// Form-encoded POST submitter over reqwest.
///
/// The client is built once so the cookie store carries the login session
/// across submissions.
#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    endpoint: EndpointTemplate,
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(
        endpoint: EndpointTemplate,
        settings: SubmitSettings,
    ) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| AnalysisError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            endpoint,
            settings,
            client,
        })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        source: &str,
        input: &str,
        sink: &dyn ProgressSink,
    ) -> Result<SubmitOutput, AnalysisError> {
        let endpoint = self.endpoint.resolve(source)?;

        sink.emit(EngineEvent::Progress(SubmitProgress {
            source: source.to_string(),
            stage: Stage::Submitting,
            bytes: None,
        }));

        let response = self
            .client
            .post(endpoint.clone())
            .header(CACHE_CONTROL, "no-cache")
            .form(&[(self.endpoint.field(), input)])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(AnalysisError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(AnalysisError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(AnalysisError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
            sink.emit(EngineEvent::Progress(SubmitProgress {
                source: source.to_string(),
                stage: Stage::Receiving,
                bytes: Some(bytes.len() as u64),
            }));
        }

        let metadata = ResponseMetadata {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(SubmitOutput { bytes, metadata })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() {
        return AnalysisError::new(FailureKind::Timeout, err.to_string());
    }
    AnalysisError::new(FailureKind::Network, err.to_string())
}
