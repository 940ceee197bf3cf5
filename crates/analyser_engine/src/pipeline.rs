use std::sync::Arc;

use crate::classify::{classify, confidence, ClassifyError};
use crate::decode::decode_fragment;
use crate::fragment::FragmentParser;
use crate::submit::{ProgressSink, Submitter};
use crate::{
    AnalysisError, AnalysisReport, EngineEvent, FailureKind, Stage, SubmitProgress,
};

/// One analysis exchange end-to-end: submit, decode, parse, classify.
pub struct AnalysisPipeline {
    submitter: Arc<dyn Submitter>,
    parser: Arc<dyn FragmentParser>,
    threshold: f64,
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl AnalysisPipeline {
    pub fn new(
        submitter: Arc<dyn Submitter>,
        parser: Arc<dyn FragmentParser>,
        threshold: f64,
    ) -> Result<Self, AnalysisError> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(AnalysisError::new(
                FailureKind::InvalidThreshold,
                format!("threshold {threshold} is not within (0, 1]"),
            ));
        }
        Ok(Self {
            submitter,
            parser,
            threshold,
        })
    }

    pub async fn run(
        &self,
        source: &str,
        input: &str,
        sink: &dyn ProgressSink,
    ) -> Result<AnalysisReport, AnalysisError> {
        let output = self.submitter.submit(source, input, sink).await?;

        sink.emit(progress(source, Stage::Decoding, Some(output.metadata.byte_len)));
        let decoded = decode_fragment(&output.bytes, output.metadata.content_type.as_deref())
            .map_err(|err| AnalysisError::new(FailureKind::Decode, err.to_string()))?;

        sink.emit(progress(source, Stage::Parsing, None));
        let fragment = self.parser.parse(&decoded.html).map_err(|defect| {
            let message = defect.to_string();
            AnalysisError::new(FailureKind::MalformedFragment(defect), message)
        })?;

        // The parser has already bounded the score; these can only fail if a
        // custom parser hands back something out of contract.
        let verdict = classify(fragment.score, self.threshold).map_err(classify_error)?;
        let confidence = confidence(fragment.score, self.threshold).map_err(classify_error)?;

        sink.emit(progress(source, Stage::Done, None));
        Ok(AnalysisReport {
            verdict,
            score: fragment.score,
            confidence,
            display_html: fragment.display_html,
        })
    }
}

fn progress(source: &str, stage: Stage, bytes: Option<u64>) -> EngineEvent {
    EngineEvent::Progress(SubmitProgress {
        source: source.to_string(),
        stage,
        bytes,
    })
}

fn classify_error(err: ClassifyError) -> AnalysisError {
    AnalysisError::new(FailureKind::Classification, err.to_string())
}
