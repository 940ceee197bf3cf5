use crate::{AnalysisOutcome, FailureNotice, SourceId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the input box of an analyser region.
    InputChanged { source: SourceId, text: String },
    /// User triggered analysis for a region.
    AnalyseClicked { source: SourceId },
    /// Engine completion for a region, success or failure.
    AnalysisCompleted {
        source: SourceId,
        result: Result<AnalysisOutcome, FailureNotice>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
