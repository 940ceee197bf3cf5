#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit `input` to the analysis endpoint for `source`.
    SubmitAnalysis {
        source: crate::SourceId,
        input: String,
    },
}
