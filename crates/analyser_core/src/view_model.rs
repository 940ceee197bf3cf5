use crate::{AnalysisOutcome, ControlState, SourceId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub sources: Vec<SourceRegionView>,
    pub page_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRegionView {
    pub id: SourceId,
    pub label: String,
    pub control: ControlView,
    pub input: String,
    pub outcome: Option<AnalysisOutcome>,
    pub failure: Option<String>,
}

/// Render state of one trigger control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub enabled: bool,
    pub label: &'static str,
    pub busy_indicator: bool,
}

impl ControlView {
    pub(crate) fn for_state(control: ControlState) -> Self {
        match control {
            ControlState::Idle => Self {
                enabled: true,
                label: "Analyse",
                busy_indicator: false,
            },
            ControlState::Busy => Self {
                enabled: false,
                label: "Analysing...",
                busy_indicator: true,
            },
        }
    }
}
