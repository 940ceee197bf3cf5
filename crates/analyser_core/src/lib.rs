//! Analyser core: pure interaction state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AnalysisOutcome, AppState, ControlState, FailureNotice, SourceId, SourceSpec, Tone, Verdict,
};
pub use update::update;
pub use view_model::{AppViewModel, ControlView, SourceRegionView};
