use crate::state::BeginAnalysis;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged { source, text } => {
            if !state.set_input(&source, text) {
                state.note_unknown_source(&source);
            }
            Vec::new()
        }
        Msg::AnalyseClicked { source } => match state.begin_analysis(&source) {
            BeginAnalysis::Started { input } => {
                vec![Effect::SubmitAnalysis { source, input }]
            }
            // Disabled controls are best effort only; the state machine is
            // the authoritative re-entrancy guard.
            BeginAnalysis::AlreadyBusy => Vec::new(),
            BeginAnalysis::UnknownSource => {
                state.note_unknown_source(&source);
                Vec::new()
            }
        },
        Msg::AnalysisCompleted { source, result } => {
            if !state.finish_analysis(&source, result) {
                state.note_unknown_source(&source);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
