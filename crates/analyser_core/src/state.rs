use crate::view_model::{AppViewModel, ControlView, SourceRegionView};

/// Identifier of one analyser region, e.g. `manually_entered`.
pub type SourceId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Busy,
}

/// Binary outcome of classifying a prediction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// Visual styling associated with a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// Applied result of one completed analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub verdict: Verdict,
    /// Prediction score reported by the server, in [0, 1].
    pub score: f64,
    /// Confidence percentage derived from the score's distance to the threshold.
    pub confidence: u32,
    /// Sanitized fragment body ready for splicing into the result region.
    pub display_html: String,
}

/// User-visible notice for a failed analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub summary: String,
}

/// Configuration of one analyser region, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub id: SourceId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
struct SourceRegion {
    spec: SourceSpec,
    control: ControlState,
    input: String,
    outcome: Option<AnalysisOutcome>,
    failure: Option<FailureNotice>,
}

impl SourceRegion {
    fn new(spec: SourceSpec) -> Self {
        Self {
            spec,
            control: ControlState::Idle,
            input: String::new(),
            outcome: None,
            failure: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    regions: Vec<SourceRegion>,
    page_error: Option<String>,
    dirty: bool,
}

/// Result of attempting to start an analysis for a region.
pub(crate) enum BeginAnalysis {
    Started { input: String },
    AlreadyBusy,
    UnknownSource,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a state with one region per configured source.
    /// The region set never changes afterwards.
    pub fn with_sources<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = SourceSpec>,
    {
        Self {
            regions: specs.into_iter().map(SourceRegion::new).collect(),
            page_error: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            sources: self
                .regions
                .iter()
                .map(|region| SourceRegionView {
                    id: region.spec.id.clone(),
                    label: region.spec.label.clone(),
                    control: ControlView::for_state(region.control),
                    input: region.input.clone(),
                    outcome: region.outcome.clone(),
                    failure: region.failure.as_ref().map(|f| f.summary.clone()),
                })
                .collect(),
            page_error: self.page_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, source: &str, text: String) -> bool {
        let Some(region) = self.region_mut(source) else {
            return false;
        };
        region.input = text;
        self.dirty = true;
        true
    }

    /// Idle regions transition to busy and hand back the input to submit.
    /// A busy region rejects the trigger outright.
    pub(crate) fn begin_analysis(&mut self, source: &str) -> BeginAnalysis {
        let Some(region) = self.region_mut(source) else {
            return BeginAnalysis::UnknownSource;
        };
        if region.control == ControlState::Busy {
            return BeginAnalysis::AlreadyBusy;
        }
        region.control = ControlState::Busy;
        region.failure = None;
        let input = region.input.clone();
        self.dirty = true;
        BeginAnalysis::Started { input }
    }

    /// The busy region always returns to idle here, success or failure.
    /// A failure leaves the previously applied outcome untouched.
    pub(crate) fn finish_analysis(
        &mut self,
        source: &str,
        result: Result<AnalysisOutcome, FailureNotice>,
    ) -> bool {
        let Some(region) = self.region_mut(source) else {
            return false;
        };
        region.control = ControlState::Idle;
        match result {
            Ok(outcome) => {
                region.outcome = Some(outcome);
                region.failure = None;
            }
            Err(notice) => {
                region.failure = Some(notice);
            }
        }
        self.dirty = true;
        true
    }

    pub(crate) fn note_unknown_source(&mut self, source: &str) {
        self.page_error = Some(format!("no analyser region named {source:?}"));
        self.dirty = true;
    }

    fn region_mut(&mut self, source: &str) -> Option<&mut SourceRegion> {
        self.regions
            .iter_mut()
            .find(|region| region.spec.id == source)
    }
}
