//! Analyser engine: endpoint resolution, form submission, fragment parsing,
//! and the background runtime driving them.
mod classify;
mod decode;
mod endpoint;
mod engine;
mod fragment;
mod pipeline;
mod submit;
mod types;

pub use classify::{classify, confidence, ClassifyError, DEFAULT_THRESHOLD};
pub use decode::{decode_fragment, DecodeError, DecodedFragment};
pub use endpoint::{EndpointTemplate, SOURCE_PLACEHOLDER};
pub use engine::EngineHandle;
pub use fragment::{
    FragmentDefect, FragmentParser, FragmentSchema, ParsedFragment, SelectorFragmentParser,
};
pub use pipeline::AnalysisPipeline;
pub use submit::{ChannelProgressSink, ProgressSink, ReqwestSubmitter, SubmitSettings, Submitter};
pub use types::{
    AnalysisError, AnalysisReport, EngineEvent, FailureKind, ResponseMetadata, SourceId, Stage,
    SubmitOutput, SubmitProgress, Tone, Verdict,
};
