use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use analyser_logging::analyser_warn;

use crate::classify::DEFAULT_THRESHOLD;
use crate::fragment::{FragmentSchema, SelectorFragmentParser};
use crate::pipeline::AnalysisPipeline;
use crate::submit::{ChannelProgressSink, ReqwestSubmitter, SubmitSettings};
use crate::{AnalysisError, EndpointTemplate, EngineEvent, SourceId};

enum EngineCommand {
    Submit { source: SourceId, input: String },
}

/// Handle to the background analysis runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        endpoint: EndpointTemplate,
        settings: SubmitSettings,
    ) -> Result<Self, AnalysisError> {
        Self::with_schema(endpoint, settings, FragmentSchema::default(), DEFAULT_THRESHOLD)
    }

    pub fn with_schema(
        endpoint: EndpointTemplate,
        settings: SubmitSettings,
        schema: FragmentSchema,
        threshold: f64,
    ) -> Result<Self, AnalysisError> {
        let min_visible_busy = settings.min_visible_busy;
        let submitter = Arc::new(ReqwestSubmitter::new(endpoint, settings)?);
        let parser = Arc::new(SelectorFragmentParser::new(schema));
        let pipeline = Arc::new(AnalysisPipeline::new(submitter, parser, threshold)?);

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let pipeline = pipeline.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(pipeline.as_ref(), command, min_visible_busy, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, source: impl Into<SourceId>, input: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            source: source.into(),
            input: input.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    pipeline: &AnalysisPipeline,
    command: EngineCommand,
    min_visible_busy: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { source, input } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            // The visibility floor runs alongside the exchange; completion is
            // reported only once both have finished.
            let (result, ()) = tokio::join!(
                pipeline.run(&source, &input, &sink),
                tokio::time::sleep(min_visible_busy),
            );
            if let Err(err) = &result {
                analyser_warn!("analysis for source {source} failed: {err}");
            }
            let _ = event_tx.send(EngineEvent::AnalysisCompleted { source, result });
        }
    }
}
