//! Terminal front-end for the comment analyser service.
//!
//! Wires the pure interaction state machine to the background engine: one
//! trigger per run, effects out to the engine, events back in as messages.

mod logging;
mod render;

use std::time::{Duration, Instant};

use analyser_core::{
    update, AnalysisOutcome, AppState, Effect, FailureNotice, Msg, SourceSpec, Verdict,
};
use analyser_engine::{
    AnalysisError, AnalysisReport, EndpointTemplate, EngineEvent, EngineHandle, SubmitSettings,
};
use analyser_logging::analyser_debug;
use anyhow::{anyhow, bail, Context};
use url::Url;

const USAGE: &str = "usage: analyser_app [--json] [--classify] --server <origin> \
                     [--source <manually_entered|youtube_video>] <input text>";

struct Options {
    server: Url,
    source: String,
    input: String,
    json: bool,
    fixed_classify: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut server = None;
        let mut source = None;
        let mut input: Option<String> = None;
        let mut json = false;
        let mut fixed_classify = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--classify" => fixed_classify = true,
                "--server" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--server needs a value\n{USAGE}"))?;
                    server = Some(Url::parse(&value).context("parsing --server origin")?);
                }
                "--source" => {
                    source = Some(
                        args.next()
                            .ok_or_else(|| anyhow!("--source needs a value\n{USAGE}"))?,
                    );
                }
                other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
                other => {
                    input = Some(match input {
                        None => other.to_string(),
                        Some(existing) => format!("{existing} {other}"),
                    });
                }
            }
        }

        Ok(Self {
            server: server.ok_or_else(|| anyhow!("--server is required\n{USAGE}"))?,
            source: source.unwrap_or_else(|| "manually_entered".to_string()),
            // Empty input is submitted as-is; validation belongs to the server.
            input: input.unwrap_or_default(),
            json,
            fixed_classify,
        })
    }
}

fn known_sources() -> [SourceSpec; 2] {
    [
        SourceSpec {
            id: "manually_entered".to_string(),
            label: "Comment".to_string(),
        },
        SourceSpec {
            id: "youtube_video".to_string(),
            label: "YouTube video".to_string(),
        },
    ]
}

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Both);
    let options = Options::parse(std::env::args().skip(1))?;

    let endpoint = if options.fixed_classify {
        EndpointTemplate::classify(options.server.clone())
    } else {
        EndpointTemplate::analyse_comments(options.server.clone())
    };
    let engine = EngineHandle::new(endpoint, SubmitSettings::default())
        .context("starting analysis engine")?;

    let mut state = AppState::with_sources(known_sources());

    let (next, _effects) = update(
        state,
        Msg::InputChanged {
            source: options.source.clone(),
            text: options.input.clone(),
        },
    );
    let (next, effects) = update(
        next,
        Msg::AnalyseClicked {
            source: options.source.clone(),
        },
    );
    state = next;

    if let Some(error) = state.view().page_error {
        bail!(error);
    }
    for effect in effects {
        match effect {
            Effect::SubmitAnalysis { source, input } => engine.submit(source, input),
        }
    }

    let raw_result = drive_to_completion(&mut state, &engine, Duration::from_secs(60))?;
    let completed_at = chrono::Local::now();

    let view = state.view();
    let region = render::region(&view, &options.source)
        .ok_or_else(|| anyhow!("no analyser region named {:?}", options.source))?;

    if options.json {
        match &raw_result {
            Ok(report) => println!("{}", serde_json::to_string_pretty(report)?),
            Err(err) => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "error": err.to_string(),
                }))?
            ),
        }
    } else {
        render::print_region(region, completed_at);
    }

    if let Some(failure) = &region.failure {
        bail!("analysis failed: {failure}");
    }
    Ok(())
}

/// Drain engine events into the state machine until the submission completes.
fn drive_to_completion(
    state: &mut AppState,
    engine: &EngineHandle,
    timeout: Duration,
) -> anyhow::Result<Result<AnalysisReport, AnalysisError>> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        while let Some(event) = engine.try_recv() {
            match event {
                EngineEvent::Progress(progress) => {
                    analyser_debug!(
                        "source {}: stage {:?}, bytes {:?}",
                        progress.source,
                        progress.stage,
                        progress.bytes
                    );
                }
                EngineEvent::AnalysisCompleted { source, result } => {
                    let msg = Msg::AnalysisCompleted {
                        source,
                        result: result
                            .clone()
                            .map(outcome_from_report)
                            .map_err(notice_from_error),
                    };
                    let (next, _effects) = update(std::mem::take(state), msg);
                    *state = next;
                    return Ok(result);
                }
            }
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    bail!("timed out waiting for the analysis to complete")
}

fn outcome_from_report(report: AnalysisReport) -> AnalysisOutcome {
    AnalysisOutcome {
        verdict: match report.verdict {
            analyser_engine::Verdict::Misinformation => Verdict::Misinformation,
            analyser_engine::Verdict::Neutral => Verdict::Neutral,
        },
        score: report.score,
        confidence: report.confidence,
        display_html: report.display_html,
    }
}

fn notice_from_error(err: AnalysisError) -> FailureNotice {
    FailureNotice {
        summary: err.to_string(),
    }
}
