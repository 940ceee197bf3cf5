use std::time::{Duration, Instant};

use analyser_engine::{
    AnalysisError, AnalysisReport, EndpointTemplate, EngineEvent, EngineHandle, FailureKind,
    SourceId, SubmitSettings, Verdict,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRAGMENT: &str = concat!(
    "<html><body><div id=\"result\" class=\"alert\">",
    "<h3 id=\"resultHeading\">0.82</h3>",
    "<p>Comment: This is fake news</p>",
    "</div></body></html>",
);

fn settings_with_floor(floor: Duration) -> SubmitSettings {
    SubmitSettings {
        min_visible_busy: floor,
        ..SubmitSettings::default()
    }
}

async fn wait_for_completion(
    engine: &EngineHandle,
    timeout: Duration,
) -> Option<(SourceId, Result<AnalysisReport, AnalysisError>)> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(EngineEvent::AnalysisCompleted { source, result }) = engine.try_recv() {
            return Some((source, result));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_completion_no_earlier_than_the_floor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyse_comments/manually_entered"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(FRAGMENT, "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let floor = Duration::from_millis(250);
    let engine = EngineHandle::new(
        EndpointTemplate::analyse_comments(Url::parse(&server.uri()).unwrap()),
        settings_with_floor(floor),
    )
    .expect("engine");

    let started = Instant::now();
    engine.submit("manually_entered", "This is fake news");

    let (source, result) = wait_for_completion(&engine, Duration::from_secs(5))
        .await
        .expect("completion event");

    // The response arrives near-instantly; the floor alone gates completion.
    assert!(started.elapsed() >= floor);
    assert_eq!(source, "manually_entered");
    let report = result.expect("report");
    assert_eq!(report.verdict, Verdict::Misinformation);
    assert_eq!(report.confidence, 64);
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_failure_and_still_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyse_comments/manually_entered"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let floor = Duration::from_millis(100);
    let engine = EngineHandle::new(
        EndpointTemplate::analyse_comments(Url::parse(&server.uri()).unwrap()),
        settings_with_floor(floor),
    )
    .expect("engine");

    let started = Instant::now();
    engine.submit("manually_entered", "anything");

    let (_source, result) = wait_for_completion(&engine, Duration::from_secs(5))
        .await
        .expect("completion event");

    // Failures clear the busy control exactly like successes do.
    assert!(started.elapsed() >= floor);
    assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_handles_submissions_for_both_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyse_comments/manually_entered"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(FRAGMENT, "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyse_comments/youtube_video"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(
        EndpointTemplate::analyse_comments(Url::parse(&server.uri()).unwrap()),
        settings_with_floor(Duration::from_millis(50)),
    )
    .expect("engine");

    engine.submit("manually_entered", "This is fake news");
    engine.submit("youtube_video", "dQw4w9WgXcQ");

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let (source, result) = wait_for_completion(&engine, Duration::from_secs(5))
            .await
            .expect("completion event");
        outcomes.push((source, result.is_ok()));
    }
    outcomes.sort();

    assert_eq!(
        outcomes,
        vec![
            ("manually_entered".to_string(), true),
            ("youtube_video".to_string(), false),
        ]
    );
}
