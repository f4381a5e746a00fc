use std::fs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use redwings::app::{Action, App};
use redwings::client::{AnalysisRequest, AnalysisTransport};
use redwings::error::AnalysisError;
use redwings::pipeline::SubmissionStatus;
use redwings::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use redwings::workflow::{AnalysisResult, Step};

/// Answers after a short delay so the loop sees ticks while pending
struct SlowTransport {
    delay: Duration,
    outcome: Result<AnalysisResult, AnalysisError>,
}

#[async_trait]
impl AnalysisTransport for SlowTransport {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        assert_eq!(request.injury_history, "None");
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn typed(s: &str) -> Vec<AppEvent> {
    s.chars().map(|c| key(KeyCode::Char(c))).collect()
}

/// Profile form keystrokes: focus starts on Sport
fn profile_keys() -> Vec<AppEvent> {
    let mut keys = vec![key(KeyCode::Right), key(KeyCode::Tab), key(KeyCode::Tab)];
    keys.extend(typed("24"));
    keys.push(key(KeyCode::Tab));
    keys.extend(typed("5"));
    keys.push(key(KeyCode::Tab));
    keys.extend(typed("10"));
    keys.push(key(KeyCode::Tab));
    keys.extend(typed("160"));
    keys.push(key(KeyCode::Enter));
    keys
}

/// Drive a tiny event loop the way main does, until `done` or bounded steps
fn drive(
    app: &mut App,
    runner: &Runner<TestEventSource, FixedTicker>,
    rt: &tokio::runtime::Runtime,
    done: impl Fn(&App) -> bool,
) -> usize {
    let mut ticks_while_pending = 0;
    for _ in 0..2000u32 {
        match runner.step() {
            AppEvent::Key(k) => {
                if let Action::Submit(in_flight) = app.on_key(k) {
                    let tx = runner.sender();
                    rt.spawn(async move {
                        let _ = tx.send(AppEvent::Submission(in_flight.run().await));
                    });
                }
            }
            AppEvent::Tick => {
                if app.on_tick() {
                    ticks_while_pending += 1;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Submission(c) => app.on_completion(c),
        }
        if done(app) {
            break;
        }
    }
    ticks_while_pending
}

#[test]
fn headless_profile_to_results() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("halfpipe.mov");
    fs::write(&clip, b"moov").unwrap();

    let report = json!({"coaching": {"overall_assessment": "Nice"}, "metrics": {}});
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut app = App::new(Arc::new(SlowTransport {
        delay: Duration::from_millis(50),
        outcome: Ok(report.clone()),
    }));

    let runner = Runner::new(
        TestEventSource::new(),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let tx = runner.sender();
    for ev in profile_keys() {
        tx.send(ev).unwrap();
    }
    for ev in typed(clip.to_str().unwrap()) {
        tx.send(ev).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    // a second Enter while pending must not start another request
    tx.send(key(KeyCode::Enter)).unwrap();

    let ticks = drive(&mut app, &runner, &rt, |app| app.step() == Step::Results);

    assert_eq!(app.step(), Step::Results);
    assert!(ticks > 0, "spinner should tick while the request is pending");
    assert_eq!(app.workflow.state().result(), Some(&report));
    let profile = app.workflow.state().profile().unwrap();
    assert_eq!(profile.age, 24);
    assert_eq!(profile.sport.to_string(), "Skateboarding");
    assert_eq!(app.video.as_ref().unwrap().mime_type, "video/quicktime");
}

#[test]
fn headless_failure_keeps_analyze_and_allows_retry() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("run.webm");
    fs::write(&clip, b"webm").unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut app = App::new(Arc::new(SlowTransport {
        delay: Duration::from_millis(10),
        outcome: Err(AnalysisError::Server {
            status: 500,
            detail: None,
        }),
    }));

    let runner = Runner::new(
        TestEventSource::new(),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let tx = runner.sender();

    // submit with no video first
    for ev in profile_keys() {
        tx.send(ev).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    drive(&mut app, &runner, &rt, |app| {
        matches!(app.pipeline.status(), SubmissionStatus::Failure(_))
    });
    assert_eq!(
        app.pipeline.status(),
        &SubmissionStatus::Failure("Please select a video first.".into())
    );

    for ev in typed(clip.to_str().unwrap()) {
        tx.send(ev).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    drive(&mut app, &runner, &rt, |app| {
        app.pipeline.status()
            == &SubmissionStatus::Failure("Analysis failed. Please try again.".into())
    });

    assert_eq!(app.step(), Step::Analyze);
    assert!(!app.pipeline.is_pending());
    assert_eq!(
        app.pipeline.status(),
        &SubmissionStatus::Failure("Analysis failed. Please try again.".into())
    );
}

#[test]
fn headless_late_result_after_leaving_analyze_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("run.mp4");
    fs::write(&clip, b"mp4").unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut app = App::new(Arc::new(SlowTransport {
        delay: Duration::from_millis(30),
        outcome: Ok(json!({"coaching": {}, "metrics": {}})),
    }));

    let runner = Runner::new(
        TestEventSource::new(),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let tx = runner.sender();
    for ev in profile_keys() {
        tx.send(ev).unwrap();
    }
    for ev in typed(clip.to_str().unwrap()) {
        tx.send(ev).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    // back to the profile while the request is in flight
    tx.send(key(KeyCode::F(1))).unwrap();

    drive(&mut app, &runner, &rt, |app| {
        matches!(app.pipeline.status(), SubmissionStatus::Success(_))
    });

    assert_eq!(app.step(), Step::Profile);
    assert!(app.workflow.state().result().is_none());
}

/// Echoes the submitted age back so a report can be traced to its profile
struct EchoAgeTransport {
    delay: Duration,
}

#[async_trait]
impl AnalysisTransport for EchoAgeTransport {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        tokio::time::sleep(self.delay).await;
        Ok(json!({"coaching": {"for_age": request.age}, "metrics": {}}))
    }
}

#[test]
fn headless_resaved_profile_never_gets_the_old_report() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("run.mp4");
    fs::write(&clip, b"mp4").unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut app = App::new(Arc::new(EchoAgeTransport {
        delay: Duration::from_millis(40),
    }));

    let runner = Runner::new(
        TestEventSource::new(),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let tx = runner.sender();
    for ev in profile_keys() {
        tx.send(ev).unwrap();
    }
    for ev in typed(clip.to_str().unwrap()) {
        tx.send(ev).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();

    // back to the form while age 24 is being analyzed, change the age, save
    tx.send(key(KeyCode::F(1))).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Backspace)).unwrap();
    tx.send(key(KeyCode::Backspace)).unwrap();
    for ev in typed("55") {
        tx.send(ev).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();

    drive(&mut app, &runner, &rt, |app| {
        app.workflow.state().profile().map(|p| p.age) == Some(55)
    });
    assert_eq!(app.step(), Step::Analyze);
    assert!(!app.pipeline.is_pending());

    // let the abandoned request finish; its completion must be dropped
    std::thread::sleep(Duration::from_millis(100));
    match runner.step() {
        AppEvent::Submission(c) => app.on_completion(c),
        other => panic!("expected the abandoned completion, got {:?}", other),
    }
    assert_eq!(app.step(), Step::Analyze);
    assert!(app.workflow.state().result().is_none());
    assert_eq!(app.pipeline.status(), &SubmissionStatus::Idle);

    // a fresh submit for the new profile goes through
    tx.send(key(KeyCode::Enter)).unwrap();
    drive(&mut app, &runner, &rt, |app| app.step() == Step::Results);
    assert_eq!(app.step(), Step::Results);
    assert_eq!(
        app.workflow.state().result(),
        Some(&json!({"coaching": {"for_age": 55}, "metrics": {}}))
    );
}
