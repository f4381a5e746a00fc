// Drives HttpTransport and the submission pipeline against a mock analysis
// service to pin down the wire contract of POST /api/analyze.

use std::sync::Arc;

use anyhow::Result;
use redwings::client::{AnalysisRequest, AnalysisTransport, HttpTransport};
use redwings::config::ClientConfig;
use redwings::error::AnalysisError;
use redwings::pipeline::{SubmissionPipeline, SubmissionStatus};
use redwings::profile::{Profile, SkillLevel, Sport};
use redwings::video::VideoFile;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile() -> Profile {
    Profile {
        sport: Sport::RockClimbing,
        skill_level: SkillLevel::Advanced,
        age: 29,
        height_feet: 5,
        height_inches: 10,
        weight_lbs: 160.0,
        fatigue_level: 4,
        injury_history: String::new(),
    }
}

fn video() -> VideoFile {
    VideoFile::new("run.mp4", b"not really an mp4".to_vec()).unwrap()
}

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(&ClientConfig {
        server_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn report() -> serde_json::Value {
    json!({
        "coaching": {
            "overall_assessment": "Solid footwork.",
            "form_corrections": ["Hips closer to the wall"],
            "safety_warnings": [],
            "drills": ["Silent feet"],
            "conditioning": "Finger strength."
        },
        "metrics": {"knee_angle_avg": 121.7, "hip_angle_avg": 140.2}
    })
}

#[tokio::test]
async fn test_analyze_sends_multipart_profile_and_video() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = transport(&mock_server)
        .analyze(AnalysisRequest::new(video(), &profile()))
        .await;
    assert_eq!(result, Ok(report()));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);

    assert!(body.contains(r#"name="video"; filename="run.mp4""#));
    assert!(body.contains("video/mp4"));
    assert!(body.contains("not really an mp4"));
    for field in [
        "sport",
        "skill_level",
        "age",
        "height_cm",
        "weight_kg",
        "fatigue_level",
        "injury_history",
    ] {
        assert!(
            body.contains(&format!(r#"name="{}""#, field)),
            "missing form field {}",
            field
        );
    }
    assert!(body.contains("Rock Climbing"));
    assert!(body.contains("Advanced"));
    // empty injury history goes out as the sentinel
    assert!(body.contains("\r\n\r\nNone\r\n"));
    // video is the first part
    let video_at = body.find(r#"name="video""#).unwrap();
    let sport_at = body.find(r#"name="sport""#).unwrap();
    assert!(video_at < sport_at);

    Ok(())
}

#[tokio::test]
async fn test_server_detail_is_surfaced() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Uploaded file must be a video"})),
        )
        .mount(&mock_server)
        .await;

    let result = transport(&mock_server)
        .analyze(AnalysisRequest::new(video(), &profile()))
        .await;
    assert_eq!(
        result,
        Err(AnalysisError::Server {
            status: 400,
            detail: Some("Uploaded file must be a video".into())
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_server_error_without_detail_uses_fallback() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let mut pipeline = SubmissionPipeline::new(Arc::new(transport(&mock_server)));
    let in_flight = pipeline.submit(Some(video()), Some(profile())).unwrap();
    assert_eq!(pipeline.status(), &SubmissionStatus::Pending);

    assert!(pipeline.complete(in_flight.run().await));
    assert_eq!(
        pipeline.status(),
        &SubmissionStatus::Failure("Analysis failed. Please try again.".into())
    );

    Ok(())
}

#[tokio::test]
async fn test_pipeline_success_passes_payload_through() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut pipeline = SubmissionPipeline::new(Arc::new(transport(&mock_server)));
    let in_flight = pipeline.submit(Some(video()), Some(profile())).unwrap();

    // second submit while pending never reaches the server
    assert!(pipeline.submit(Some(video()), Some(profile())).is_none());

    assert!(pipeline.complete(in_flight.run().await));
    assert_eq!(pipeline.status(), &SubmissionStatus::Success(report()));

    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() -> Result<()> {
    let transport = HttpTransport::new(&ClientConfig {
        server_url: "http://127.0.0.1:9".into(),
        timeout_secs: 2,
    })?;

    let err = transport
        .analyze(AnalysisRequest::new(video(), &profile()))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
    assert_eq!(err.user_message(), "Analysis failed. Please try again.");

    Ok(())
}

#[tokio::test]
async fn test_get_json_and_health() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/hello"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Hello from FastAPI"})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/random"))
        .and(query_param("max", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 7})))
        .mount(&mock_server)
        .await;

    let transport = transport(&mock_server);
    assert_eq!(transport.health().await?, "Hello from FastAPI");
    assert_eq!(
        transport.get_json("random", &[("max", "10")]).await?,
        json!({"value": 7})
    );

    Ok(())
}
