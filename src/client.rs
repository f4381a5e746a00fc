//! HTTP side of the analysis service contract.
//!
//! `POST /api/analyze` takes a multipart body (the clip plus the profile in
//! metric units) and answers `{ coaching, metrics }`. Failures carry an
//! optional `detail` string in a JSON body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::profile::Profile;
use crate::units::{feet_inches_to_cm, lbs_to_kg};
use crate::video::VideoFile;
use crate::workflow::AnalysisResult;

const USER_AGENT: &str = concat!("redwings/", env!("CARGO_PKG_VERSION"));
const ANALYZE_ROUTE: &str = "analyze";
const HEALTH_ROUTE: &str = "hello";

/// One analysis request, already normalized to the units the service expects
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub video: VideoFile,
    pub sport: String,
    pub skill_level: String,
    pub age: u8,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub fatigue_level: u8,
    pub injury_history: String,
}

impl AnalysisRequest {
    pub fn new(video: VideoFile, profile: &Profile) -> Self {
        Self {
            video,
            sport: profile.sport.to_string(),
            skill_level: profile.skill_level.to_string(),
            age: profile.age,
            height_cm: feet_inches_to_cm(profile.height_feet, profile.height_inches),
            weight_kg: lbs_to_kg(profile.weight_lbs),
            fatigue_level: profile.fatigue_level,
            injury_history: profile.injury_history_or_default().to_string(),
        }
    }

    /// Text parts of the multipart body, in wire order after `video`
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sport", self.sport.clone()),
            ("skill_level", self.skill_level.clone()),
            ("age", self.age.to_string()),
            ("height_cm", self.height_cm.to_string()),
            ("weight_kg", self.weight_kg.to_string()),
            ("fatigue_level", self.fatigue_level.to_string()),
            ("injury_history", self.injury_history.clone()),
        ]
    }

    fn into_form(self) -> Result<Form, AnalysisError> {
        let fields = self.form_fields();
        let video = Part::bytes(self.video.bytes)
            .file_name(self.video.file_name)
            .mime_str(self.video.mime_type)?;

        Ok(fields
            .into_iter()
            .fold(Form::new().part("video", video), |form, (name, value)| {
                form.text(name, value)
            }))
    }
}

/// Seam between the submission pipeline and the network
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.validated_server_url()?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/api/{}", self.base_url, route.trim_start_matches('/'))
    }

    /// Generic `GET /api/{route}?params` returning the decoded JSON body
    pub async fn get_json(
        &self,
        route: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, AnalysisError> {
        let url = self.endpoint(route);
        debug!(%url, ?params, "GET");

        let response = self.client.get(&url).query(params).send().await?;
        read_json(response).await
    }

    /// Liveness probe; returns the service's greeting
    pub async fn health(&self) -> Result<String, AnalysisError> {
        let body = self.get_json(HEALTH_ROUTE, &[]).await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("ok")
            .to_string())
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let url = self.endpoint(ANALYZE_ROUTE);
        info!(
            %url,
            file = %request.video.file_name,
            size_mb = request.video.size_mb(),
            sport = %request.sport,
            "submitting video for analysis"
        );

        let form = request.into_form()?;
        let response = self.client.post(&url).multipart(form).send().await?;
        read_json(response).await
    }
}

async fn read_json(response: Response) -> Result<Value, AnalysisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Value>().await?);
    }

    // error bodies are best effort: plain text or empty bodies just lose the detail
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .as_ref()
        .and_then(error_detail);
    warn!(status = status.as_u16(), ?detail, "analysis service returned an error");

    Err(AnalysisError::Server {
        status: status.as_u16(),
        detail,
    })
}

fn error_detail(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
