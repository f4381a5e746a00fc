use thiserror::Error;

pub const MISSING_VIDEO_MESSAGE: &str = "Please select a video first.";
pub const MISSING_PROFILE_MESSAGE: &str = "Please complete your profile first.";
pub const FALLBACK_MESSAGE: &str = "Analysis failed. Please try again.";

/// Everything that can end a submission without a report.
///
/// Cloneable so completions can travel through the UI event channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No clip selected; nothing was sent
    #[error("no video selected")]
    MissingVideo,

    /// No saved profile; nothing was sent
    #[error("no profile saved")]
    MissingProfile,

    /// Connection, timeout or body decoding failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx answer from the service
    #[error("server returned {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server { status: u16, detail: Option<String> },
}

impl AnalysisError {
    /// Text shown inline on the analyze screen
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingVideo => MISSING_VIDEO_MESSAGE.to_string(),
            Self::MissingProfile => MISSING_PROFILE_MESSAGE.to_string(),
            Self::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Server { detail: None, .. } | Self::Transport(_) => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::MissingVideo | Self::MissingProfile)
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("unsupported video type: {0} (expected .mp4, .m4v, .mov or .webm)")]
    UnsupportedType(String),

    #[error("video file is empty: {0}")]
    Empty(String),

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid server url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not build http client: {0}")]
    Client(#[from] reqwest::Error),
}
