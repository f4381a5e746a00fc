//! Video submission: precondition checks, payload building and the
//! single in-flight request.
//!
//! `submit` is synchronous. It flips the pipeline to `Pending` and hands
//! back an [`InFlight`] future for the caller to drive on whatever runtime
//! it owns; the resulting [`Completion`] is fed back through `complete`.
//! A completion whose id is not the current in-flight id is dropped.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::{AnalysisRequest, AnalysisTransport};
use crate::error::AnalysisError;
use crate::profile::Profile;
use crate::video::VideoFile;
use crate::workflow::AnalysisResult;

pub type RequestId = u64;

type AnalysisFuture = Pin<Box<dyn Future<Output = Result<AnalysisResult, AnalysisError>> + Send>>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Success(AnalysisResult),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub id: RequestId,
    pub outcome: Result<AnalysisResult, AnalysisError>,
}

/// The network call of one accepted submission
pub struct InFlight {
    id: RequestId,
    future: AnalysisFuture,
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight").field("id", &self.id).finish()
    }
}

impl InFlight {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub async fn run(self) -> Completion {
        Completion {
            id: self.id,
            outcome: self.future.await,
        }
    }
}

pub struct SubmissionPipeline {
    transport: Arc<dyn AnalysisTransport>,
    status: SubmissionStatus,
    in_flight: Option<RequestId>,
    next_id: RequestId,
}

impl std::fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("status", &self.status)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl SubmissionPipeline {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        Self {
            transport,
            status: SubmissionStatus::Idle,
            in_flight: None,
            next_id: 1,
        }
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a submission.
    ///
    /// Returns `None` when nothing was sent: either a submission is already
    /// pending (ignored, state untouched) or a precondition failed (status
    /// becomes `Failure`).
    pub fn submit(
        &mut self,
        video: Option<VideoFile>,
        profile: Option<Profile>,
    ) -> Option<InFlight> {
        if let Some(id) = self.in_flight {
            debug!(pending = id, "submission ignored, request already in flight");
            return None;
        }

        let Some(video) = video else {
            self.fail(AnalysisError::MissingVideo);
            return None;
        };
        let Some(profile) = profile.filter(Profile::is_complete) else {
            self.fail(AnalysisError::MissingProfile);
            return None;
        };

        let request = AnalysisRequest::new(video, &profile);
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight = Some(id);
        self.status = SubmissionStatus::Pending;
        info!(id, file = %request.video.file_name, "submission started");

        let transport = Arc::clone(&self.transport);
        Some(InFlight {
            id,
            future: Box::pin(async move { transport.analyze(request).await }),
        })
    }

    /// Apply the outcome of the in-flight request. Returns false for stale completions.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if self.in_flight != Some(completion.id) {
            debug!(
                id = completion.id,
                current = ?self.in_flight,
                "dropping completion for a superseded request"
            );
            return false;
        }
        self.in_flight = None;

        match completion.outcome {
            Ok(result) => {
                info!(id = completion.id, "analysis received");
                self.status = SubmissionStatus::Success(result);
            }
            Err(err) => self.fail(err),
        }
        true
    }

    /// Forget the last outcome. No effect while a request is pending.
    pub fn clear(&mut self) {
        if self.in_flight.is_none() {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// Drop the in-flight request, if any, and go back to `Idle`.
    ///
    /// Its completion no longer matches and is discarded by `complete`.
    /// Used when the profile the request was built from is replaced.
    pub fn abandon(&mut self) {
        if let Some(id) = self.in_flight.take() {
            info!(id, "abandoning in-flight submission");
        }
        self.status = SubmissionStatus::Idle;
    }

    fn fail(&mut self, err: AnalysisError) {
        if err.is_local() {
            debug!(%err, "submission rejected locally");
        } else {
            warn!(%err, "submission failed");
        }
        self.status = SubmissionStatus::Failure(err.user_message());
    }
}
