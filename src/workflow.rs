use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::profile::Profile;

/// Opaque `{ coaching, metrics }` payload returned by the analysis service
pub type AnalysisResult = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum_macros::Display)]
pub enum Step {
    #[strum(serialize = "PROFILE")]
    Profile,
    #[strum(serialize = "ANALYZE")]
    Analyze,
    #[strum(serialize = "RESULTS")]
    Results,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Profile, Step::Analyze, Step::Results];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Snapshot of the workflow. Replaced wholesale on every transition.
///
/// Invariants: past `Profile` a profile is present; on `Results` a result is present.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    step: Step,
    profile: Option<Profile>,
    result: Option<AnalysisResult>,
}

impl WorkflowState {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            step: Step::Profile,
            profile: None,
            result: None,
        }
    }
}

type TransitionHook = Box<dyn FnMut(&WorkflowState) + Send>;

/// Three-step state machine: PROFILE -> ANALYZE -> RESULTS.
///
/// Every operation returns whether it applied. Rejected transitions leave
/// the state untouched and never error.
#[derive(Default)]
pub struct WorkflowController {
    state: WorkflowState,
    hooks: Vec<TransitionHook>,
}

impl fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowController")
            .field("state", &self.state)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.step
    }

    /// Register a callback run after every applied transition (scroll/focus reset)
    pub fn on_transition<F>(&mut self, hook: F)
    where
        F: FnMut(&WorkflowState) + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    pub fn advance_with_profile(&mut self, profile: Profile) -> bool {
        if self.state.step != Step::Profile {
            debug!(step = %self.state.step, "ignoring profile save outside the profile step");
            return false;
        }
        if !profile.is_complete() {
            debug!("ignoring incomplete profile");
            return false;
        }

        info!(sport = %profile.sport, skill = %profile.skill_level, "profile saved");
        self.transition(WorkflowState {
            step: Step::Analyze,
            profile: Some(profile),
            result: None,
        });
        true
    }

    pub fn advance_with_result(&mut self, result: AnalysisResult) -> bool {
        if self.state.step != Step::Analyze {
            debug!(step = %self.state.step, "ignoring analysis result outside the analyze step");
            return false;
        }
        if result.is_null() {
            debug!("ignoring empty analysis result");
            return false;
        }

        self.transition(WorkflowState {
            step: Step::Results,
            profile: self.state.profile.clone(),
            result: Some(result),
        });
        true
    }

    /// Move back to (or stay on) an already reached step. Forward jumps are ignored.
    pub fn go_to(&mut self, step: Step) -> bool {
        if step > self.state.step {
            debug!(from = %self.state.step, to = %step, "ignoring forward jump");
            return false;
        }

        self.transition(WorkflowState {
            step,
            profile: self.state.profile.clone(),
            result: self.state.result.clone(),
        });
        true
    }

    /// Back to an empty PROFILE step ("Analyze another")
    pub fn reset(&mut self) {
        self.transition(WorkflowState::default());
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!(from = %self.state.step, to = %next.step, "workflow transition");
        self.state = next;
        for hook in &mut self.hooks {
            hook(&self.state);
        }
    }
}
