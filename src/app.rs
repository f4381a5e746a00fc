use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::client::AnalysisTransport;
use crate::pipeline::{Completion, InFlight, SubmissionPipeline, SubmissionStatus};
use crate::profile::ProfileDraft;
use crate::video::VideoFile;
use crate::workflow::{Step, WorkflowController};

pub const FORM_INCOMPLETE_MESSAGE: &str =
    "Fill in every field: age 10-80, height 3-8 ft 0-11 in, weight 50-500 lbs.";

const MAX_TEXT_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Sport,
    SkillLevel,
    Age,
    HeightFeet,
    HeightInches,
    WeightLbs,
    Fatigue,
    InjuryHistory,
}

impl ProfileField {
    pub const ALL: [ProfileField; 8] = [
        ProfileField::Sport,
        ProfileField::SkillLevel,
        ProfileField::Age,
        ProfileField::HeightFeet,
        ProfileField::HeightInches,
        ProfileField::WeightLbs,
        ProfileField::Fatigue,
        ProfileField::InjuryHistory,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Sport => "Sport",
            ProfileField::SkillLevel => "Skill Level",
            ProfileField::Age => "Age",
            ProfileField::HeightFeet => "Height (ft)",
            ProfileField::HeightInches => "Height (in)",
            ProfileField::WeightLbs => "Weight (lbs)",
            ProfileField::Fatigue => "Fatigue Level",
            ProfileField::InjuryHistory => "Injury History",
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            ProfileField::Age | ProfileField::HeightFeet | ProfileField::HeightInches => {
                c.is_ascii_digit()
            }
            ProfileField::WeightLbs => c.is_ascii_digit() || c == '.',
            ProfileField::InjuryHistory => !c.is_control(),
            ProfileField::Sport | ProfileField::SkillLevel | ProfileField::Fatigue => false,
        }
    }
}

/// What the event loop has to do after a key press
#[derive(Debug)]
pub enum Action {
    None,
    Quit,
    /// Drive this request on the async runtime and report back its completion
    Submit(InFlight),
}

#[derive(Debug)]
pub struct App {
    pub workflow: WorkflowController,
    pub pipeline: SubmissionPipeline,
    pub draft: ProfileDraft,
    pub focus: ProfileField,
    pub form_error: Option<String>,
    pub video_path: String,
    pub video: Option<VideoFile>,
    pub video_error: Option<String>,
    pub report_scroll: u16,
    pub analyzed_at: Option<DateTime<Local>>,
    pub spinner: usize,
    view_reset: Arc<AtomicBool>,
}

impl App {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        let view_reset = Arc::new(AtomicBool::new(false));
        let mut workflow = WorkflowController::new();
        let flag = Arc::clone(&view_reset);
        workflow.on_transition(move |_| flag.store(true, Ordering::SeqCst));

        Self {
            workflow,
            pipeline: SubmissionPipeline::new(transport),
            draft: ProfileDraft::default(),
            focus: ProfileField::Sport,
            form_error: None,
            video_path: String::new(),
            video: None,
            video_error: None,
            report_scroll: 0,
            analyzed_at: None,
            spinner: 0,
            view_reset,
        }
    }

    pub fn step(&self) -> Step {
        self.workflow.current_step()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        let action = match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::F(n @ 1..=3) => {
                if let Some(step) = Step::from_index(usize::from(n) - 1) {
                    self.workflow.go_to(step);
                }
                Action::None
            }
            _ => match self.step() {
                Step::Profile => {
                    self.on_profile_key(key);
                    Action::None
                }
                Step::Analyze => self.on_analyze_key(key),
                Step::Results => {
                    self.on_results_key(key);
                    Action::None
                }
            },
        };

        self.apply_view_reset();
        action
    }

    /// Advance the pending spinner. Returns false when there is nothing to redraw.
    pub fn on_tick(&mut self) -> bool {
        if !self.pipeline.is_pending() {
            return false;
        }
        self.spinner = self.spinner.wrapping_add(1);
        true
    }

    /// Feed a finished request back in; advances to RESULTS on success
    pub fn on_completion(&mut self, completion: Completion) {
        if !self.pipeline.complete(completion) {
            return;
        }

        if let SubmissionStatus::Success(result) = self.pipeline.status() {
            if self.workflow.advance_with_result(result.clone()) {
                self.analyzed_at = Some(Local::now());
            } else {
                debug!(step = %self.step(), "result arrived after leaving the analyze step");
            }
        }
        self.apply_view_reset();
    }

    /// Save the form and move to ANALYZE when it is complete.
    ///
    /// A request still in flight was built from the replaced profile and is abandoned.
    pub fn save_profile(&mut self) {
        match self.draft.to_profile() {
            Some(profile) => {
                if self.workflow.advance_with_profile(profile) {
                    self.form_error = None;
                    self.pipeline.abandon();
                    self.analyzed_at = None;
                }
            }
            None => self.form_error = Some(FORM_INCOMPLETE_MESSAGE.to_string()),
        }
    }

    /// Load the typed path and hand video + saved profile to the pipeline
    pub fn submit(&mut self) -> Option<InFlight> {
        if self.pipeline.is_pending() {
            debug!("submit pressed while a request is pending");
            return None;
        }

        self.video_error = None;
        let path = self.video_path.trim();
        self.video = if path.is_empty() {
            None
        } else {
            match VideoFile::from_path(path) {
                Ok(video) => Some(video),
                Err(err) => {
                    info!(%err, "video selection rejected");
                    self.video_error = Some(err.to_string());
                    return None;
                }
            }
        };

        self.pipeline.submit(
            self.video.clone(),
            self.workflow.state().profile().cloned(),
        )
    }

    /// "Analyze another": empty form, no video, back to PROFILE
    pub fn start_over(&mut self) {
        self.workflow.reset();
        self.pipeline.abandon();
        self.draft = ProfileDraft::default();
        self.video_path.clear();
        self.video = None;
        self.analyzed_at = None;
        self.apply_view_reset();
    }

    fn on_profile_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left => match self.focus {
                ProfileField::Sport => self.draft.sport = self.draft.sport.prev(),
                ProfileField::SkillLevel => {
                    self.draft.skill_level = self.draft.skill_level.prev()
                }
                ProfileField::Fatigue => self.draft.lower_fatigue(),
                _ => {}
            },
            KeyCode::Right => match self.focus {
                ProfileField::Sport => self.draft.sport = self.draft.sport.next(),
                ProfileField::SkillLevel => {
                    self.draft.skill_level = self.draft.skill_level.next()
                }
                ProfileField::Fatigue => self.draft.raise_fatigue(),
                _ => {}
            },
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text() {
                    text.pop();
                }
            }
            KeyCode::Enter => self.save_profile(),
            KeyCode::Char(c) if self.focus.accepts(c) => {
                if let Some(text) = self.focused_text() {
                    if text.len() < MAX_TEXT_LEN {
                        text.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn on_analyze_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                if let Some(in_flight) = self.submit() {
                    return Action::Submit(in_flight);
                }
            }
            KeyCode::Backspace => {
                self.video_path.pop();
            }
            KeyCode::Char(c) if !c.is_control() && self.video_path.len() < MAX_TEXT_LEN => {
                self.video_path.push(c)
            }
            _ => {}
        }
        Action::None
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.start_over(),
            KeyCode::Char('e') => {
                self.workflow.go_to(Step::Profile);
            }
            KeyCode::Char('a') => {
                self.workflow.go_to(Step::Analyze);
            }
            KeyCode::Up => self.report_scroll = self.report_scroll.saturating_sub(1),
            KeyCode::Down => self.report_scroll = self.report_scroll.saturating_add(1),
            KeyCode::PageUp => self.report_scroll = self.report_scroll.saturating_sub(10),
            KeyCode::PageDown => self.report_scroll = self.report_scroll.saturating_add(10),
            KeyCode::Home => self.report_scroll = 0,
            _ => {}
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            ProfileField::Age => Some(&mut self.draft.age),
            ProfileField::HeightFeet => Some(&mut self.draft.height_feet),
            ProfileField::HeightInches => Some(&mut self.draft.height_inches),
            ProfileField::WeightLbs => Some(&mut self.draft.weight_lbs),
            ProfileField::InjuryHistory => Some(&mut self.draft.injury_history),
            ProfileField::Sport | ProfileField::SkillLevel | ProfileField::Fatigue => None,
        }
    }

    /// Runs the per-transition view reset requested by the workflow hook
    fn apply_view_reset(&mut self) {
        if self.view_reset.swap(false, Ordering::SeqCst) {
            self.focus = ProfileField::Sport;
            self.report_scroll = 0;
            self.form_error = None;
            self.video_error = None;
        }
    }
}
