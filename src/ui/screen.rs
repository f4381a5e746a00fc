use ratatui::{layout::Rect, Frame};

use crate::{
    app::App,
    ui::{analyze::AnalyzePanel, profile_form::ProfileForm, report::Report},
    workflow::Step,
};

/// A UI Screen boundary: one per workflow step
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
}

pub struct ProfileScreen;

impl Screen for ProfileScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        f.render_widget(ProfileForm::new(app), area);
    }
}

pub struct AnalyzeScreen;

impl Screen for AnalyzeScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        f.render_widget(AnalyzePanel::new(app), area);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        // RESULTS always carries a result; render nothing rather than panic if not
        if let Some(result) = app.workflow.state().result() {
            f.render_widget(Report::new(result, app.analyzed_at, app.report_scroll), area);
        }
    }
}

/// Helper to construct the appropriate screen for the current step
pub fn current_screen(step: Step) -> Box<dyn Screen> {
    match step {
        Step::Profile => Box::new(ProfileScreen),
        Step::Analyze => Box::new(AnalyzeScreen),
        Step::Results => Box::new(ResultsScreen),
    }
}
