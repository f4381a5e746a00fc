use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::App,
    pipeline::SubmissionStatus,
    profile::Profile,
    ui::ACCENT,
    units::{feet_inches_to_cm, lbs_to_kg},
    video::VideoFile,
};

const SPINNER: [&str; 4] = [".    ", ". .  ", ". . .", "     "];

pub struct AnalyzePanel<'a> {
    profile: Option<&'a Profile>,
    video_path: &'a str,
    video: Option<&'a VideoFile>,
    video_error: Option<&'a str>,
    status: &'a SubmissionStatus,
    spinner: usize,
}

impl<'a> AnalyzePanel<'a> {
    pub fn new(app: &'a App) -> Self {
        Self {
            profile: app.workflow.state().profile(),
            video_path: &app.video_path,
            video: app.video.as_ref(),
            video_error: app.video_error.as_deref(),
            status: app.pipeline.status(),
            spinner: app.spinner,
        }
    }

    fn summary(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::Gray);
        match self.profile {
            Some(p) => Line::from(vec![
                Span::styled(p.sport.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!(
                        " · {} · {} yrs · {:.1} cm · {:.1} kg · fatigue {}/10",
                        p.skill_level,
                        p.age,
                        feet_inches_to_cm(p.height_feet, p.height_inches),
                        lbs_to_kg(p.weight_lbs),
                        p.fatigue_level,
                    ),
                    dim,
                ),
            ]),
            None => Line::from(Span::styled(
                "No profile saved yet. Press F1 to fill it in.",
                Style::default().fg(Color::Yellow),
            )),
        }
    }

    fn status_line(&self) -> Line<'static> {
        match self.status {
            SubmissionStatus::Idle => Line::from(Span::styled(
                "Enter the path of an .mp4, .m4v, .mov or .webm clip and press enter.",
                Style::default().fg(Color::DarkGray),
            )),
            SubmissionStatus::Pending => Line::from(vec![
                Span::styled(
                    "Working on it ",
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    SPINNER[self.spinner % SPINNER.len()],
                    Style::default().fg(ACCENT),
                ),
            ]),
            SubmissionStatus::Success(_) => Line::from(Span::styled(
                "Analysis complete.",
                Style::default().fg(Color::Green),
            )),
            SubmissionStatus::Failure(message) => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        }
    }
}

impl Widget for AnalyzePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "STEP 02 · UPLOAD YOUR RUN",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .render(chunks[0], buf);

        Paragraph::new(self.summary())
            .block(Block::default().borders(Borders::ALL).title("Profile"))
            .render(chunks[1], buf);

        let input_style = if matches!(self.status, SubmissionStatus::Pending) {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        Paragraph::new(Line::from(vec![
            Span::styled(self.video_path.to_string(), input_style),
            Span::styled("█", Style::default().fg(ACCENT)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Video"))
        .render(chunks[2], buf);

        let mut detail = Vec::new();
        if let Some(error) = self.video_error {
            detail.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else if let Some(video) = self.video {
            detail.push(Line::from(Span::styled(
                format!("{} · {:.1} MB", video.file_name, video.size_mb()),
                Style::default().fg(Color::Gray),
            )));
        }
        Paragraph::new(detail).render(chunks[3], buf);

        Paragraph::new(self.status_line())
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
    }
}
