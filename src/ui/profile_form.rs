use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, ProfileField},
    profile::{describe_intensity, ProfileDraft, FATIGUE_RANGE},
    ui::ACCENT,
};

const LABEL_WIDTH: usize = 16;
const MAX_VALUE_WIDTH: usize = 60;

pub struct ProfileForm<'a> {
    draft: &'a ProfileDraft,
    focus: ProfileField,
    error: Option<&'a str>,
}

impl<'a> ProfileForm<'a> {
    pub fn new(app: &'a App) -> Self {
        Self {
            draft: &app.draft,
            focus: app.focus,
            error: app.form_error.as_deref(),
        }
    }

    fn value_spans(&self, field: ProfileField) -> Vec<Span<'static>> {
        let focused = field == self.focus;
        let value_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let hint_style = Style::default().fg(Color::DarkGray);

        match field {
            ProfileField::Sport => selector(self.draft.sport.to_string(), focused),
            ProfileField::SkillLevel => selector(self.draft.skill_level.to_string(), focused),
            ProfileField::Fatigue => {
                let level = self.draft.fatigue_level;
                let dots: String = FATIGUE_RANGE
                    .map(|n| if n <= level { '●' } else { '·' })
                    .collect();
                vec![
                    Span::styled(format!("{} / {}  ", level, FATIGUE_RANGE.end()), value_style),
                    Span::styled(dots, Style::default().fg(ACCENT)),
                    Span::styled(format!("  {}", describe_intensity(level)), hint_style),
                ]
            }
            _ => {
                let (text, hint) = match field {
                    ProfileField::Age => (&self.draft.age, "yrs (10-80)"),
                    ProfileField::HeightFeet => (&self.draft.height_feet, "ft (3-8)"),
                    ProfileField::HeightInches => (&self.draft.height_inches, "in (0-11)"),
                    ProfileField::WeightLbs => (&self.draft.weight_lbs, "lbs (50-500)"),
                    _ => (&self.draft.injury_history, "optional"),
                };
                let mut spans = vec![Span::styled(tail(text, MAX_VALUE_WIDTH), value_style)];
                if focused {
                    spans.push(Span::styled("█", Style::default().fg(ACCENT)));
                }
                spans.push(Span::styled(format!("  {}", hint), hint_style));
                spans
            }
        }
    }
}

fn selector(value: String, focused: bool) -> Vec<Span<'static>> {
    if focused {
        vec![
            Span::styled("◀ ", Style::default().fg(ACCENT)),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" ▶", Style::default().fg(ACCENT)),
        ]
    } else {
        vec![Span::raw(format!("  {}", value))]
    }
}

/// Last `max` columns of `text`, so the cursor end of a long entry stays visible
fn tail(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out: Vec<char> = Vec::new();
    let mut width = 0;
    for c in text.chars().rev() {
        let w = c.to_string().width();
        if width + w + 1 > max {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out.into_iter().rev().collect()
}

impl Widget for ProfileForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(ProfileField::ALL.len() as u16 + 2),
                Constraint::Length(2),
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "STEP 01 · ATHLETE PROFILE",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .render(chunks[0], buf);

        let lines: Vec<Line> = ProfileField::ALL
            .iter()
            .map(|&field| {
                let marker = if field == self.focus { "▶ " } else { "  " };
                let label_style = if field == self.focus {
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let mut spans = vec![
                    Span::styled(marker, label_style),
                    Span::styled(
                        format!("{:<width$}", field.label().to_uppercase(), width = LABEL_WIDTH),
                        label_style,
                    ),
                ];
                spans.extend(self.value_spans(field));
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Profile"))
            .render(chunks[1], buf);

        if let Some(error) = self.error {
            Paragraph::new(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
        }
    }
}
