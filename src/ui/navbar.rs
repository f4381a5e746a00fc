use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{ui::ACCENT, workflow::Step};

/// Brand plus one pill per step: current highlighted, done ticked, future dimmed
pub struct NavBar {
    current: Step,
}

impl NavBar {
    pub fn new(current: Step) -> Self {
        Self { current }
    }

    fn pill(&self, step: Step) -> Span<'static> {
        if step == self.current {
            Span::styled(
                format!(" {}. {} ", step.index() + 1, step),
                Style::default()
                    .bg(ACCENT)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        } else if step < self.current {
            Span::styled(format!(" ✓ {} ", step), Style::default().fg(Color::Gray))
        } else {
            Span::styled(
                format!(" {}. {} ", step.index() + 1, step),
                Style::default().fg(Color::DarkGray),
            )
        }
    }
}

impl Widget for NavBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled("REDWINGS", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                " AI   ",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
        ];
        for (i, step) in Step::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(self.pill(step));
        }

        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::BOTTOM))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
