//! Step 03: the coaching report.
//!
//! The analysis payload stays an opaque `serde_json::Value` everywhere else;
//! this is the only place that looks inside it, and every key is optional.

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use serde_json::Value;

use crate::ui::ACCENT;

const MISSING: &str = "—";

/// (key under `metrics`, card label, unit)
const METRIC_CARDS: [(&str, &str, &str); 6] = [
    ("knee_angle_avg", "Knee Angle Avg", "°"),
    ("knee_angle_min", "Knee Angle Min", "°"),
    ("knee_symmetry_avg", "Knee Symmetry", "°"),
    ("hip_angle_avg", "Hip Angle Avg", "°"),
    ("arm_spread_avg", "Arm Spread Avg", ""),
    ("knee_velocity_max", "Knee Velocity Max", "°/f"),
];

pub struct Report<'a> {
    result: &'a Value,
    analyzed_at: Option<DateTime<Local>>,
    scroll: u16,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a Value, analyzed_at: Option<DateTime<Local>>, scroll: u16) -> Self {
        Self {
            result,
            analyzed_at,
            scroll,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let coaching = self.result.get("coaching");
        let metrics = self.result.get("metrics");
        let body = Style::default().fg(Color::Gray);

        let mut lines = vec![Line::from(vec![
            Span::styled(
                "STEP 03 · YOUR REPORT",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.analyzed_at
                    .map(|t| format!("   {}", t.format("%Y-%m-%d %H:%M")))
                    .unwrap_or_default(),
                Style::default().fg(Color::DarkGray),
            ),
        ])];

        section(&mut lines, "Overall Assessment");
        lines.push(Line::from(Span::styled(
            string_field(coaching, "overall_assessment").unwrap_or_default(),
            body,
        )));

        section(&mut lines, "Form Corrections");
        bullets(&mut lines, string_list(coaching, "form_corrections"), "▸", ACCENT);

        section(&mut lines, "Safety Warnings");
        bullets(
            &mut lines,
            string_list(coaching, "safety_warnings"),
            "⚠",
            Color::Yellow,
        );

        section(&mut lines, "Recommended Drills");
        bullets(&mut lines, string_list(coaching, "drills"), "▸", ACCENT);

        section(&mut lines, "Conditioning");
        lines.push(Line::from(Span::styled(
            string_field(coaching, "conditioning").unwrap_or_default(),
            body,
        )));

        section(&mut lines, "Biomechanical Metrics");
        for pair in METRIC_CARDS.chunks(2) {
            let mut spans = Vec::new();
            for (key, label, unit) in pair {
                let value = metric_value(metrics, key);
                let unit = if value == MISSING { "" } else { *unit };
                spans.push(Span::styled(
                    format!("{:<20}", label.to_uppercase()),
                    Style::default().fg(Color::DarkGray),
                ));
                spans.push(Span::styled(
                    format!("{:>8}{:<4}", value, unit),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw("    "));
            }
            lines.push(Line::from(spans));
        }

        lines
    }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        title.to_uppercase(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
}

fn bullets(lines: &mut Vec<Line<'static>>, items: Vec<String>, icon: &'static str, color: Color) {
    for item in items {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", icon), Style::default().fg(color)),
            Span::styled(item, Style::default().fg(Color::Gray)),
        ]));
    }
}

fn string_field(section: Option<&Value>, key: &str) -> Option<String> {
    section?.get(key)?.as_str().map(str::to_string)
}

/// Metric formatted to one decimal, or a dash when missing or not a number
pub fn metric_value(metrics: Option<&Value>, key: &str) -> String {
    metrics
        .and_then(|m| m.get(key))
        .and_then(Value::as_f64)
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| MISSING.to_string())
}

/// String items of an array field; anything else yields nothing
pub fn string_list(section: Option<&Value>, key: &str) -> Vec<String> {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl Widget for Report<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scroll = self.scroll;
        Paragraph::new(self.lines())
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
