pub mod analyze;
pub mod navbar;
pub mod profile_form;
pub mod report;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::{app::App, workflow::Step};

pub const ACCENT: Color = Color::Rgb(232, 17, 45);

const HORIZONTAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // nav bar
            Constraint::Min(0),    // active step
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    f.render_widget(navbar::NavBar::new(app.step()), chunks[0]);
    screen::current_screen(app.step()).render(app, f, chunks[1]);

    let legend = Paragraph::new(Span::styled(
        legend_for(app.step()),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, chunks[2]);
}

fn legend_for(step: Step) -> &'static str {
    match step {
        Step::Profile => "(tab/↑↓) field / (←→) choose / (enter) save & continue / (esc)ape",
        Step::Analyze => "type a video path / (enter) submit / (F1) edit profile / (esc)ape",
        Step::Results => {
            "(n) analyze another / (e)dit profile / (a)nalyze step / (↑↓) scroll / (esc)ape"
        }
    }
}
