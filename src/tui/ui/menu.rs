use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const LOGO: &str = r#"
 ____  _            _     _            _
| __ )| | __ _  ___| | __(_) __ _  ___| | __
|  _ \| |/ _` |/ __| |/ /| |/ _` |/ __| |/ /
| |_) | | (_| | (__|   < | | (_| | (__|   <
|____/|_|\__,_|\___|_|\_\/ |\__,_|\___|_|\_\
                       |__/                 "#;

pub(super) fn draw_menu(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 70, f.area());
    let block = Block::default().title("blackjack-rs").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let logo_lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Green))))
        .collect();
    let [logo_area, info_area] =
        Layout::vertical([Constraint::Length(logo_lines.len() as u16 + 1), Constraint::Min(3)])
            .areas(inner(area));
    f.render_widget(Paragraph::new(logo_lines).alignment(Alignment::Center), logo_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines = vec![
        Line::from(Span::styled("Dealer stands on all 17s. Blackjack on the deal wins.", bold)),
        Line::from(""),
        Line::from(format!("Card source: {}", app.source_label)),
        Line::from(format!("Dealer pace: {} ms per card", app.dealer_delay_ms)),
    ];
    if app.tally.rounds() > 0 {
        lines.push(Line::from(format!(
            "This session: {} won, {} lost, {} pushed",
            app.tally.wins, app.tally.losses, app.tally.pushes
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[Enter] Table  [?] Help  [Q] Quit", dim)));
    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).alignment(Alignment::Center);
    f.render_widget(para, info_area);
}
