use crate::cards::{Card, Suit};
use crate::game::{CardSlot, Phase};
use crate::hand::Role;
use crate::scoring;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const CARD_WIDTH: u16 = 7;
const CARD_HEIGHT: u16 = 5;

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let view = &app.view;
    let hand_height = CARD_HEIGHT + 2;
    let log_height = if app.log_open() { 8 } else { 0 };
    let [header_area, dealer_area, player_area, status_area, log_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(hand_height),
        Constraint::Length(hand_height),
        Constraint::Length(4),
        Constraint::Min(log_height),
    ])
    .areas(f.area());

    let header = Line::from(vec![
        Span::styled(view.phase.label(), phase_style(view.phase)),
        Span::raw(format!(
            "   Round {}   Won {}  Lost {}  Push {}   Source: {}",
            view.round,
            app.tally.wins, app.tally.losses, app.tally.pushes, app.source_label
        )),
    ]);
    f.render_widget(
        Paragraph::new(header).block(Block::default().title("blackjack-rs").borders(Borders::ALL)),
        header_area,
    );

    let dealer_title = if view.phase == Phase::Playing {
        format!("Dealer: showing {}", view.dealer_score)
    } else {
        format!("Dealer: {}", view.dealer_score)
    };
    render_hand(f, dealer_area, &dealer_title, &view.dealer, winner_border(app, Role::Dealer));

    let player_total = scoring::evaluate(&view.player);
    let player_title = if player_total.soft && player_total.total < scoring::BLACKJACK {
        format!("You: soft {}", player_total.total)
    } else {
        format!("You: {}", player_total.total)
    };
    let player_slots: Vec<CardSlot> = view.player.iter().cloned().map(CardSlot::FaceUp).collect();
    render_hand(f, player_area, &player_title, &player_slots, winner_border(app, Role::Player));

    draw_status(f, status_area, app);
    if app.log_open() {
        draw_log(f, log_area, app);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
            .areas(inner(area));

    let mut info: Vec<Line> = Vec::new();
    match (&app.view.message, app.view.phase) {
        (Some(msg), _) => {
            let style = match app.view.outcome.and_then(|o| o.winner()) {
                Some(Role::Player) => Style::default().fg(Color::Green),
                Some(Role::Dealer) => Style::default().fg(Color::Red),
                None if app.view.outcome.is_some() => Style::default().fg(Color::Yellow),
                None => Style::default().fg(Color::LightRed),
            };
            info.push(Line::from(Span::styled(msg.clone(), style.add_modifier(Modifier::BOLD))));
        }
        (None, Phase::Dealing) => info.push(Line::from("Dealing cards...")),
        (None, Phase::DealerPlay) => info.push(Line::from("Dealer is drawing...")),
        (None, Phase::Idle) => info.push(Line::from("Press Space to deal.")),
        (None, _) => {}
    }
    if let Some(err) = app.action_error() {
        info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    let action_style = |enabled: bool| {
        if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    let actions = Line::from(vec![
        Span::raw("Actions: "),
        Span::styled("Space deal", action_style(app.can_deal())),
        Span::raw(" • "),
        Span::styled("H hit", action_style(app.can_play())),
        Span::raw(" • "),
        Span::styled("S stand", action_style(app.can_play())),
    ]);
    let keys = vec![actions, Line::from("? help • L log • M menu • Q quit")];
    f.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), left);
    f.render_widget(
        Paragraph::new(keys).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        right,
    );
}

fn draw_log(f: &mut Frame, area: Rect, app: &AppState) {
    let height = area.height.saturating_sub(2) as usize;
    let logs = app.logs();
    let start = logs.len().saturating_sub(height);
    let lines: Vec<Line> = logs[start..].iter().map(|l| Line::from(l.as_str())).collect();
    let block = Block::default().title("Log").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space / D / Enter: deal a new round"),
        Line::from("- H: hit"),
        Line::from("- S: stand, the dealer then draws to 17"),
        Line::from("- L: show / hide log"),
        Line::from("- M / Esc: menu"),
        Line::from(""),
        Line::from(Span::styled("Rules:", bold)),
        Line::from("- Aces count 11, or 1 when 11 would bust"),
        Line::from("- 21 on the deal wins at once"),
        Line::from("- Dealer stands on any 17"),
        Line::from("- Equal totals push"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn render_hand(f: &mut Frame, area: Rect, title: &str, slots: &[CardSlot], border: Option<Color>) {
    let mut block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let hand_inner = inner(area);
    f.render_widget(block, area);
    let fits = (hand_inner.width / (CARD_WIDTH + 1)).max(1) as usize;
    for (i, slot) in slots.iter().take(fits).enumerate() {
        let x = hand_inner.x + i as u16 * (CARD_WIDTH + 1);
        let card_area =
            Rect { x, y: hand_inner.y, width: CARD_WIDTH, height: CARD_HEIGHT.min(hand_inner.height) };
        render_card_widget(f, card_area, slot.card());
    }
}

fn winner_border(app: &AppState, role: Role) -> Option<Color> {
    match app.view.outcome.map(|o| o.winner()) {
        Some(Some(r)) if r == role => Some(Color::Green),
        _ => None,
    }
}

fn phase_style(phase: Phase) -> Style {
    let color = match phase {
        Phase::Idle => Color::Gray,
        Phase::Dealing | Phase::DealerPlay => Color::Yellow,
        Phase::Playing => Color::Cyan,
        _ => Color::Magenta,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn suit_style(s: Suit) -> Style {
    let color = if s.is_red() { Color::Red } else { Color::White };
    Style::default().fg(color)
}

/// `None` draws the card back.
fn render_card_widget(f: &mut Frame, area: Rect, card: Option<&Card>) {
    let border = if card.is_some() { Color::White } else { Color::Blue };
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(border));
    let card_inner = inner(area);
    f.render_widget(block, area);
    let content = match card {
        Some(c) => {
            let style = suit_style(c.suit());
            vec![
                Line::from(Span::styled(c.label(), style.add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(c.suit().symbol().to_string(), style)),
            ]
        }
        None => vec![
            Line::from(Span::styled("▒▒▒", Style::default().fg(Color::Blue))),
            Line::from(Span::styled("▒▒▒", Style::default().fg(Color::Blue))),
        ],
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), card_inner);
}
