//! Run screen: play field, leader banner, info panel and the game-over overlay.

use super::canvas::TerminalCanvas;
use super::game_common::{
    create_game_layout, game_layout, render_game_over_overlay, render_info_panel_frame,
    render_status_bar,
};
use crate::game::{DifficultyState, INITIAL_SCROLL_SPEED};
use crate::leaderboard::{ScoreState, SubmissionStatus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const TITLE: &str = " Dino Run ";
const ACCENT: Color = Color::LightGreen;

/// Play field size in cells for a terminal of `area`.
pub fn play_field_size(area: Rect) -> (u16, u16) {
    let content = game_layout(area).content;
    (content.width, content.height)
}

pub fn render_run_scene(
    frame: &mut Frame,
    area: Rect,
    canvas: &TerminalCanvas,
    difficulty: &DifficultyState,
    scores: &ScoreState,
) {
    let layout = create_game_layout(frame, area, TITLE, ACCENT);

    let field = Rect {
        width: layout.content.width.min(canvas.cols()),
        height: layout.content.height.min(canvas.rows()),
        ..layout.content
    };
    frame.render_widget(Paragraph::new(canvas.to_lines()), field);

    render_status_bar(
        frame,
        layout.status_bar,
        &leader_banner(scores),
        Color::Yellow,
        &[("[Space/Up]", "Jump"), ("[Esc]", "Quit")],
    );

    render_info_panel(frame, layout.info_panel, difficulty, scores);
}

/// One-line leader summary shown while running.
pub fn leader_banner(scores: &ScoreState) -> String {
    match &scores.leader {
        Some(leader) if leader.quote.is_empty() => {
            format!("Leader: {} ({})", leader.real_name, leader.score)
        }
        Some(leader) => format!(
            "Leader: {} ({}) \"{}\"",
            leader.real_name, leader.score, leader.quote
        ),
        None => "No leader yet. Be the first!".to_string(),
    }
}

fn render_info_panel(
    frame: &mut Frame,
    area: Rect,
    difficulty: &DifficultyState,
    scores: &ScoreState,
) {
    let inner = render_info_panel_frame(frame, area);
    let speed_pct = (difficulty.scroll_speed / INITIAL_SCROLL_SPEED * 100.0).round() as u32;

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));
    let lines = vec![
        Line::from(vec![
            label("Player: "),
            Span::styled(
                scores.submission_name().to_string(),
                Style::default().fg(ACCENT),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Score: "),
            Span::styled(
                difficulty.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Best: "),
            Span::styled(scores.local_best.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            label("Speed: "),
            Span::styled(format!("{}%", speed_pct), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Jump ground obstacles,",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "stay low under high ones.",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

/// Human-readable state of the end-of-session submission.
pub fn submission_label(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::NotSubmitted | SubmissionStatus::AwaitingQuote => "",
        SubmissionStatus::Skipped => "Not a personal best; nothing sent.",
        SubmissionStatus::Pending => "Sending score...",
        SubmissionStatus::Confirmed => "Score saved.",
        SubmissionStatus::Failed => "Could not reach the score server.",
    }
}

/// `crowned` is set when the session beat the known leader.
pub fn render_game_over(
    frame: &mut Frame,
    area: Rect,
    score: u32,
    crowned: bool,
    scores: &ScoreState,
) {
    let (title, color) = if crowned {
        ("NEW LEADER!", Color::LightYellow)
    } else {
        ("GAME OVER", Color::Red)
    };

    let mut body = vec![
        Line::from(Span::styled(
            format!("Score: {}", score),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Best: {}", scores.local_best),
            Style::default().fg(Color::White),
        )),
    ];
    let status = submission_label(scores.submission);
    if !status.is_empty() {
        body.push(Line::from(Span::styled(
            status,
            Style::default().fg(Color::Cyan),
        )));
    }
    body.push(Line::from(""));
    body.push(Line::from(Span::styled(
        leader_banner(scores),
        Style::default().fg(Color::Yellow),
    )));

    render_game_over_overlay(
        frame,
        area,
        title,
        color,
        body,
        &[("[Enter]", "Run again"), ("[Esc]", "Quit")],
    );
}
