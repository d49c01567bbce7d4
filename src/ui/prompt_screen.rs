//! Single-line text prompt: player key, display name and the leader quote.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub struct PromptScreen {
    title: String,
    label: String,
    hints: Vec<String>,
    pub input: String,
    cursor_position: usize,
    max_chars: Option<usize>,
    allow_empty: bool,
    pub validation_error: Option<String>,
}

impl PromptScreen {
    pub fn new(title: &str, label: &str) -> Self {
        Self {
            title: title.to_string(),
            label: label.to_string(),
            hints: Vec::new(),
            input: String::new(),
            cursor_position: 0,
            max_chars: None,
            allow_empty: false,
            validation_error: None,
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hints.push(hint.to_string());
        self
    }

    /// Stop accepting characters past `max` (counted in chars).
    pub fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Pre-fill with a remembered value; the cursor goes to the end.
    pub fn with_initial(mut self, value: &str) -> Self {
        self.set_input(value);
        self
    }

    pub fn set_input(&mut self, value: &str) {
        self.input = match self.max_chars {
            Some(max) => value.chars().take(max).collect(),
            None => value.to_string(),
        };
        self.cursor_position = self.input.chars().count();
        self.validate();
    }

    pub fn handle_char_input(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(max) = self.max_chars {
            if self.input.chars().count() >= max {
                return;
            }
        }
        let byte_idx = self.byte_index(self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
        self.validate();
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor_position > 0 {
            let byte_idx = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_idx);
            self.cursor_position -= 1;
            self.validate();
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count());
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn validate(&mut self) {
        self.validation_error = if !self.allow_empty && self.input.trim().is_empty() {
            Some("Cannot be empty".to_string())
        } else {
            None
        };
    }

    pub fn is_valid(&self) -> bool {
        self.allow_empty || !self.input.trim().is_empty()
    }

    pub fn value(&self) -> String {
        self.input.trim().to_string()
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        f.render_widget(Clear, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(1),
                Constraint::Length(4), // Label + field
                Constraint::Length(1),
                Constraint::Min(2), // Hints
                Constraint::Length(2), // Validation
                Constraint::Length(3), // Controls
            ])
            .split(area);

        let title = Paragraph::new(self.title.as_str())
            .style(
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        f.render_widget(Paragraph::new(self.label.as_str()), chunks[2]);

        let input_area = Rect {
            y: chunks[2].y + 1,
            height: 3.min(chunks[2].height.saturating_sub(1)),
            ..chunks[2]
        };
        let input_widget = Paragraph::new(self.input_with_cursor())
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White));
        f.render_widget(input_widget, input_area);

        let mut hints: Vec<Line> = self
            .hints
            .iter()
            .map(|h| Line::from(format!("• {}", h)))
            .collect();
        if let Some(max) = self.max_chars {
            hints.push(Line::from(format!(
                "• {}/{} characters",
                self.input.chars().count(),
                max
            )));
        }
        f.render_widget(
            Paragraph::new(hints)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true }),
            chunks[4],
        );

        if let Some(error) = &self.validation_error {
            let line = Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red),
            ));
            f.render_widget(Paragraph::new(line), chunks[5]);
        }

        let controls = Paragraph::new("[Enter] Confirm    [Esc] Cancel")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(controls, chunks[6]);
    }

    fn input_with_cursor(&self) -> String {
        let chars: Vec<char> = self.input.chars().collect();
        let before: String = chars[..self.cursor_position].iter().collect();
        let after: String = chars[self.cursor_position..].iter().collect();
        format!("{}_{}", before, after)
    }
}
