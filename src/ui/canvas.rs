//! Terminal implementation of `RenderSurface`.
//!
//! The session draws in logical pixels; the canvas scales each shape onto a
//! grid of terminal cells sized to the play field. Rows are flushed to the
//! frame as styled spans, merging runs of identical colors.

use crate::game::{Character, Obstacle, ObstacleVariant, RenderSurface, Viewport};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const GROUND_CHAR: char = '▓';
const GROUND_SUB: char = '░';
const RUNNER_CHAR: char = '█';
const DUST_CHAR: char = '.';

/// Fixed backdrop specks as (x fraction, y fraction) of the viewport.
const BACKDROP_SPECKS: [(f64, f64); 6] = [
    (0.08, 0.12),
    (0.27, 0.30),
    (0.41, 0.08),
    (0.58, 0.22),
    (0.73, 0.35),
    (0.91, 0.15),
];

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        }
    }
}

pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    viewport: Viewport,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16, viewport: Viewport) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
            viewport,
        }
    }

    /// Match the canvas to the play field. Clears on change.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols != self.cols || rows != self.rows {
            self.cols = cols;
            self.rows = rows;
            self.cells = vec![Cell::default(); cols as usize * rows as usize];
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    fn col_of(&self, x: f64) -> i32 {
        (x / self.viewport.width * self.cols as f64).floor() as i32
    }

    fn row_of(&self, y: f64) -> i32 {
        (y / self.viewport.height * self.rows as f64).floor() as i32
    }

    /// Fill the cells covered by a logical rectangle. Always covers at least one cell.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, cell: Cell) {
        let left = self.col_of(x);
        let top = self.row_of(y);
        let right = self.col_of(x + width).max(left + 1);
        let bottom = self.row_of(y + height).max(top + 1);
        for row in top..bottom {
            for col in left..right {
                self.put(col, row, cell);
            }
        }
    }

    fn write_text(&mut self, col: i32, row: i32, text: &str, fg: Color, bold: bool) {
        for (i, ch) in text.chars().enumerate() {
            self.put(
                col + i as i32,
                row,
                Cell {
                    ch,
                    fg,
                    bg: Color::Reset,
                    bold,
                },
            );
        }
    }

    /// Styled lines for the frame, one per row.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.rows as usize);
        for row in self.cells.chunks(self.cols.max(1) as usize) {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut current = Cell::default();
            let mut text = String::new();
            for &cell in row {
                let same_style =
                    cell.fg == current.fg && cell.bg == current.bg && cell.bold == current.bold;
                if !same_style && !text.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut text), style_of(&current)));
                }
                current = cell;
                text.push(cell.ch);
            }
            if !text.is_empty() {
                spans.push(Span::styled(text, style_of(&current)));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn style_of(cell: &Cell) -> Style {
    let style = Style::default().fg(cell.fg).bg(cell.bg);
    if cell.bold {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

impl RenderSurface for TerminalCanvas {
    fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn draw_backdrop(&mut self, viewport: &Viewport, offset: f64) {
        self.viewport = *viewport;

        // Two copies of the layer side by side so the wrap is seamless.
        for copy in 0..2 {
            let base = offset + copy as f64 * viewport.width;
            for &(fx, fy) in &BACKDROP_SPECKS {
                let col = self.col_of(base + fx * viewport.width);
                let row = self.row_of(fy * viewport.height);
                self.put(
                    col,
                    row,
                    Cell {
                        ch: DUST_CHAR,
                        fg: Color::Rgb(70, 70, 90),
                        ..Cell::default()
                    },
                );
            }
        }

        // Standing characters rest their feet one character height below the ground line.
        let floor_y = viewport.ground_line() + viewport.height * crate::game::CHARACTER_HEIGHT_RATIO;
        let floor_row = self.row_of(floor_y).min(self.rows as i32 - 1);
        let shift = self.col_of(-offset).rem_euclid(5);
        for col in 0..self.cols as i32 {
            self.put(
                col,
                floor_row,
                Cell {
                    ch: GROUND_CHAR,
                    fg: Color::Rgb(110, 90, 60),
                    bg: Color::Rgb(50, 40, 30),
                    bold: false,
                },
            );
            if (col + shift) % 5 == 0 {
                self.put(
                    col,
                    floor_row + 1,
                    Cell {
                        ch: GROUND_SUB,
                        fg: Color::Rgb(80, 65, 45),
                        ..Cell::default()
                    },
                );
            }
        }
    }

    fn draw_character(&mut self, character: &Character) {
        self.fill_rect(
            character.x,
            character.y,
            character.width,
            character.height,
            Cell {
                ch: RUNNER_CHAR,
                fg: Color::LightGreen,
                ..Cell::default()
            },
        );
    }

    fn draw_obstacle(&mut self, obstacle: &Obstacle, variant: &ObstacleVariant) {
        let [r, g, b] = variant.color;
        self.fill_rect(
            obstacle.x,
            obstacle.y,
            obstacle.width,
            obstacle.height,
            Cell {
                ch: variant.glyph,
                fg: Color::Rgb(r, g, b),
                ..Cell::default()
            },
        );
    }

    fn draw_score(&mut self, score: u32, best: u32) {
        let text = format!("Score: {}  Best: {}", score, best);
        let col = self.cols as i32 - text.chars().count() as i32 - 1;
        self.write_text(col.max(0), 0, &text, Color::White, true);
    }
}
