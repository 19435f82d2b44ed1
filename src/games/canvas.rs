use ratatui::prelude::*;

/// Character grid that renders into one styled `Line` per row.
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Vec<(char, Style)>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Style) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![(' ', background); width]; height],
        }
    }

    /// Set one cell; out-of-range coordinates are ignored.
    pub fn put(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y][x] = (ch, style);
        }
    }

    pub fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, ch: char, style: Style) {
        for dy in 0..h.max(0) {
            for dx in 0..w.max(0) {
                self.put(x + dx, y + dy, ch, style);
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Map a world coordinate onto `cells` terminal cells.
pub fn scale(value: f32, world: f32, cells: usize) -> i32 {
    if world <= 0.0 {
        return 0;
    }
    (value / world * cells as f32).floor() as i32
}
