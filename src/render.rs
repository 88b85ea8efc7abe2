use crate::game::{GameEvent, Snapshot};
use crate::vector::Vector;

pub const CELL_WIDTH: usize = 2;

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';
const FOOD_CELL: [char; 2] = ['(', ')'];
const RIPPLE_CHAR: char = '·';
const RIPPLE_MAX_RADIUS: i32 = 3;
const FRAMES_PER_RIPPLE_STEP: u32 = 4;

const INTRO_LINES: [&str; 4] = [
    "Arrow keys or WASD to move",
    "Esc or CTRL+C to quit",
    "",
    "Press Enter to begin",
];

/// A character grid ready to be put on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Frame { width, height, cells: vec![' '; width * height] }
    }

    /// Size of the frame needed to show a grid of `grid_size` cells.
    pub fn dimensions(grid_size: i32) -> (usize, usize) {
        let side = grid_size.max(0) as usize;
        (side * CELL_WIDTH + 2, side + 3)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x]
    }

    pub fn put(&mut self, x: usize, y: usize, ch: char) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = ch;
        }
    }

    pub fn put_str(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i, y, ch);
        }
    }

    pub fn row(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width].iter().collect()
    }

    /// Draws a boxed message centred on the frame.
    pub fn overlay_message(&mut self, lines: &[&str]) {
        let msg_height = lines.len() + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let left = (self.width / 2).saturating_sub(msg_width / 2);
        let top = (self.height / 2).saturating_sub(msg_height / 2);

        for y in [top, top + msg_height - 1] {
            for x in 0..msg_width {
                self.put(left + x, y, ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width);
            self.put_str(left, top + i + 1, &padded);
        }
    }

    fn draw_borders(&mut self, inner_width: usize, inner_height: usize) {
        let end_x = inner_width + 1;
        let end_y = inner_height + 1;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.put(x, 0, ch);
            self.put(x, end_y, ch);
        }

        for y in 1..end_y {
            self.put(0, y, '|');
            self.put(end_x, y, '|');
        }
    }

    fn grid_cell(&self, pos: Vector) -> Option<(usize, usize)> {
        let (width, height) = (self.width, self.height);
        let (x, y) = (pos.x, pos.y);
        if x < 0 || y < 0 {
            return None;
        }
        let col = 1 + x as usize * CELL_WIDTH;
        let row = 1 + y as usize;
        if col + CELL_WIDTH < width && row + 2 < height {
            Some((col, row))
        } else {
            None
        }
    }

    fn fill_cell(&mut self, pos: Vector, glyph: [char; 2]) {
        if let Some((col, row)) = self.grid_cell(pos) {
            self.put(col, row, glyph[0]);
            self.put(col + 1, row, glyph[1]);
        }
    }

    fn cell_is_blank(&self, pos: Vector) -> bool {
        match self.grid_cell(pos) {
            Some((col, row)) => self.get(col, row) == ' ' && self.get(col + 1, row) == ' ',
            None => false,
        }
    }
}

/// Expanding ring drawn around newly spawned food.
#[derive(Clone, Debug, PartialEq)]
struct Ripple {
    center: Vector,
    age: u32,
}

impl Ripple {
    fn radius(&self) -> i32 {
        1 + (self.age / FRAMES_PER_RIPPLE_STEP) as i32
    }

    fn ring(&self) -> impl Iterator<Item = Vector> + '_ {
        let r = self.radius();
        (-r..=r)
            .flat_map(move |dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(move |(dx, dy)| dx.abs() == r || dy.abs() == r)
            .map(move |(dx, dy)| self.center + Vector::new(dx, dy))
    }
}

/// Turns snapshots into frames. Holds the transient visual effects.
#[derive(Default)]
pub struct Renderer {
    ripples: Vec<Ripple>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer::default()
    }

    pub fn observe(&mut self, event: &GameEvent) {
        if let GameEvent::FoodSpawned { position } = event {
            self.ripples.push(Ripple { center: *position, age: 0 });
        }
    }

    pub fn active_effects(&self) -> usize {
        self.ripples.len()
    }

    pub fn compose(&mut self, snap: &Snapshot) -> Frame {
        let side = snap.grid_size.max(0) as usize;
        let (width, height) = Frame::dimensions(snap.grid_size);
        let mut frame = Frame::new(width, height);
        frame.draw_borders(side * CELL_WIDTH, side);

        let dead = snap.started && !snap.status_message.is_empty();
        let body_char = if dead { DEAD_SNAKE_CHAR } else { SNAKE_BODY_CHAR };

        for food in &snap.food {
            frame.fill_cell(*food, FOOD_CELL);
        }
        for part in &snap.body {
            frame.fill_cell(*part, [body_char, body_char]);
        }
        if snap.started && !dead {
            frame.fill_cell(snap.head, [snap.head_char, snap.head_char]);
        }

        for ripple in &self.ripples {
            for pos in ripple.ring() {
                if frame.cell_is_blank(pos) {
                    frame.fill_cell(pos, [RIPPLE_CHAR, ' ']);
                }
            }
        }
        self.age_ripples();

        frame.put_str(1, height - 1, &snap.score_label);

        if !snap.started {
            frame.overlay_message(&INTRO_LINES);
        } else if !snap.status_message.is_empty() {
            frame.overlay_message(&[
                snap.status_message,
                snap.score_message.as_str(),
                "",
                "Press Enter to play again,",
                "or CTRL+C to quit.",
            ]);
        }

        frame
    }

    ///////////////////////////////////////////////////////////////////////////

    fn age_ripples(&mut self) {
        for ripple in self.ripples.iter_mut() {
            ripple.age += 1;
        }
        self.ripples.retain(|r| r.radius() <= RIPPLE_MAX_RADIUS);
    }
}
