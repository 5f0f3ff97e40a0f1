use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, poll, read};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use wrapsnake::food::{pulse_palette, FoodItem, FoodTier, PulseColor};
use wrapsnake::{Cell, Direction, Phase, Snapshot};

pub type Coords = (u16, u16);

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_COLUMNS: u16 = 2;
/// Rows above the board used for the score line.
const HUD_ROWS: u16 = 1;

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Copy, Clone, PartialEq, Eq)]
struct Glyph {
    ch: char,
    color: Color,
}

const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

/// Owns the terminal. Frames are composed in `back` and only the cells that
/// differ from `front` are written out.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    front: Vec<Glyph>,
    back: Vec<Glyph>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let cells = width as usize * height as usize;
        Ok(TermManager { width, height, stdout: stdout(), front: vec![BLANK; cells], back: vec![BLANK; cells] })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("entering alt screen")?;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("disabling raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, LeaveAlternateScreen).context("leaving alt screen")?;
        Ok(())
    }

    pub fn read_event_blocking(&self) -> Result<Event> {
        Ok(read()?)
    }

    pub fn read_events_queue(&self) -> Result<Vec<Event>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            events.push(read()?);
        }

        Ok(events)
    }

    /// Space left for the board, in terminal columns and rows.
    pub fn board_surface(&self) -> (u32, u32) {
        let cols = self.width.saturating_sub(2);
        let rows = self.height.saturating_sub(2 + HUD_ROWS);
        (cols as u32, rows as u32)
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.width = width;
        self.height = height;
        let cells = width as usize * height as usize;
        self.front = vec![BLANK; cells];
        self.back = vec![BLANK; cells];
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("clearing screen")?;
        Ok(())
    }

    /// Draws a full frame, with an optional centered message box on top.
    pub fn render(&mut self, snap: &Snapshot<'_>, message: Option<&[&str]>) -> Result<()> {
        self.back.iter_mut().for_each(|g| *g = BLANK);

        self.draw_hud(snap);
        self.draw_borders(snap.grid.width() as u16 * CELL_COLUMNS, snap.grid.height() as u16);

        if let Some(food) = snap.food {
            let glyph = Glyph { ch: food_char(food.tier), color: food_color(food, snap.ticks) };
            self.put_cell(food.position, glyph, glyph);
        }

        let dead = snap.phase == Phase::GameOver;
        for (i, pos) in snap.body.iter().enumerate().rev() {
            let (left, right) = if dead {
                (Glyph { ch: DEAD_SNAKE_CHAR, color: Color::DarkRed }, Glyph { ch: DEAD_SNAKE_CHAR, color: Color::DarkRed })
            } else if i == 0 {
                (Glyph { ch: head_char(snap.direction), color: Color::DarkGreen }, Glyph { ch: ' ', color: Color::Reset })
            } else {
                (Glyph { ch: SNAKE_BODY_CHAR, color: Color::Green }, Glyph { ch: SNAKE_BODY_CHAR, color: Color::Green })
            };
            self.put_cell(*pos, left, right);
        }

        if let Some(lines) = message {
            self.draw_message(lines);
        }

        self.present()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_hud(&mut self, snap: &Snapshot<'_>) {
        let paused = if snap.phase == Phase::Paused { "  [paused]" } else { "" };
        let hud = format!("Score: {}  Speed: {}ms  Length: {}{}", snap.score, snap.speed_ms, snap.body.len(), paused);
        self.put_str((0, 0), &hud, Color::White);
    }

    fn draw_borders(&mut self, inner_w: u16, inner_h: u16) {
        let (left, top) = (0, HUD_ROWS);
        let (right, bottom) = (inner_w + 1, top + inner_h + 1);
        let edge = |ch| Glyph { ch, color: Color::Grey };

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            self.put((x, top), edge(ch));
            self.put((x, bottom), edge(ch));
        }

        for y in top + 1..bottom {
            self.put((left, y), edge('|'));
            self.put((right, y), edge('|'));
        }
    }

    fn draw_message(&mut self, lines: &[&str]) {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        for y_diff in 0..msg_height {
            for x_diff in 0..msg_width {
                self.put((top_left.0 + x_diff, top_left.1 + y_diff), BLANK);
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.put_str((top_left.0, top_left.1 + i as u16 + 1), &padded_line, Color::White);
        }
    }

    /// Board cells start one column and one row inside the border.
    fn put_cell(&mut self, cell: Cell, left: Glyph, right: Glyph) {
        if cell.col < 0 || cell.row < 0 {
            return;
        }
        let x = 1 + cell.col as u16 * CELL_COLUMNS;
        let y = HUD_ROWS + 1 + cell.row as u16;
        self.put((x, y), left);
        self.put((x + 1, y), right);
    }

    fn put_str(&mut self, pos: Coords, text: &str, color: Color) {
        for (x_diff, ch) in text.chars().enumerate() {
            self.put((pos.0 + x_diff as u16, pos.1), Glyph { ch, color });
        }
    }

    fn put(&mut self, pos: Coords, glyph: Glyph) {
        if pos.0 >= self.width || pos.1 >= self.height {
            return;
        }
        self.back[self.width as usize * pos.1 as usize + pos.0 as usize] = glyph;
    }

    fn present(&mut self) -> Result<()> {
        let width = self.width as usize;
        for (i, (new, old)) in self.back.iter().zip(self.front.iter()).enumerate() {
            if new == old {
                continue;
            }
            let (x, y) = ((i % width) as u16, (i / width) as u16);
            queue!(self.stdout, cursor::MoveTo(x, y), style::SetForegroundColor(new.color), style::Print(new.ch))?;
        }
        self.front.copy_from_slice(&self.back);
        self.stdout.flush().context("flushing terminal")?;
        Ok(())
    }
}

pub fn head_char(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

/// Bigger food gets a bolder glyph.
fn food_char(tier: FoodTier) -> char {
    match tier.radius_fraction() {
        r if r < 0.45 => 'o',
        r if r < 0.6 => 'O',
        _ => '@',
    }
}

fn food_color(food: &FoodItem, ticks: u64) -> Color {
    if food.is_pulsing {
        return match pulse_palette(ticks) {
            PulseColor::Purple => Color::DarkMagenta,
            PulseColor::Blue => Color::Blue,
            PulseColor::Cyan => Color::Cyan,
            PulseColor::Magenta => Color::Magenta,
        };
    }

    match food.tier {
        FoodTier::Low => Color::Yellow,
        FoodTier::Mid => Color::DarkYellow,
        FoodTier::High => Color::Red,
        FoodTier::Rare => Color::DarkMagenta,
        FoodTier::Epic => Color::Blue,
    }
}
