use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use log::{error, info};

use wrapsnake::{Direction::{*, self}, GameConfig, Grid, Phase, Schedule, Session, TickEvent};

use crate::term::{TermManager, CELL_COLUMNS};

/// How long the host sleeps between polls for input and timer expiry.
const INPUT_POLL_MS: u64 = 5;

const INTRO: &[&str] = &[
    "Arrow keys or WASD to move",
    "Space or Esc to pause",
    "CTRL+C or q to quit",
    "",
    "Press any key to begin",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
}

/// Periodic timer owned by the host. Arming always replaces the previous
/// deadline, so at most one timer is ever live.
#[derive(Debug, Default)]
pub struct Ticker {
    period: Option<Duration>,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn apply(&mut self, schedule: Schedule, now: Instant) {
        match schedule {
            Schedule::Keep => {}
            Schedule::Rearm(period) => {
                self.period = Some(period);
                self.next_due = Some(now + period);
            }
            Schedule::Stop => {
                self.period = None;
                self.next_due = None;
            }
        }
    }

    /// True at most once per call when the deadline has passed. A host that
    /// fell behind skips the missed periods instead of bursting.
    pub fn due(&mut self, now: Instant) -> bool {
        match (self.period, self.next_due) {
            (Some(period), Some(next)) if now >= next => {
                let following = next + period;
                self.next_due = Some(if following > now { following } else { now + period });
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }
}

pub struct SnakeGame {
    term: TermManager,
    session: Session,
    ticker: Ticker,
    message: Vec<String>,
}

impl SnakeGame {
    pub fn new() -> Result<Self> {
        let term = TermManager::new()?;
        let config = GameConfig::default().with_cell_size(CELL_COLUMNS as u32, 1);
        let (cols, rows) = term.board_surface();

        // A too small terminal still gets a session, it refuses to tick until
        // the next usable resize. The intro holds the first game back until then.
        let grid = Grid::from_surface(cols, rows, config.cell_width, config.cell_height)
            .or_else(|_| Grid::new(1, 1))?;
        let mut session = Session::random(config, grid);
        if let Err(err) = session.on_resize(cols, rows) {
            error!("{}", err);
        }

        Ok(SnakeGame { term, session, ticker: Ticker::default(), message: vec![] })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Returns false when the player quits from the intro screen.
    pub fn show_intro(&mut self) -> Result<bool> {
        match self.session.fault() {
            Some(err) => self.message = vec!["Terminal too small".to_string(), err.to_string()],
            None => self.set_message(INTRO),
        }
        self.draw()?;

        loop {
            match self.term.read_event_blocking()? {
                Event::Key(ev) => {
                    if command_for_key(&ev) == Some(Command::Quit) {
                        return Ok(false);
                    }
                    if self.session.fault().is_none() {
                        break;
                    }
                }
                Event::Resize(w, h) => {
                    self.resize(w, h)?;
                    if self.message.is_empty() {
                        self.set_message(INTRO);
                        self.draw()?;
                    }
                }
                _ => {}
            }
        }

        self.message.clear();
        let schedule = self.session.restart();
        if self.session.phase() == Phase::Exhausted {
            self.game_over("The board is full!", 0);
        }
        self.ticker.apply(schedule, Instant::now());
        self.draw()?;
        Ok(true)
    }

    pub fn play(&mut self) -> Result<()> {
        loop {
            sleep(Duration::from_millis(INPUT_POLL_MS));

            for ev in self.term.read_events_queue()? {
                match ev {
                    Event::Key(key) => match command_for_key(&key) {
                        Some(Command::Quit) => return Ok(()),
                        Some(cmd) => self.handle(cmd)?,
                        None => {}
                    },
                    Event::Resize(w, h) => self.resize(w, h)?,
                    _ => {}
                }
            }

            if !self.ticker.due(Instant::now()) {
                continue;
            }

            let tick = match self.session.tick() {
                Ok(tick) => tick,
                Err(err) => {
                    self.message = vec!["Terminal too small".to_string(), err.to_string()];
                    self.draw()?;
                    continue;
                }
            };

            match tick.event {
                TickEvent::Idle => {}
                TickEvent::GameOver { final_score } => self.game_over("Game over!", final_score),
                TickEvent::Exhausted { final_score } => self.game_over("The board is full!", final_score),
                TickEvent::Moved { .. } | TickEvent::Ate { .. } => self.message.clear(),
            }
            self.ticker.apply(tick.schedule, Instant::now());
            self.draw()?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle(&mut self, cmd: Command) -> Result<()> {
        let schedule = match cmd {
            Command::Turn(dir) => {
                self.session.push_input(dir);
                return Ok(());
            }
            Command::TogglePause => {
                let schedule = self.session.toggle_pause();
                if self.session.phase() == Phase::Paused {
                    self.set_message(&["Paused", "Press Space to resume", "or CTRL+C to quit"]);
                } else if self.session.phase() == Phase::Running {
                    self.message.clear();
                }
                schedule
            }
            Command::Restart => {
                if !matches!(self.session.phase(), Phase::GameOver | Phase::Exhausted) {
                    return Ok(());
                }
                self.message.clear();
                self.session.restart()
            }
            Command::Quit => return Ok(()),
        };

        self.ticker.apply(schedule, Instant::now());
        self.draw()
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.term.resize(width, height)?;
        let (cols, rows) = self.term.board_surface();
        match self.session.on_resize(cols, rows) {
            Ok(schedule) => {
                if self.message.first().map(String::as_str) == Some("Terminal too small") {
                    self.message.clear();
                }
                self.ticker.apply(schedule, Instant::now());
            }
            Err(err) => self.message = vec!["Terminal too small".to_string(), err.to_string()],
        }
        self.draw()
    }

    fn game_over(&mut self, title: &str, score: u32) {
        info!("{} score {}", title, score);
        self.set_message(&[
            title,
            &*format!("Score: {}", score),
            "",
            "Press Enter to play again,",
            "or CTRL+C to quit."
        ]);
    }

    fn set_message(&mut self, lines: &[&str]) {
        self.message = lines.iter().map(|l| l.to_string()).collect();
    }

    fn draw(&mut self) -> Result<()> {
        let lines: Vec<&str> = self.message.iter().map(String::as_str).collect();
        let message = if lines.is_empty() { None } else { Some(&lines[..]) };
        self.term.render(&self.session.snapshot(), message)
    }
}

pub fn command_for_key(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    let KeyEvent { code, modifiers: _ } = ev;
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Char(' ') | KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
