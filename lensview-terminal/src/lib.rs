/// Terminal front end for live point cloud projection
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use lensview_core::{ParameterBus, ParameterSnapshot, ProjectionResult, Session, Variant};
use std::io::{self, stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::ViewerConfig;
pub use renderer::PointRenderer;

/// Columns reserved for the control panel
const PANEL_WIDTH: u16 = 40;
/// Longest wait for input while nothing is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

/// What typed characters currently feed into
#[derive(Debug, Clone, PartialEq)]
enum InputMode {
    Normal,
    Entry(String),
    LoadPath(String),
}

/// Main application struct for the interactive viewer
pub struct TerminalApp {
    session: Session,
    bus: ParameterBus,
    renderer: PointRenderer,
    projection: Option<ProjectionResult>,
    selected: usize,
    mode: InputMode,
    status: String,
    slider_divisions: f64,
    running: bool,
    dirty: bool,
}

impl TerminalApp {
    pub fn new(config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    /// Build the app for a terminal of the given size without touching it
    pub fn with_size(config: &ViewerConfig, width: u16, height: u16) -> Self {
        let (canvas_width, canvas_height) = canvas_size(width, height);
        let mut bus = ParameterBus::for_variant(config.variant, config.debounce());
        bus.start(Instant::now());

        Self {
            session: Session::new(config.variant),
            bus,
            renderer: PointRenderer::new(canvas_width, canvas_height, config.canvas_margin as usize),
            projection: None,
            selected: 0,
            mode: InputMode::Normal,
            status: format!("{} model, press o to load points", config.variant),
            slider_divisions: f64::from(config.slider_divisions.max(1)),
            running: true,
            dirty: true,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn bus(&self) -> &ParameterBus {
        &self.bus
    }

    pub fn projection(&self) -> Option<&ProjectionResult> {
        self.projection.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the point cloud; a failed load keeps the current one
    pub fn load(&mut self, path: &Path) {
        let outcome = self
            .session
            .load(path)
            .map_err(lensview_core::LensviewError::from)
            .and_then(|count| Ok((count, self.session.recompute()?)));

        match outcome {
            Ok((count, projection)) => {
                if let Some(result) = projection {
                    self.projection = Some(result);
                }
                self.status = format!("Loaded {count} points from {}", path.display());
                self.dirty = true;
            }
            Err(err) => self.accept(Err(err)),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            // Sleep until input arrives or the pending window closes
            let timeout = self
                .bus
                .time_until_due(Instant::now())
                .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));

            if event::poll(timeout)? {
                self.handle_event(event::read()?, Instant::now());
            }

            self.tick(Instant::now());

            if self.dirty {
                self.render()?;
                self.dirty = false;
            }
        }

        Ok(())
    }

    /// Deliver a due bus emission to the session
    pub fn tick(&mut self, now: Instant) {
        if let Some(snapshot) = self.bus.poll(now) {
            self.apply(&snapshot);
        }
    }

    fn apply(&mut self, snapshot: &ParameterSnapshot) {
        let outcome = self.session.apply(snapshot).map_err(Into::into);
        self.accept(outcome);
    }

    /// Show a recompute or load outcome; a failed projection clears the canvas
    fn accept(&mut self, outcome: lensview_core::Result<Option<ProjectionResult>>) {
        match outcome {
            Ok(Some(result)) => {
                self.status = format!("{} points projected", result.len());
                self.projection = Some(result);
            }
            Ok(None) => {}
            Err(lensview_core::LensviewError::Load(err)) => {
                log::warn!("Load failed: {err}");
                self.status = err.to_string();
            }
            Err(err) => {
                log::warn!("Projection failed: {err}");
                self.status = err.to_string();
                self.projection = None;
            }
        }
        self.dirty = true;
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code, now);
            }
            Event::Resize(width, height) => {
                let (canvas_width, canvas_height) = canvas_size(width, height);
                self.renderer.resize(canvas_width, canvas_height);
                self.dirty = true;
            }
            _ => {}
        }
    }

    /// Apply one key press to the current input mode
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        self.dirty = true;
        let mode = std::mem::replace(&mut self.mode, InputMode::Normal);

        self.mode = match mode {
            InputMode::Normal => self.normal_key(code, now),
            InputMode::Entry(text) => self.entry_key(text, code, now),
            InputMode::LoadPath(text) => match code {
                KeyCode::Enter => {
                    self.load(Path::new(text.trim()));
                    InputMode::Normal
                }
                other => edit_line(text, other).map_or(InputMode::Normal, InputMode::LoadPath),
            },
        };
    }

    fn normal_key(&mut self, code: KeyCode, now: Instant) -> InputMode {
        let count = self.bus.controls().len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Left | KeyCode::Char('h') => self.nudge(-1, now),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(1, now),
            KeyCode::PageDown => self.nudge(-10, now),
            KeyCode::PageUp => self.nudge(10, now),
            KeyCode::Enter | KeyCode::Char('e') => return InputMode::Entry(String::new()),
            KeyCode::Char('o') => return InputMode::LoadPath(String::new()),
            _ => {}
        }
        InputMode::Normal
    }

    fn entry_key(&mut self, text: String, code: KeyCode, now: Instant) -> InputMode {
        if code != KeyCode::Enter {
            return edit_line(text, code).map_or(InputMode::Normal, InputMode::Entry);
        }

        match self.bus.control_mut(self.selected) {
            Ok(control) => match control.enter_text(&text, now) {
                Ok(value) => {
                    log::info!("{} set to {value}", control.label());
                    self.status = format!("{} = {value}", control.label());
                }
                Err(err) => {
                    log::warn!("Rejected entry: {err}");
                    self.status = err.to_string();
                }
            },
            Err(err) => self.status = err.to_string(),
        }
        InputMode::Normal
    }

    fn nudge(&mut self, steps: i32, now: Instant) {
        let divisions = self.slider_divisions;
        if let Ok(control) = self.bus.control_mut(self.selected) {
            control.nudge(steps, divisions, now);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        if let Some(result) = &self.projection {
            self.renderer.render_result(result);
        }

        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;

        self.renderer.draw(&mut stdout, 0, 1)?;
        self.draw_panel(&mut stdout, self.renderer.width() as u16 + 1)?;

        // Title and status lines
        let (_, height) = terminal::size()?;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Lensview | {} | Up/Down=Select Left/Right=Adjust Enter=Type o=Load Q=Quit",
                self.session.variant()
            )),
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::Grey),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_panel<W: Write>(&self, out: &mut W, left: u16) -> io::Result<()> {
        for (row, control) in self.bus.controls().iter().enumerate() {
            let spec = control.spec();
            let line = format!(
                "{:<22} {:>9.3}  [{}, {}]",
                spec.label, control.value(), spec.min, spec.max
            );

            queue!(out, cursor::MoveTo(left, row as u16 + 1))?;
            if row == self.selected {
                queue!(out, SetAttribute(Attribute::Reverse), Print(line), SetAttribute(Attribute::Reset))?;
            } else {
                queue!(out, Print(line))?;
            }
        }

        let row = self.bus.controls().len() as u16 + 2;
        queue!(
            out,
            cursor::MoveTo(left, row),
            SetForegroundColor(Color::DarkGrey),
            Print(legend(self.session.variant())),
            ResetColor
        )?;

        if self.bus.is_pending() {
            queue!(
                out,
                cursor::MoveTo(left, row + 1),
                SetForegroundColor(Color::DarkGrey),
                Print("applying..."),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn status_line(&self) -> String {
        match &self.mode {
            InputMode::Normal => self.status.clone(),
            InputMode::Entry(text) => {
                let label = self
                    .bus
                    .control(self.selected)
                    .map(|control| control.label())
                    .unwrap_or_default();
                format!("{label} = {text}_")
            }
            InputMode::LoadPath(text) => format!("Load points from: {text}_"),
        }
    }
}

/// Canvas area left after the title, status line and control panel
fn canvas_size(width: u16, height: u16) -> (usize, usize) {
    (
        width.saturating_sub(PANEL_WIDTH + 1) as usize,
        height.saturating_sub(2) as usize,
    )
}

/// Glyph key for the canvas
fn legend(variant: Variant) -> &'static str {
    if variant.has_reference() {
        "o distorted  \u{b7} reference"
    } else {
        "o projected"
    }
}

/// Line editing for prompts; `None` means the prompt was cancelled
fn edit_line(mut text: String, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Esc => return None,
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(c) => text.push(c),
        _ => {}
    }
    Some(text)
}
