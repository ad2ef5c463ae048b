//! Chart viewers
//!
//! [`TerminalViewer`] takes over the terminal for one chart at a time and
//! waits for a key press. [`HeadlessViewer`] renders the same frame into an
//! in-memory buffer, which keeps the pipeline testable without a TTY.

use super::{render, ChartSpec, ChartViewer};
use crate::{Error, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend, TestBackend};
use ratatui::buffer::{Buffer, Cell};
use ratatui::Terminal;
use std::io::{self, IsTerminal, Stdout};

/// Full-screen terminal chart window
///
/// Each `show` enters the alternate screen, draws the chart, redraws on
/// resize, and returns once `q`, `Esc` or `Enter` is pressed. `Ctrl-C`
/// restores the terminal and fails with [`Error::Interrupted`].
#[derive(Debug, Default)]
pub struct TerminalViewer {
    _private: (),
}

impl TerminalViewer {
    /// Create a terminal viewer
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl ChartViewer for TerminalViewer {
    fn show(&mut self, chart: &ChartSpec) -> Result<()> {
        tracing::info!(kind = chart.kind(), title = chart.title(), "displaying chart");

        let mut session = TerminalSession::enter()?;
        wait_for_dismiss(&mut session.terminal, chart)?;
        session.leave()?;

        tracing::debug!(title = chart.title(), "chart dismissed");
        Ok(())
    }
}

/// Raw-mode alternate screen that is torn down even on error paths
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        if !io::stdout().is_terminal() {
            return Err(Error::Render(
                "stdout is not a terminal; charts need an interactive display".to_string(),
            ));
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(e.into());
            }
        };

        let mut session = Self {
            terminal,
            active: true,
        };
        session.terminal.hide_cursor()?;
        Ok(session)
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.leave() {
                tracing::warn!(error = %e, "failed to restore terminal");
            }
        }
    }
}

/// What a key press means while a chart is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    /// Close the chart and continue the run
    Dismiss,
    /// Stop the whole run
    Abort,
    /// Keep showing the chart
    Ignore,
}

fn wait_for_dismiss<B: Backend>(terminal: &mut Terminal<B>, chart: &ChartSpec) -> Result<()> {
    loop {
        terminal.draw(|frame| render::draw(frame, chart))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key_action(key.code, key.modifiers) {
                KeyAction::Dismiss => return Ok(()),
                KeyAction::Abort => return Err(Error::Interrupted),
                KeyAction::Ignore => {}
            }
        }
    }
}

// Raw mode swallows SIGINT, so Ctrl-C arrives here as a key event.
fn key_action(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match code {
        KeyCode::Char('c' | 'C') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Abort,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc | KeyCode::Enter => KeyAction::Dismiss,
        _ => KeyAction::Ignore,
    }
}

/// Off-screen viewer that renders into a fixed-size buffer
#[derive(Debug)]
pub struct HeadlessViewer {
    width: u16,
    height: u16,
    shown: Vec<String>,
    last_frame: Option<String>,
}

impl Default for HeadlessViewer {
    fn default() -> Self {
        Self::new(100, 30)
    }
}

impl HeadlessViewer {
    /// Create a viewer with a `width` x `height` cell buffer
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            shown: Vec::new(),
            last_frame: None,
        }
    }

    /// Titles of charts shown so far, in order
    #[must_use]
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Text content of the most recently rendered frame
    #[must_use]
    pub fn last_frame(&self) -> Option<&str> {
        self.last_frame.as_deref()
    }
}

impl ChartViewer for HeadlessViewer {
    fn show(&mut self, chart: &ChartSpec) -> Result<()> {
        let mut terminal = Terminal::new(TestBackend::new(self.width, self.height))?;
        terminal.draw(|frame| render::draw(frame, chart))?;

        self.last_frame = Some(buffer_text(terminal.backend().buffer()));
        self.shown.push(chart.title().to_string());

        tracing::info!(kind = chart.kind(), title = chart.title(), "rendered chart off-screen");
        Ok(())
    }
}

/// Buffer contents as lines of text, trailing spaces trimmed
fn buffer_text(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width).max(1);
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(Cell::symbol).collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
