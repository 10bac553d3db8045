//! Terminal dashboard using ratatui
//!
//! Shows loading progress while the session is built, then:
//! - selectors for year, gender, county and colour scale
//! - the data table sorted by county
//! - the choropleth outline map with a shared legend
//! - an activity log

mod components;
pub mod state;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::warn;

use crate::pipeline::{Session, ViewSnapshot};
use crate::report::map_title;
use components::{
    render_legend, render_selectors, render_table, LogPanel, MapPanel, StatusPanel,
};
use state::Selectors;

/// Loading phases shown in the status panel
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Fetching,
    LoadingRegions,
    Ready,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Fetching => write!(f, "Laen andmeid..."),
            Phase::LoadingRegions => write!(f, "Laen maakondade piire..."),
            Phase::Ready => write!(f, "Valmis"),
        }
    }
}

/// Trait for UI implementations - allows both real TUI and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// Interactive dashboard in the alternate screen
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusPanel,
    log: LogPanel,
}

impl Dashboard {
    /// Create the dashboard and enter the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            status: StatusPanel::new(),
            log: LogPanel::new(),
        })
    }

    /// Draw status and log only, used while loading
    fn draw_loading(&mut self) -> Result<()> {
        let status = &self.status;
        let log = &self.log;

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(5)])
                .split(frame.area());

            status.render(frame, chunks[0]);
            log.render(frame, chunks[1]);
        })?;

        Ok(())
    }

    fn draw_view(&mut self, selectors: &Selectors, view: Option<&ViewSnapshot<'_>>) -> Result<()> {
        let status = &self.status;
        let log = &self.log;
        let selection = selectors.selection();

        self.terminal.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Status panel
                    Constraint::Length(3), // Selectors
                    Constraint::Min(10),   // Table and map
                    Constraint::Length(3), // Legend
                    Constraint::Length(5), // Log panel
                ])
                .split(frame.area());

            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(rows[2]);

            status.render(frame, rows[0]);
            render_selectors(selectors, frame, rows[1]);

            let records = view.map(|v| v.records.as_slice()).unwrap_or(&[]);
            let scale = view.and_then(|v| v.scale);
            let title = selection
                .as_ref()
                .map(|s| map_title(s.year, &s.region))
                .unwrap_or_default();

            render_table(records, frame, body[0]);
            MapPanel {
                title,
                records,
                scale,
                palette: selectors.palette(),
            }
            .render(frame, body[1]);
            render_legend(scale, selectors.palette(), frame, rows[3]);
            log.render(frame, rows[4]);
        })?;

        Ok(())
    }

    /// Run the interactive loop until the user quits
    pub fn run(&mut self, session: &Session) -> Result<()> {
        let mut selectors = Selectors::new(session.years());
        let mut view = self.recompute(session, &mut selectors);

        loop {
            self.draw_view(&selectors, view.as_ref())?;

            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            let CrosstermEvent::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }

            let changed = match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Tab => {
                    selectors.next_focus();
                    false
                }
                KeyCode::BackTab => {
                    selectors.prev_focus();
                    false
                }
                KeyCode::Right | KeyCode::Char('l') => selectors.shift(1),
                KeyCode::Left | KeyCode::Char('h') => selectors.shift(-1),
                _ => false,
            };

            if changed {
                view = self.recompute(session, &mut selectors);
            }
        }

        Ok(())
    }

    /// Rebuild the view for the current selection. Failures are shown in
    /// the status panel and leave no table or map.
    fn recompute<'s>(
        &mut self,
        session: &'s Session,
        selectors: &mut Selectors,
    ) -> Option<ViewSnapshot<'s>> {
        let Some(selection) = selectors.selection() else {
            self.status.set_error(Some("Andmed puuduvad".to_string()));
            return None;
        };

        match session.region_options(selection.year, selection.gender) {
            Ok(options) => selectors.set_region_options(options),
            Err(err) => {
                warn!("{}", err);
                self.status.set_error(Some(err.to_string()));
                return None;
            }
        }

        let selection = selectors.selection()?;
        match session.render(&selection) {
            Ok(view) => {
                self.status.set_error(None);
                self.log.add(format!(
                    "{}, {}: {} maakonda",
                    selection.year,
                    selection.gender,
                    view.records.len()
                ));
                Some(view)
            }
            Err(err) => {
                warn!("{}", err);
                self.status.set_error(Some(err.to_string()));
                None
            }
        }
    }

    /// Show a fatal error and wait for a keypress before restoring the terminal
    pub fn fail(mut self, message: &str) -> Result<()> {
        self.status.set_error(Some(message.to_string()));
        self.log("Väljumiseks vajuta suvalist klahvi...");

        loop {
            if event::poll(Duration::from_millis(100))? {
                if let CrosstermEvent::Key(_) = event::read()? {
                    break;
                }
            }
        }

        self.restore()
    }

    /// Restore terminal without waiting
    pub fn restore(mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for Dashboard {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.draw_loading().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.draw_loading().ok();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.log.add(message);
        self.draw_loading().ok();
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        // Best effort cleanup
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
