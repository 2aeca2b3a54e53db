pub mod charting;
pub mod dashboard;
pub mod menu;
pub mod results;
pub mod screen;
pub mod typing;

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::debug;

pub use screen::Screen;

/// Draws whole screens. Render failures are plain `io::Error`s.
pub trait Renderer {
    fn draw(&mut self, screen: &Screen<'_>) -> io::Result<()>;
}

/// A ratatui terminal. When built with [`TerminalRenderer::stdout`] it owns
/// the alternate screen and gives it back (cursor visible) when dropped.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    owns_screen: bool,
}

impl TerminalRenderer<CrosstermBackend<Stdout>> {
    pub fn stdout() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            owns_screen: true,
        })
    }
}

impl<B: Backend> TerminalRenderer<B> {
    /// Wrap an arbitrary backend, typically `TestBackend`. The screen is not
    /// touched on drop.
    pub fn new(backend: B) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            owns_screen: false,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn draw(&mut self, screen: &Screen<'_>) -> io::Result<()> {
        self.terminal
            .draw(|f| f.render_widget(screen, f.area()))?;
        Ok(())
    }
}

impl<B: Backend> Drop for TerminalRenderer<B> {
    fn drop(&mut self) {
        if !self.owns_screen {
            return;
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
            debug!(%err, "failed to leave alternate screen");
        }
        if let Err(err) = self.terminal.show_cursor() {
            debug!(%err, "failed to show cursor");
        }
    }
}
