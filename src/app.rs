use std::io;

use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::{Config, ConfigStore};
use crate::content::ContentSource;
use crate::history::{HistoryError, HistoryStore};
use crate::menu::{self, MainChoice, CONTENT_MENU, MAIN_MENU, TEST_MENU};
use crate::runtime::{
    wait_for_key, InputGuard, InputSource, SessionLoop, SessionOutcome, SessionRequest,
};
use crate::ui::{dashboard::DashboardView, Renderer, Screen};

/// What the program was asked to do on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Main menu until the user quits
    Interactive,
    /// One test, straight from the command line
    Single(SessionRequest),
    /// The stats dashboard only
    Stats,
}

/// Wires menus, sessions and the dashboard to one set of collaborators
pub struct App<'a> {
    input: &'a mut dyn InputSource,
    clock: &'a dyn Clock,
    renderer: &'a mut dyn Renderer,
    history: &'a mut dyn HistoryStore,
    content: &'a mut dyn ContentSource,
    config: Config,
    config_store: &'a dyn ConfigStore,
    record_errors: Vec<HistoryError>,
}

impl<'a> App<'a> {
    pub fn new(
        input: &'a mut dyn InputSource,
        clock: &'a dyn Clock,
        renderer: &'a mut dyn Renderer,
        history: &'a mut dyn HistoryStore,
        content: &'a mut dyn ContentSource,
        config: Config,
        config_store: &'a dyn ConfigStore,
    ) -> Self {
        Self {
            input,
            clock,
            renderer,
            history,
            content,
            config,
            config_store,
            record_errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run until done. History write failures do not stop the program; they
    /// are handed back so they can be shown once the terminal is restored.
    pub fn run(mut self, launch: Launch) -> io::Result<Vec<HistoryError>> {
        match launch {
            Launch::Interactive => self.interactive()?,
            Launch::Single(request) => self.take_test(request)?,
            Launch::Stats => self.show_stats()?,
        }
        Ok(self.record_errors)
    }

    fn interactive(&mut self) -> io::Result<()> {
        loop {
            match menu::select(self.input, self.clock, self.renderer, &MAIN_MENU)? {
                None | Some(MainChoice::Quit) => return Ok(()),
                Some(MainChoice::Stats) => self.show_stats()?,
                Some(MainChoice::Test) => {
                    let Some(mode) =
                        menu::select(self.input, self.clock, self.renderer, &CONTENT_MENU)?
                    else {
                        continue;
                    };
                    let Some(time_limit_secs) =
                        menu::select(self.input, self.clock, self.renderer, &TEST_MENU)?
                    else {
                        continue;
                    };
                    self.take_test(SessionRequest {
                        mode,
                        time_limit_secs,
                    })?;
                }
            }
        }
    }

    fn take_test(&mut self, request: SessionRequest) -> io::Result<()> {
        self.remember(request);

        let outcome = SessionLoop::new(
            self.input,
            self.clock,
            self.renderer,
            self.history,
            self.content,
            self.config.loop_settings(),
        )
        .run(request)?;

        if let SessionOutcome::Completed(report) = outcome {
            if let Some(err) = report.record_error {
                self.record_errors.push(err);
            }
        }
        Ok(())
    }

    fn show_stats(&mut self) -> io::Result<()> {
        let stats = self.history.aggregate(self.config.recent_entries);
        info!(tests = stats.tests, "showing stats");

        let mut input = InputGuard::new(&mut *self.input);
        input.flush();
        self.renderer
            .draw(&Screen::Dashboard(DashboardView::new(&stats)))?;
        wait_for_key(&mut *input, self.clock, menu::MENU_POLL);
        Ok(())
    }

    /// Persist the latest choice. Failing to do so only costs the default
    /// next time.
    fn remember(&mut self, request: SessionRequest) {
        if self.config.last_mode == request.mode
            && self.config.last_time_limit_secs == request.time_limit_secs
        {
            return;
        }
        self.config.last_mode = request.mode;
        self.config.last_time_limit_secs = request.time_limit_secs;
        if let Err(err) = self.config_store.save(&self.config) {
            warn!(%err, "unable to save config");
        }
    }
}
