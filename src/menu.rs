use std::io;
use std::time::Duration;

use tracing::debug;

use crate::clock::Clock;
use crate::runtime::{InputGuard, InputSource};
use crate::session::Mode;
use crate::typing_policy::{ESC, ETX};
use crate::ui::{menu::MenuView, Renderer, Screen};

/// Sleep between polls while a menu waits for a key
pub const MENU_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Test,
    Stats,
    Quit,
}

/// A menu: each option is bound to one key and yields one value
#[derive(Debug)]
pub struct MenuSpec<T: 'static> {
    pub banner: bool,
    pub prompt: Option<&'static str>,
    pub options: &'static [(char, T, &'static str)],
    pub escape_action: &'static str,
}

impl<T: Copy + 'static> MenuSpec<T> {
    pub fn choice(&self, key: char) -> Option<T> {
        self.options
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, value, _)| *value)
    }

    pub fn view(&self) -> MenuView<'static> {
        MenuView {
            banner: self.banner,
            prompt: self.prompt,
            options: self.options.iter().map(|(k, _, label)| (*k, *label)).collect(),
            escape_action: self.escape_action,
        }
    }
}

pub const MAIN_MENU: MenuSpec<MainChoice> = MenuSpec {
    banner: true,
    prompt: None,
    options: &[
        ('1', MainChoice::Test, "Take a Test"),
        ('2', MainChoice::Stats, "View Stats"),
        ('3', MainChoice::Quit, "Quit"),
    ],
    escape_action: "quit",
};

pub const CONTENT_MENU: MenuSpec<Mode> = MenuSpec {
    banner: false,
    prompt: Some("Pick a content type:"),
    options: &[
        ('1', Mode::Code, "Code Snippets"),
        ('2', Mode::Paragraph, "Paragraphs"),
        ('3', Mode::Line, "Single Lines"),
        ('4', Mode::Logs, "Log Entries"),
        ('5', Mode::Shell, "Shell Commands"),
    ],
    escape_action: "go back",
};

/// Time limit in seconds, 0 for a completion test
pub const TEST_MENU: MenuSpec<u64> = MenuSpec {
    banner: false,
    prompt: Some("Pick a test type:"),
    options: &[
        ('1', 0, "Completion (type the full text)"),
        ('2', 15, "15 seconds"),
        ('3', 30, "30 seconds"),
        ('4', 60, "60 seconds"),
    ],
    escape_action: "go back",
};

/// Show `menu` and block until one of its keys (`Some`) or ESC/Ctrl+C
/// (`None`). Other keys are ignored.
pub fn select<T: Copy + 'static>(
    input: &mut dyn InputSource,
    clock: &dyn Clock,
    renderer: &mut dyn Renderer,
    menu: &MenuSpec<T>,
) -> io::Result<Option<T>> {
    let mut input = InputGuard::new(input);
    input.flush();
    let screen = Screen::Menu(menu.view());

    loop {
        renderer.draw(&screen)?;

        if let Some(c) = input.poll_char() {
            if c == ESC || c == ETX {
                return Ok(None);
            }
            if let Some(value) = menu.choice(c) {
                return Ok(Some(value));
            }
            debug!(?c, "key not bound in menu");
        }

        clock.sleep(MENU_POLL);
    }
}
