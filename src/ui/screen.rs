use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::ui::{dashboard::DashboardView, menu::MenuView, results::ResultsFrame, typing::LiveFrame};

/// Everything the renderer can be asked to show. Each variant is a pure view
/// over data owned elsewhere.
pub enum Screen<'a> {
    Menu(MenuView<'a>),
    Live(LiveFrame<'a>),
    Results(ResultsFrame),
    Dashboard(DashboardView<'a>),
}

impl Screen<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu(_) => "menu",
            Screen::Live(_) => "live",
            Screen::Results(_) => "results",
            Screen::Dashboard(_) => "dashboard",
        }
    }
}

impl Widget for &Screen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self {
            Screen::Menu(view) => view.render(area, buf),
            Screen::Live(frame) => frame.render(area, buf),
            Screen::Results(frame) => frame.render(area, buf),
            Screen::Dashboard(view) => view.render(area, buf),
        }
    }
}
