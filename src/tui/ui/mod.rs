//! UI rendering module - screen-specific rendering functions
//!
//! Each screen has its own file; popups are drawn by the screen that owns
//! them.

mod chat_list;
mod chat_view;
mod helpers;
mod main_menu;
mod new_chat;
mod summaries;

use crate::api::ChatBackend;
use crate::tui::app::App;
use crate::tui::types::Screen;
use ratatui::Frame;

// Re-export render functions
pub use chat_list::render_chat_list;
pub use chat_view::render_chat_view;
pub use main_menu::render_main_menu;
pub use new_chat::render_new_chat;
pub use summaries::{render_summary_detail, render_summary_list};

// Re-export helper functions
pub use helpers::centered_rect;

/// Main UI rendering function - dispatches to screen-specific render functions
pub fn ui<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    match app.current_screen {
        Screen::MainMenu => render_main_menu(f, app),
        Screen::ChatList => render_chat_list(f, app),
        Screen::ChatView => render_chat_view(f, app),
        Screen::NewChat => render_new_chat(f, app),
        Screen::SummaryList => render_summary_list(f, app),
        Screen::SummaryDetail => render_summary_detail(f, app),
    }
}
