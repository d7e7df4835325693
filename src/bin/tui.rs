//! Butler TUI (Terminal User Interface)
//!
//! A terminal front-end for Butler chats and summaries.

use anyhow::Context;
use butler::api::ChatBackend;
use butler::settings::{Settings, DEFAULT_SETTINGS_PATH};
use butler::tui::clipboard::SystemClipboard;
use butler::tui::{ui::ui, App, Screen};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::var("BUTLER_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path))?;

    // The terminal belongs to the UI, so logs go to a file
    butler::init_with_log_file(&settings.log_path)
        .with_context(|| format!("Failed to open log file {}", settings.log_path))?;
    tracing::info!("Starting Butler TUI against {}", settings.api_base_url);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut app = App::new(settings, runtime.handle().clone())?;
    match SystemClipboard::open() {
        Ok(clipboard) => app.set_clipboard(Box::new(clipboard)),
        Err(e) => tracing::warn!("{}", e),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("TUI loop failed: {}", err);
        println!("Error: {:?}", err);
    }

    // In-flight requests are abandoned
    runtime.shutdown_background();
    Ok(())
}

fn run_app<T: ratatui::backend::Backend, B: ChatBackend + 'static>(
    terminal: &mut Terminal<T>,
    app: &mut App<B>,
) -> io::Result<()> {
    loop {
        app.poll_events();
        app.refresh_open_chat_if_due();

        terminal.draw(|f| ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key<B: ChatBackend + 'static>(app: &mut App<B>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match app.current_screen {
        Screen::MainMenu => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Enter => app.select(),
            // Quick access hotkeys
            KeyCode::Char('c') => app.show_chat_list_screen(),
            KeyCode::Char('n') => app.show_new_chat_screen(),
            KeyCode::Char('s') => app.show_summary_list_screen(),
            _ => {}
        },
        Screen::ChatList => {
            let count = app.visible_chats().len();
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('b') => app.back_to_main_menu(),
                KeyCode::Down | KeyCode::Char('j') => {
                    if let Some(screen) = &mut app.chat_list_screen {
                        screen.next(count);
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if let Some(screen) = &mut app.chat_list_screen {
                        screen.previous(count);
                    }
                }
                KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                    if let Some(screen) = &mut app.chat_list_screen {
                        screen.switch_tab();
                    }
                }
                KeyCode::Enter => app.open_selected_chat(),
                KeyCode::Char('n') => app.show_new_chat_screen(),
                KeyCode::Char('r') => app.show_chat_list_screen(),
                _ => {}
            }
        }
        Screen::ChatView => handle_chat_view_key(app, key, ctrl),
        Screen::NewChat => {
            let Some(screen) = &mut app.new_chat_screen else {
                return;
            };
            match key.code {
                KeyCode::Esc => app.back_to_main_menu(),
                KeyCode::Char('s') if ctrl => app.submit_new_chat(),
                KeyCode::Tab => screen.next_field(),
                KeyCode::Enter => {
                    if !screen.commit_participant() {
                        screen.next_field();
                    }
                }
                KeyCode::Backspace => screen.backspace(),
                KeyCode::Char(c) => screen.add_char(c),
                _ => {}
            }
        }
        Screen::SummaryList => match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('b') => app.back_to_main_menu(),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(screen) = &mut app.summary_list_screen {
                    screen.next();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(screen) = &mut app.summary_list_screen {
                    screen.previous();
                }
            }
            KeyCode::Enter => app.open_selected_summary(),
            KeyCode::Char('r') => app.show_summary_list_screen(),
            _ => {}
        },
        Screen::SummaryDetail => match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('b') => app.back_from_summary_detail(),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(screen) = &mut app.summary_detail_screen {
                    screen.scroll_down();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(screen) = &mut app.summary_detail_screen {
                    screen.scroll_up();
                }
            }
            KeyCode::Char('c') => app.copy_summary_to_clipboard(),
            _ => {}
        },
    }
}

fn handle_chat_view_key<B: ChatBackend + 'static>(app: &mut App<B>, key: KeyEvent, ctrl: bool) {
    let count = app.message_count();
    let selecting = app
        .conversation
        .as_ref()
        .is_some_and(|c| c.selection().is_selecting());
    let Some(screen) = &mut app.chat_view_screen else {
        return;
    };

    // Popups take every key
    if screen.edit.is_some() {
        match key.code {
            KeyCode::Enter => app.confirm_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => screen.backspace(),
            KeyCode::Char(c) => screen.add_char(c),
            _ => {}
        }
        return;
    }
    if screen.pending_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('s') if ctrl => app.toggle_summary_mode(),
        KeyCode::Char('e') if ctrl => app.start_edit(),
        KeyCode::Char('d') if ctrl => app.request_delete(),
        KeyCode::Up => screen.cursor_up(count),
        KeyCode::Down => screen.cursor_down(count),
        KeyCode::Esc if selecting => app.toggle_summary_mode(),
        KeyCode::Esc => app.back_to_chat_list(),
        KeyCode::Char(' ') if selecting => app.toggle_highlighted_selection(),
        KeyCode::Enter if selecting => app.submit_summary(),
        _ if selecting => {}
        KeyCode::Enter => app.send_message_in_chat(),
        KeyCode::Backspace => screen.backspace(),
        KeyCode::Char(c) => screen.add_char(c),
        _ => {}
    }
}
