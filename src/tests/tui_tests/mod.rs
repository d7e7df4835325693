// TUI Tests Module - Testing the public tui module
// Tests organized by TUI module structure:
// - app_tests: App struct and its flows against a scripted backend
// - screens_tests: Screen state structs
// - types_tests: MenuItem enum and related types
// - ui_tests: Rendering into a test terminal

mod app_tests;
mod screens_tests;
mod types_tests;

use super::support::MockBackend;
use crate::settings::Settings;
use crate::tui::App;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Settings with Alice signed in
pub fn signed_in_settings() -> Settings {
    Settings {
        user_id: Some("u1".to_string()),
        user_name: Some("Alice".to_string()),
        ..Settings::default()
    }
}

/// Build an app on the current runtime and apply its startup requests
pub async fn create_test_app(backend: MockBackend) -> (App<MockBackend>, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    let mut app = App::with_backend(signed_in_settings(), backend.clone(), Handle::current());
    settle(&mut app, 1).await;
    (app, backend)
}

/// Wait until `expected` background results have been applied
pub async fn settle(app: &mut App<MockBackend>, expected: usize) {
    let mut applied = 0;
    for _ in 0..400 {
        applied += app.poll_events();
        if applied >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("Expected {} events, got {}", expected, applied);
}
