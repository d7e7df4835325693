// Types Tests - Testing MenuItem enum and related types

use crate::tui::MenuItem;

#[test]
fn test_menu_item_labels() {
    assert_eq!(MenuItem::Chats.label(), "Chats");
    assert_eq!(MenuItem::NewChat.label(), "New Chat");
    assert_eq!(MenuItem::Summaries.label(), "Summaries");
    assert_eq!(MenuItem::Exit.label(), "Exit");
}

#[test]
fn test_menu_item_descriptions() {
    assert_eq!(MenuItem::Exit.description(), "Exit Butler");
    for item in MenuItem::all() {
        assert!(!item.description().is_empty());
    }
}

#[test]
fn test_menu_items_order() {
    let items = MenuItem::all();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], MenuItem::Chats);
    assert_eq!(items[1], MenuItem::NewChat);
    assert_eq!(items[2], MenuItem::Summaries);
    assert_eq!(items[3], MenuItem::Exit);
}
