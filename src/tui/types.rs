//! Core types for TUI screens and navigation

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Dashboard and navigation
    MainMenu,
    /// Conversations, split into DM and group tabs
    ChatList,
    /// Open conversation
    ChatView,
    /// Conversation creation form
    NewChat,
    /// All summaries
    SummaryList,
    /// One summary
    SummaryDetail,
}

/// Main menu items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Navigate to chat list
    Chats,
    /// Navigate to the new chat form
    NewChat,
    /// Navigate to the summary list
    Summaries,
    /// Exit application
    Exit,
}

impl MenuItem {
    /// Get all menu items in order
    pub fn all() -> Vec<Self> {
        vec![Self::Chats, Self::NewChat, Self::Summaries, Self::Exit]
    }

    /// Get display label for menu item
    pub fn label(&self) -> &str {
        match self {
            Self::Chats => "Chats",
            Self::NewChat => "New Chat",
            Self::Summaries => "Summaries",
            Self::Exit => "Exit",
        }
    }

    /// Get description for menu item
    pub fn description(&self) -> &str {
        match self {
            Self::Chats => "Open your direct messages and group chats",
            Self::NewChat => "Start a direct message or a group chat",
            Self::Summaries => "Browse AI summaries of your conversations",
            Self::Exit => "Exit Butler",
        }
    }
}
