//! Chat client state
//!
//! This module is organized into:
//! - `conversation` - message list of the open conversation, optimistic
//!   sends, edits, deletions and summary submission
//! - `directory` - conversation list and conversation creation
//! - `events` - background requests and the events they report back

pub mod conversation;
pub mod directory;
pub mod events;

pub use conversation::{Conversation, OutgoingMessage};
pub use directory::{chats_of_type, NewChatForm};
pub use events::{Applied, ChatEvent, ConversationEvent, Dispatcher, Notice};
