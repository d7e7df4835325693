//! In-memory message store for one open conversation
//!
//! Messages are exposed as an ordered sequence but located by `messageId`
//! through an index, so replacing an optimistic entry is O(1) and does not
//! depend on how many messages were appended in the meantime.

use crate::message::Message;
use std::collections::HashMap;

/// Compact once this many removed slots accumulate
const COMPACT_THRESHOLD: usize = 64;

/// Ordered message list with id lookup
///
/// Removed entries leave an empty slot behind until the next compaction, so
/// indices held in `index` stay valid across removals.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    /// Messages in list order; `None` marks a removed entry
    slots: Vec<Option<Message>>,
    /// messageId -> slot position
    index: HashMap<String, usize>,
    /// Number of `None` slots
    removed: usize,
}

impl MessageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from messages in list order
    ///
    /// Later duplicates of an id are ignored.
    pub fn from_messages<I: IntoIterator<Item = Message>>(messages: I) -> Self {
        let mut store = Self::new();
        for message in messages {
            store.append(message);
        }
        store
    }

    /// Append a message at the end
    ///
    /// Returns `false` (and changes nothing) if the id is already present.
    pub fn append(&mut self, message: Message) -> bool {
        if self.index.contains_key(&message.message_id) {
            return false;
        }
        self.index.insert(message.message_id.clone(), self.slots.len());
        self.slots.push(Some(message));
        true
    }

    /// Replace the entry with `id` in place
    ///
    /// The replacement may carry a different id. If that id already belongs
    /// to another entry, the entry for `id` is dropped instead so that ids
    /// stay unique. Returns `false` if `id` is unknown.
    pub fn replace(&mut self, id: &str, message: Message) -> bool {
        let Some(&pos) = self.index.get(id) else {
            return false;
        };

        if message.message_id != id && self.index.contains_key(&message.message_id) {
            self.remove(id);
            return true;
        }

        self.index.remove(id);
        self.index.insert(message.message_id.clone(), pos);
        self.slots[pos] = Some(message);
        true
    }

    /// Mutate the entry with `id` in place
    ///
    /// The closure must not change `message_id`; use [`replace`](Self::replace)
    /// for that. Returns `false` if `id` is unknown.
    pub fn update<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Message),
    {
        match self.index.get(id).and_then(|&pos| self.slots[pos].as_mut()) {
            Some(message) => {
                f(message);
                debug_assert_eq!(message.message_id, id);
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`
    pub fn remove(&mut self, id: &str) -> Option<Message> {
        let pos = self.index.remove(id)?;
        let message = self.slots[pos].take();
        self.removed += 1;
        if self.removed >= COMPACT_THRESHOLD && self.removed * 2 >= self.slots.len() {
            self.compact();
        }
        message
    }

    /// Replace the whole list
    pub fn replace_all<I: IntoIterator<Item = Message>>(&mut self, messages: I) {
        *self = Self::from_messages(messages);
    }

    /// Remove every message
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Look up a message by id
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).and_then(|&pos| self.slots[pos].as_ref())
    }

    /// Check whether an id is present
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a message in list order
    pub fn position(&self, id: &str) -> Option<usize> {
        let pos = *self.index.get(id)?;
        Some(self.slots[..pos].iter().filter(|slot| slot.is_some()).count())
    }

    /// Iterate messages in list order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check whether the store holds no messages
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drop removed slots and rebuild the index
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(pos, slot)| slot.as_ref().map(|m| (m.message_id.clone(), pos)))
            .collect();
        self.removed = 0;
    }
}
