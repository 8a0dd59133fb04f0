//! Collection helpers shared by the entity stores.

use crate::model::Identified;
use std::collections::HashMap;

/// Replace the element whose id matches `item`. Returns false if absent.
pub(crate) fn replace_by_id<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

/// Drop every element with the given id. Returns true if anything was removed.
pub(crate) fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|existing| existing.id() != id);
    items.len() != before
}

pub(crate) fn find_by_id<'a, T: Identified>(items: &'a [T], id: Option<&str>) -> Option<&'a T> {
    let id = id?;
    items.iter().find(|item| item.id() == id)
}

/// Lists of entities grouped by parent id.
///
/// Each key owns its list outright, so writing one key never shows through
/// another.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedCollection<T> {
    lists: HashMap<String, Vec<T>>,
}

impl<T> Default for KeyedCollection<T> {
    fn default() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }
}

impl<T: Identified> KeyedCollection<T> {
    /// The list for `key`, empty for unknown keys.
    pub fn get(&self, key: &str) -> &[T] {
        self.lists.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lists.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub(crate) fn set(&mut self, key: &str, items: Vec<T>) {
        self.lists.insert(key.to_string(), items);
    }

    pub(crate) fn push(&mut self, key: &str, item: T) {
        self.lists.entry(key.to_string()).or_default().push(item);
    }

    pub(crate) fn replace(&mut self, key: &str, item: T) -> bool {
        self.lists
            .get_mut(key)
            .is_some_and(|items| replace_by_id(items, item))
    }

    pub(crate) fn remove(&mut self, key: &str, id: &str) -> bool {
        self.lists
            .get_mut(key)
            .is_some_and(|items| remove_by_id(items, id))
    }

    pub(crate) fn clear_key(&mut self, key: &str) {
        self.lists.remove(key);
    }
}
