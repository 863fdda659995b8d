//! Read-through cache of document texts / 文档文本缓存
//!
//! Entries are dropped on every text write; a full cache stops admitting new
//! entries until something is invalidated. Every invalidation bumps an epoch, and
//! a reader only fills the cache if no invalidation happened since it started its
//! store read, so a text read before a write can never be cached after it.

use parking_lot::RwLock;
use std::collections::HashMap;

struct Entries {
    texts: HashMap<String, String>,
    epoch: u64,
}

pub struct TextCache {
    entries: RwLock<Entries>,
    capacity: usize,
}

impl TextCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries {
                texts: HashMap::new(),
                epoch: 0,
            }),
            capacity,
        }
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.entries.read().texts.get(id).cloned()
    }

    /// Current epoch; take it before reading the text from the store / 当前缓存纪元
    pub fn epoch(&self) -> u64 {
        self.entries.read().epoch
    }

    /// Cache `text` unless an invalidation happened after `epoch` was taken / 写入缓存
    pub fn insert(&self, id: &str, text: &str, epoch: u64) {
        let mut entries = self.entries.write();
        if entries.epoch != epoch {
            return;
        }
        if entries.texts.len() >= self.capacity && !entries.texts.contains_key(id) {
            return;
        }
        entries.texts.insert(id.to_string(), text.to_string());
    }

    pub fn invalidate(&self, id: &str) {
        let mut entries = self.entries.write();
        entries.texts.remove(id);
        entries.epoch += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.read().texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
