//! LRU Store Module
//!
//! Byte-bounded least-recently-used store with optional insert/evict observers.

use std::collections::HashMap;
use std::fmt;

// == Byte Size ==
/// Anything that can report how many bytes it occupies.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

/// Hook fired with the key and value of an inserted or evicted entry.
///
/// Hooks run synchronously under the caller's lock and must not panic;
/// eviction bookkeeping is already complete by the time they run.
pub type Observer<V> = Box<dyn Fn(&str, &V) + Send + Sync>;

// == Node ==
/// One entry in the recency list, linked by slot index.
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Store ==
/// Size-bounded LRU store.
///
/// Entries form a doubly linked list over a slot arena:
/// - `head` = Most recently used
/// - `tail` = Least recently used
///
/// Size is the sum of `key.len() + value.byte_size()` over live entries.
/// A `max_size` of 0 disables eviction. No locking happens here; callers
/// serialize access.
pub struct LruStore<V> {
    /// Slot arena; `None` marks a free slot
    slots: Vec<Option<Node<V>>>,
    /// Indices of free slots for reuse
    free: Vec<usize>,
    /// Key to slot index
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    current_size: usize,
    max_size: usize,
    on_insert: Option<Observer<V>>,
    on_evict: Option<Observer<V>>,
}

impl<V: ByteSize> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store bounded to `max_size` bytes (0 = unbounded).
    pub fn new(max_size: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            current_size: 0,
            max_size,
            on_insert: None,
            on_evict: None,
        }
    }

    /// Installs a hook fired after every `set`.
    pub fn with_insert_observer(mut self, observer: Observer<V>) -> Self {
        self.on_insert = Some(observer);
        self
    }

    /// Installs a hook fired for every evicted entry.
    pub fn with_evict_observer(mut self, observer: Observer<V>) -> Self {
        self.on_evict = Some(observer);
        self
    }

    // == Get ==
    /// Returns the value for `key`, promoting it to most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Set ==
    /// Inserts or replaces `key`, then evicts from the cold end until the
    /// store is back under budget.
    ///
    /// Observers fire only after the store is back under budget, so a
    /// panicking hook cannot leave it oversized. The insert hook is skipped
    /// when the new entry was itself evicted.
    ///
    /// Returns the number of entries evicted.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> usize {
        let key = key.into();
        let new_len = value.byte_size();

        let idx = match self.index.get(&key) {
            Some(&idx) => {
                if let Some(node) = self.slots[idx].as_mut() {
                    let old_len = node.value.byte_size();
                    node.value = value;
                    self.current_size = self.current_size + new_len - old_len;
                }
                self.move_to_front(idx);
                idx
            }
            None => {
                self.current_size += key.len() + new_len;
                let idx = self.alloc(Node {
                    key: key.clone(),
                    value,
                    prev: None,
                    next: None,
                });
                self.push_front(idx);
                self.index.insert(key.clone(), idx);
                idx
            }
        };

        let mut evicted = Vec::new();
        while self.max_size != 0 && self.current_size >= self.max_size {
            match self.pop_oldest() {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }

        if let Some(hook) = &self.on_evict {
            for (k, v) in &evicted {
                hook(k, v);
            }
        }
        if self.index.get(&key) == Some(&idx) {
            self.notify_insert(idx);
        }
        evicted.len()
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let (key, value) = self.pop_oldest()?;
        if let Some(hook) = &self.on_evict {
            hook(&key, &value);
        }
        Some((key, value))
    }

    // == Accessors ==
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently accounted to live entries.
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            store: self,
            cursor: self.head,
        }
    }

    // == Internal List Plumbing ==
    /// Unlinks the tail entry and settles size accounting without notifying.
    fn pop_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        self.current_size -= node.key.len() + node.value.byte_size();
        Some((node.key, node.value))
    }

    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(node) = self.slots[h].as_mut() {
                node.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn notify_insert(&self, idx: usize) {
        if let (Some(hook), Some(node)) = (&self.on_insert, self.slots[idx].as_ref()) {
            hook(&node.key, &node.value);
        }
    }
}

impl<V> fmt::Debug for LruStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("len", &self.index.len())
            .field("current_size", &self.current_size)
            .field("max_size", &self.max_size)
            .finish()
    }
}

// == Keys Iterator ==
/// Iterator over keys in recency order, most recent first.
pub struct Keys<'a, V> {
    store: &'a LruStore<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.store.slots[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
