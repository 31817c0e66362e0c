// history.rs

/// Number of entries the ring keeps when no capacity is configured.
pub const CAPACITY: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    number: usize,
    text: String,
}

impl HistoryEntry {
    pub fn number(&self) -> usize {
        self.number
    }
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Bounded log of submitted lines. Once full, each new line overwrites the
/// oldest one; sequence numbers keep counting and are never reused.
pub struct HistoryRing {
    slots: Vec<HistoryEntry>,
    capacity: usize,
    head: usize,
    total_seen: usize,
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::with_capacity(CAPACITY)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_seen: 0,
        }
    }

    /// Records a line, stripping its line terminator. Never fails.
    pub fn record(&mut self, text: &str) {
        self.total_seen += 1;
        let entry = HistoryEntry {
            number: self.total_seen,
            text: text.trim_end_matches(['\n', '\r']).to_string(),
        };
        if self.slots.len() < self.capacity {
            self.slots.push(entry);
        } else {
            log::trace!("history full, evicting entry {}", self.slots[self.head].number);
            self.slots[self.head] = entry;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Live entries oldest first. With `Some(n)` only the `n` most recent are
    /// returned, still oldest first.
    pub fn list(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let count = self.slots.len();
        let skip = match limit {
            Some(n) if n < count => count - n,
            _ => 0,
        };
        (skip..count)
            .map(|i| &self.slots[(self.head + i) % self.capacity])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn total_seen(&self) -> usize {
        self.total_seen
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}
