use std::time::Instant;

use crate::encoding::TextEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rx,
    Tx,
}

/// One recorded chunk of traffic. `at_ms` is milliseconds since the
/// transcript was created.
#[derive(Debug, Clone)]
pub struct Entry {
    pub at_ms: u64,
    pub direction: Direction,
    pub data: Vec<u8>,
}

/// Bounded in-memory log of link traffic.
///
/// Backs the front end's receive surface: `received_text` is the running
/// concatenation of everything the device sent, `clear` resets it.
pub struct Transcript {
    started: Instant,
    entries: Vec<Entry>,
    max_entries: usize,
}

impl Transcript {
    pub fn new(max_entries: usize) -> Self {
        Self {
            started: Instant::now(),
            entries: Vec::new(),
            max_entries,
        }
    }

    pub fn record(&mut self, direction: Direction, data: Vec<u8>) {
        let at_ms = self.started.elapsed().as_millis() as u64;
        self.entries.push(Entry {
            at_ms,
            direction,
            data,
        });

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Everything the device sent, decoded and concatenated in arrival order.
    pub fn received_text(&self, encoding: TextEncoding) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            if entry.direction == Direction::Rx {
                text.push_str(&encoding.decode(&entry.data));
            }
        }
        text
    }

    /// Line-per-entry rendering with RX:/TX: prefixes, for debug surfaces.
    pub fn to_text(&self, encoding: TextEncoding, show_timestamp: bool) -> String {
        let mut result = String::new();
        for entry in &self.entries {
            if show_timestamp {
                let secs = entry.at_ms / 1000;
                let millis = entry.at_ms % 1000;
                result.push_str(&format!("[{secs}.{millis:03}] "));
            }

            let prefix = match entry.direction {
                Direction::Rx => "RX: ",
                Direction::Tx => "TX: ",
            };
            result.push_str(prefix);

            let text = encoding.decode(&entry.data);
            result.push_str(&text);
            if !text.ends_with('\n') {
                result.push('\n');
            }
        }
        result
    }
}
