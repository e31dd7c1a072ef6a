//! Bounded accumulation of process output.

/// Byte buffer holding the most recent output of a process.
///
/// Once the configured limit is exceeded the oldest bytes are discarded and
/// counted, so the final text keeps the tail of the output. A limit of zero
/// disables bounding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    limit: usize,
    dropped: usize,
}

impl OutputBuffer {
    /// Creates an empty buffer keeping at most `limit` bytes.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
            dropped: 0,
        }
    }

    /// Appends a chunk in arrival order.
    ///
    /// When trimming the head, a UTF-8 sequence cut by the limit is dropped
    /// whole, so the retained text starts on a character boundary.
    pub fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
        if self.limit == 0 {
            return;
        }
        let mut overflow = self.bytes.len().saturating_sub(self.limit);
        while overflow > 0
            && self
                .bytes
                .get(overflow)
                .is_some_and(|byte| is_continuation_byte(*byte))
        {
            overflow += 1;
        }
        if overflow > 0 {
            self.bytes.drain(..overflow);
            self.dropped += overflow;
        }
    }

    /// Returns the number of bytes discarded so far.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns the number of bytes currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the retained bytes as UTF-8, replacing invalid sequences.
    ///
    /// When bytes were discarded the text starts with a truncation notice.
    #[must_use]
    pub fn into_text(self) -> String {
        let text = String::from_utf8_lossy(&self.bytes);
        if self.dropped == 0 {
            return text.into_owned();
        }
        format!("[output truncated: {} bytes dropped]\n{text}", self.dropped)
    }
}

const fn is_continuation_byte(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}
