//! Incremental text decoding and line splitting.
//!
//! Network chunks split anywhere, including inside a multi-byte UTF-8
//! sequence or in the middle of a line. Both partial states are carried
//! between calls.

/// UTF-8 decoder that keeps an incomplete trailing sequence for the next
/// chunk. Invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, prefixed by whatever was left over last time.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes
                            self.pending = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Splits decoded text into `\n`-terminated lines.
#[derive(Debug, Default)]
pub struct LineDecoder {
    utf8: Utf8Decoder,
    buffer: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completed, without the
    /// terminator (a trailing `\r` is stripped too). The unterminated tail
    /// stays buffered.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(chunk);
        let Some(offset) = text.rfind('\n') else {
            self.buffer.push_str(&text);
            return Vec::new();
        };
        // Only the new text can hold the last terminator
        let last_newline = self.buffer.len() + offset;
        self.buffer.push_str(&text);
        let tail = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);

        complete[..last_newline]
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }

    /// The buffered partial line.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Drop all buffered state, returning the partial line that was
    /// discarded.
    pub fn discard(&mut self) -> String {
        self.utf8 = Utf8Decoder::new();
        std::mem::take(&mut self.buffer)
    }
}
