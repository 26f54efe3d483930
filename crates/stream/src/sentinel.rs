//! Stdout sentinel multiplexing (§4.2 "Stream Multiplexer").
//!
//! Detects the dynamic-language bootstrap's prompt sentinel in a stream of
//! stdout chunks that can split the sentinel across arbitrary chunk
//! boundaries, and folds the "no trailing newline" heuristic on top so a
//! backend that never emits the sentinel (e.g. a REPL printing `>>> ` without
//! a newline) still surfaces as `awaiting_input`.

/// The bootstrap wrapper's prompt marker (§4.1). Written once here so the
/// sandbox launcher and this scanner never drift apart.
pub const SENTINEL: &str = "<<<OC_AWAIT>>>";

/// A piece of multiplexer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Decoded stdout bytes, stripped of any sentinel occurrences.
    Output(String),
    /// The child is waiting on stdin right now.
    AwaitingInput,
}

/// Incremental sentinel scanner for a single stdout stream.
///
/// Feed it chunks as they arrive; it holds back the longest suffix that
/// could still become a sentinel once more bytes land, so a sentinel split
/// across two reads is still detected.
#[derive(Debug, Default)]
pub struct SentinelMultiplexer {
    carry: Vec<u8>,
}

impl SentinelMultiplexer {
    pub fn new() -> Self {
        Self { carry: Vec::new() }
    }

    /// Feed a freshly read chunk (≤ 1024 bytes per §4.2, though this doesn't
    /// enforce that — the reader loop does) and return the frames it
    /// produces.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        let mut found_sentinel = false;

        loop {
            match find_subslice(&buf, SENTINEL.as_bytes()) {
                Some(idx) => {
                    found_sentinel = true;
                    if idx > 0 {
                        out.push(Frame::Output(decode(&buf[..idx])));
                    }
                    out.push(Frame::AwaitingInput);
                    buf.drain(..idx + SENTINEL.len());
                }
                None => break,
            }
        }

        let partial = longest_sentinel_prefix_suffix(&buf);
        let emit_len = buf.len() - partial;
        if emit_len > 0 {
            let text = decode(&buf[..emit_len]);
            let trailing_awaits_input = !found_sentinel && !text.ends_with('\n');
            out.push(Frame::Output(text));
            if trailing_awaits_input {
                out.push(Frame::AwaitingInput);
            }
        }

        self.carry = buf[emit_len..].to_vec();
        out
    }

    /// Flush whatever is left in the carry buffer at EOF (§4.2 "residual
    /// carry is flushed as a final frame").
    pub fn flush(&mut self) -> Option<Frame> {
        if self.carry.is_empty() {
            return None;
        }
        let text = decode(&self.carry);
        self.carry.clear();
        Some(Frame::Output(text))
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Longest suffix of `buf` that is a proper (non-empty, non-full) prefix of
/// the sentinel — i.e. bytes that could still grow into a sentinel match
/// once the next chunk arrives.
fn longest_sentinel_prefix_suffix(buf: &[u8]) -> usize {
    let sentinel = SENTINEL.as_bytes();
    let max_k = buf.len().min(sentinel.len() - 1);
    for k in (1..=max_k).rev() {
        if buf.ends_with(&sentinel[..k]) {
            return k;
        }
    }
    0
}

/// Plain passthrough decoder for stderr, which is never scanned for the
/// sentinel (§4.2).
pub fn decode_stderr_chunk(chunk: &[u8]) -> String {
    decode(chunk)
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
