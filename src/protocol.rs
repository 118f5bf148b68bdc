//! Wire-protocol decoding for the tracking core's gaze stream.
//!
//! The stream is ASCII, comma-separated, one command per newline-terminated
//! line. Commands are recognized by substring containment on the first field
//! rather than exact match, which keeps the decoder forward-compatible with
//! tagged command names (`calibration_gaze` still classifies as a gaze).
//! Unknown or malformed payloads are ignored, never errors.

/// One decoded command from the tracking core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SessionStart {
        session_id: String,
        /// Opaque timestamp string the core supplies; used to derive the
        /// output file name, never parsed.
        timestamp: String,
        data_root: String,
    },
    SessionEnd,
    Gaze {
        event_id: String,
        x: String,
        y: String,
    },
    /// Anything the classifier does not recognize. Dropped silently.
    Unknown,
}

/// Widen every byte to a char, exactly as the core's feed expects: the
/// payload is ASCII and each byte is one character code, so no multi-byte
/// decoding ever happens.
fn parse_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Classify one complete payload. Stateless and pure.
///
/// Precedence follows the original dispatch order: `session_start` before
/// `session_end` before `gaze`, all by substring containment on field 0.
pub fn classify(payload: &[u8]) -> Command {
    let text = parse_ascii(payload);
    let fields: Vec<&str> = text.split(',').collect();
    let command = fields[0];

    if command.contains("session_start") {
        if fields.len() < 4 {
            return Command::Unknown;
        }
        let data_root = fields[3];
        // The data root is newline-terminated on the wire; everything past
        // the first newline is a fragment of the next message.
        let data_root = match data_root.find('\n') {
            Some(idx) => &data_root[..idx],
            None => data_root,
        };
        Command::SessionStart {
            session_id: fields[1].trim().to_string(),
            timestamp: fields[2].trim().to_string(),
            data_root: data_root.trim().to_string(),
        }
    } else if command.contains("session_end") {
        Command::SessionEnd
    } else if command.contains("gaze") {
        if fields.len() < 3 {
            return Command::Unknown;
        }
        // Gaze samples carry a variable prefix; only the last three fields
        // are meaningful.
        let tail = &fields[fields.len() - 3..];
        Command::Gaze {
            event_id: tail[0].trim().to_string(),
            x: tail[1].trim().to_string(),
            y: tail[2].trim().to_string(),
        }
    } else {
        Command::Unknown
    }
}

/// Upper bound on buffered partial-line bytes. A well-behaved core sends
/// short lines; anything beyond this is garbage and gets dropped.
const MAX_PENDING_BYTES: usize = 64 * 1024;

/// Reassembles newline-terminated payloads from raw socket chunks.
///
/// The protocol gives no framing guarantee: a logical message may arrive
/// split or coalesced across chunks. The original client assumed one chunk
/// per message; buffering partial lines here closes that gap while keeping
/// [`classify`] itself stateless.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk, yielding every complete payload it finishes.
    /// Payloads are returned without their terminating newline.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut payloads = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let mut line = std::mem::take(&mut self.pending);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                if !line.is_empty() {
                    payloads.push(line);
                }
            } else {
                self.pending.push(byte);
                if self.pending.len() > MAX_PENDING_BYTES {
                    log::warn!(
                        "dropping {} buffered bytes with no line terminator",
                        self.pending.len()
                    );
                    self.pending.clear();
                }
            }
        }
        payloads
    }

    /// Discard any buffered partial line, e.g. when the connection drops.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
