//! String byte extraction and quoting. Strings are leaves; they are rendered
//! as quoted, escaped text and never recursed into.

use crate::decode::array::{self, BufferEncoding};
use crate::gateway::Gateway;
use crate::layout;
use crate::session::Session;
use crate::utils::Result;

/// Read the raw bytes of a string value.
pub fn read_bytes<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
    flags: u64,
) -> Result<Vec<u8>> {
    let len = session.read_word(address + layout::OFF_PAYLOAD)? as usize;
    let base = match array::encoding(session, address, flags)? {
        BufferEncoding::Embedded => address + layout::OFF_BODY,
        BufferEncoding::Heap => session.read_word(address + layout::OFF_BODY)?,
    };
    if len == 0 {
        return Ok(Vec::new());
    }
    session.read_memory(base, len)
}

/// Render string bytes as a double-quoted literal. Printable ASCII passes
/// through, common control characters use their short escapes, everything
/// else becomes `\xNN`.
pub fn quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push('"');
    out
}
