//! Abstract capability surface onto the debugged process.
//!
//! The decoder reaches the target exclusively through this trait: expression
//! evaluation, raw memory reads, and named constant lookups. Anything richer
//! (symbol-table type introspection, convenience variables) is unavailable by
//! design, since the target may be a minimal core dump. Implementations wrap
//! a live debugger session or, for tests, a synthetic in-memory heap.

use crate::utils::{Error, Result};

/// Width of one tagged word on the target, in bytes.
pub const WORD_SIZE: usize = 8;

pub trait Gateway {
    /// Evaluate an expression in the target and return the resulting word.
    fn evaluate(&self, expression: &str) -> Result<u64>;

    /// Read `size` raw bytes at `address`. Must return exactly `size` bytes
    /// or fail with [`Error::UnreadableMemory`].
    fn read_memory(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Resolve a named interpreter constant (type-tag masks, sentinel words,
    /// flag bit positions) to its numeric value.
    fn lookup_constant(&self, name: &str) -> Result<u64>;

    /// Read one little-endian word at `address`.
    fn read_word(&self, address: u64) -> Result<u64> {
        let bytes = self.read_memory(address, WORD_SIZE)?;
        let raw: [u8; WORD_SIZE] = bytes.try_into().map_err(|_| Error::UnreadableMemory {
            address,
            size: WORD_SIZE,
        })?;
        Ok(u64::from_le_bytes(raw))
    }

    /// Read a NUL-terminated C string at `address`, giving up after `max`
    /// bytes. Returns the bytes before the first NUL (or all `max` bytes if
    /// no NUL is found).
    fn read_cstring(&self, address: u64, max: usize) -> Result<Vec<u8>> {
        let mut buffer = self.read_memory(address, max)?;
        if let Some(end) = buffer.iter().position(|byte| *byte == 0) {
            buffer.truncate(end);
        }
        Ok(buffer)
    }
}
