//! Array and struct field extraction.
//!
//! Both families store a length word followed by either inline elements or a
//! pointer to an out-of-line buffer; the header's no-embed flag picks the
//! encoding. Structs decode identically to arrays of member values in
//! member-declaration order.

use smallvec::SmallVec;
use strum::EnumIs;

use crate::constants;
use crate::gateway::{Gateway, WORD_SIZE};
use crate::layout;
use crate::session::Session;
use crate::trace::TraceEvent;
use crate::utils::{Error, Result};

/// Physical placement of a variable-length body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum BufferEncoding {
    /// Data lives inline, directly after the header.
    Embedded,
    /// The body word is a pointer to an out-of-line buffer.
    Heap,
}

impl BufferEncoding {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Heap => "heap buffer",
        }
    }
}

/// Select the buffer encoding from the header flags. Computed once per
/// decode and recorded in the trace.
pub fn encoding<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
    flags: u64,
) -> Result<BufferEncoding> {
    let noembed = session.constant(constants::FL_NOEMBED)?;
    let encoding = if flags & noembed != 0 {
        BufferEncoding::Heap
    } else {
        BufferEncoding::Embedded
    };
    session.trace().record(TraceEvent::EncodingSelected {
        address,
        encoding: encoding.name(),
    });
    Ok(encoding)
}

/// Read the element words of an array or struct, indexed from 0.
pub fn element_words<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
    flags: u64,
) -> Result<SmallVec<u64, 8>> {
    let len = session.read_word(address + layout::OFF_PAYLOAD)? as usize;
    let base = match encoding(session, address, flags)? {
        BufferEncoding::Embedded => address + layout::OFF_BODY,
        BufferEncoding::Heap => session.read_word(address + layout::OFF_BODY)?,
    };
    read_words(session, base, len)
}

/// Read `count` consecutive little-endian words starting at `base`.
pub(crate) fn read_words<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    base: u64,
    count: usize,
) -> Result<SmallVec<u64, 8>> {
    if count == 0 {
        return Ok(SmallVec::new());
    }
    // A corrupt length can overflow the byte count; treat it as unreadable
    // rather than attempting the read.
    let size = count
        .checked_mul(WORD_SIZE)
        .ok_or(Error::UnreadableMemory {
            address: base,
            size: usize::MAX,
        })?;
    let bytes = session.read_memory(base, size)?;
    let mut words = SmallVec::with_capacity(count);
    let mut raw = [0u8; WORD_SIZE];
    for chunk in bytes.chunks_exact(WORD_SIZE) {
        raw.copy_from_slice(chunk);
        words.push(u64::from_le_bytes(raw));
    }
    Ok(words)
}
