//! Hash entry extraction.
//!
//! Hashes have two physical layouts behind one logical shape. Small hashes
//! use the compact encoding: key/value word pairs inline after the header, in
//! insertion order. Once the entry count reaches the interpreter's threshold
//! the hash migrates to a bucketed table: the body word points at a table
//! descriptor (slot bound, entries base) and entries are (hash, key, value)
//! word triples scanned in slot order, with deleted slots carrying the undef
//! sentinel as their key. The entry-count field decides which reader runs;
//! this is an interpreter invariant, not a heuristic.

use smallvec::SmallVec;
use strum::EnumIs;

use crate::constants;
use crate::decode::array;
use crate::gateway::Gateway;
use crate::layout;
use crate::session::Session;
use crate::trace::TraceEvent;
use crate::utils::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum HashEncoding {
    /// Small, array-backed, insertion-ordered.
    Compact,
    /// Large, hash-bucketed; iteration order is the table's internal order.
    Table,
}

impl HashEncoding {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Table => "table",
        }
    }
}

/// Read the ordered (key, value) entry words of a hash.
pub fn entry_words<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
) -> Result<(HashEncoding, SmallVec<(u64, u64), 8>)> {
    let count = session.read_word(address + layout::OFF_PAYLOAD)? as usize;
    let threshold = session.constant(constants::AR_TABLE_MAX_SIZE)? as usize;
    let encoding = if count < threshold {
        HashEncoding::Compact
    } else {
        HashEncoding::Table
    };
    session.trace().record(TraceEvent::EncodingSelected {
        address,
        encoding: encoding.name(),
    });

    let entries = match encoding {
        HashEncoding::Compact => compact_entries(session, address, count)?,
        HashEncoding::Table => table_entries(session, address, count)?,
    };
    Ok((encoding, entries))
}

fn compact_entries<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
    count: usize,
) -> Result<SmallVec<(u64, u64), 8>> {
    let words = array::read_words(session, address + layout::OFF_BODY, count * 2)?;
    let mut entries = SmallVec::with_capacity(count);
    for pair in words.chunks_exact(2) {
        entries.push((pair[0], pair[1]));
    }
    Ok(entries)
}

fn table_entries<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
    count: usize,
) -> Result<SmallVec<(u64, u64), 8>> {
    let table = session.read_word(address + layout::OFF_BODY)?;
    let bound = session.read_word(table + layout::TBL_OFF_BOUND)? as usize;
    let entries_base = session.read_word(table + layout::TBL_OFF_ENTRIES)?;
    let undef = session.constant(constants::Q_UNDEF)?;

    let mut entries = SmallVec::new();
    for slot in 0..bound {
        let triple = array::read_words(
            session,
            entries_base + slot as u64 * layout::TBL_ENTRY_STRIDE,
            3,
        )?;
        let (key, value) = (triple[1], triple[2]);
        if key == undef {
            // Deleted slot.
            continue;
        }
        entries.push((key, value));
    }
    if entries.len() != count {
        // Corrupt or racing target; partial structure is still worth
        // rendering.
        log::warn!(
            "hash at 0x{address:x}: header reports {count} entries, table walk found {}",
            entries.len()
        );
    }
    Ok(entries)
}
