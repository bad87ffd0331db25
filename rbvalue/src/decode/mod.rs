//! Recursive, budget-bounded decoding of a tagged word into a node tree.
//!
//! The driver classifies the root word, extracts container fields through the
//! family-specific readers, and recurses into children with a strictly
//! decreasing depth budget. The budget is the sole termination mechanism:
//! object graphs may be cyclic, and a large budget against a cyclic structure
//! re-expands the same address repeatedly up to the budget. That is accepted
//! behavior, not a bug.
//!
//! A read failure below the root is localized to the failing node, which
//! becomes a visible placeholder; siblings and ancestors decode normally.

pub mod array;
pub mod bignum;
pub mod hash;
pub mod string;
pub mod symbol;

use num_bigint::BigInt;
use strum::EnumIs;

use crate::classify::{Classification, HeapKind, Immediate, classify};
use crate::gateway::Gateway;
use crate::layout;
use crate::session::Session;
use crate::utils::{Error, Result};

/// The payload of one decoded node.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum NodeValue {
    Immediate(Immediate),
    /// Static symbol, with its name when the target could resolve the id.
    StaticSymbol { id: u64, name: Option<Vec<u8>> },
    /// Dynamic symbol, with its name when the name string was readable.
    HeapSymbol { address: u64, name: Option<Vec<u8>> },
    Str { address: u64, bytes: Vec<u8> },
    Float { address: u64, value: f64 },
    Bignum { address: u64, value: BigInt },
    /// An expandable container (array, struct, hash).
    Container { kind: HeapKind, address: u64 },
    /// A recognized heap kind with no field decoder; header only.
    Opaque { kind: HeapKind, address: u64 },
    Unreadable { address: u64 },
    UnknownTag { address: u64, tag: u64 },
}

/// Children of a decoded node.
///
/// `Unexpanded` covers both leaves and containers whose budget ran out
/// before expansion; an expanded container with no entries is `Elements` or
/// `Entries` holding an empty list.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum Children {
    Unexpanded,
    /// Array or struct elements in index order.
    Elements(Vec<DecodedNode>),
    /// Hash entries in the encoding's iteration order.
    Entries(Vec<(DecodedNode, DecodedNode)>),
}

/// One node of the decoded tree. Immutable once produced; created fresh per
/// invocation and discarded after formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedNode {
    pub value: NodeValue,
    pub children: Children,
}

impl DecodedNode {
    fn leaf(value: NodeValue) -> Self {
        Self {
            value,
            children: Children::Unexpanded,
        }
    }
}

/// Downgrade a memory failure to `None` so it stays local to the node being
/// decoded. Everything else (missing constants, invalid expressions) still
/// aborts the invocation.
pub(crate) fn soften<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::UnreadableMemory { address, size }) => {
            log::debug!("read of {size} bytes at 0x{address:x} failed mid-decode");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Decode `word` into a node tree, expanding containers through at most
/// `budget` levels below the root. At budget 0 a container yields only its
/// header node.
pub fn decode<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    word: u64,
    budget: u32,
) -> Result<DecodedNode> {
    match classify(session, word)? {
        Classification::Immediate(Immediate::StaticSymbol(id)) => {
            let name = symbol::static_name(session, id)?;
            Ok(DecodedNode::leaf(NodeValue::StaticSymbol { id, name }))
        }
        Classification::Immediate(immediate) => {
            Ok(DecodedNode::leaf(NodeValue::Immediate(immediate)))
        }
        Classification::Unreadable { address } => {
            Ok(DecodedNode::leaf(NodeValue::Unreadable { address }))
        }
        Classification::UnknownTag { address, tag } => {
            Ok(DecodedNode::leaf(NodeValue::UnknownTag { address, tag }))
        }
        Classification::Heap {
            kind,
            address,
            flags,
        } => decode_heap(session, kind, address, flags, budget),
    }
}

fn decode_heap<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    kind: HeapKind,
    address: u64,
    flags: u64,
    budget: u32,
) -> Result<DecodedNode> {
    match kind {
        HeapKind::String => Ok(match soften(string::read_bytes(session, address, flags))? {
            Some(bytes) => DecodedNode::leaf(NodeValue::Str { address, bytes }),
            None => DecodedNode::leaf(NodeValue::Unreadable { address }),
        }),
        HeapKind::Float => Ok(
            match soften(session.read_word(address + layout::OFF_PAYLOAD))? {
                Some(bits) => DecodedNode::leaf(NodeValue::Float {
                    address,
                    value: f64::from_bits(bits),
                }),
                None => DecodedNode::leaf(NodeValue::Unreadable { address }),
            },
        ),
        HeapKind::Bignum => Ok(match soften(bignum::read_value(session, address, flags))? {
            Some(value) => DecodedNode::leaf(NodeValue::Bignum { address, value }),
            None => DecodedNode::leaf(NodeValue::Unreadable { address }),
        }),
        HeapKind::Symbol => {
            let name = symbol::dynamic_name(session, address)?;
            Ok(DecodedNode::leaf(NodeValue::HeapSymbol { address, name }))
        }
        HeapKind::Array | HeapKind::Struct => {
            if budget == 0 {
                return Ok(DecodedNode {
                    value: NodeValue::Container { kind, address },
                    children: Children::Unexpanded,
                });
            }
            match soften(array::element_words(session, address, flags))? {
                None => Ok(DecodedNode::leaf(NodeValue::Unreadable { address })),
                Some(words) => {
                    let mut elements = Vec::with_capacity(words.len());
                    for element in words {
                        elements.push(decode(session, element, budget - 1)?);
                    }
                    Ok(DecodedNode {
                        value: NodeValue::Container { kind, address },
                        children: Children::Elements(elements),
                    })
                }
            }
        }
        HeapKind::Hash => {
            if budget == 0 {
                return Ok(DecodedNode {
                    value: NodeValue::Container { kind, address },
                    children: Children::Unexpanded,
                });
            }
            match soften(hash::entry_words(session, address))? {
                None => Ok(DecodedNode::leaf(NodeValue::Unreadable { address })),
                Some((_, pairs)) => {
                    let mut entries = Vec::with_capacity(pairs.len());
                    for (key_word, value_word) in pairs {
                        let key = decode(session, key_word, budget - 1)?;
                        let value = decode(session, value_word, budget - 1)?;
                        entries.push((key, value));
                    }
                    Ok(DecodedNode {
                        value: NodeValue::Container { kind, address },
                        children: Children::Entries(entries),
                    })
                }
            }
        }
        other => Ok(DecodedNode::leaf(NodeValue::Opaque {
            kind: other,
            address,
        })),
    }
}
