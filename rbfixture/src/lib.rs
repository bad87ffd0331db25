//! Synthetic target process for exercising the decoder without a debugger.
//!
//! [`HeapBuilder`] assembles interpreter heap objects into a flat byte
//! buffer laid out exactly as `rbvalue::layout` documents, publishes the
//! canonical constant table, and implements [`Gateway`] over the result.
//! Tests build a heap, hand the builder to the decoder, and compare rendered
//! text. Poisoned address ranges simulate unmapped memory; a read counter
//! supports the no-memory-access property for immediates.

use std::cell::Cell;
use std::collections::BTreeMap;

use bitflags::bitflags;
use rbvalue::gateway::{Gateway, WORD_SIZE};
use rbvalue::layout::{self, abi};
use rbvalue::utils::{Error, Result};

/// Where the synthetic heap is mapped. Word-aligned so object addresses
/// never collide with immediate bit patterns.
pub const BASE_ADDRESS: u64 = 0x7f52_4000_0000;

bitflags! {
    /// Flag bits composed into a header word above the type-tag field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeaderFlags: u64 {
        const NOEMBED = abi::FL_NOEMBED;
        const BIGNUM_POSITIVE = abi::FL_BIGNUM_POSITIVE;
    }
}

/// Encode a small integer as an immediate word.
pub fn fixnum(value: i64) -> u64 {
    ((value as u64) << 1) | abi::FIXNUM_FLAG
}

/// Encode a double as an immediate flonum word, the interpreter's rotation
/// scheme. The caller is responsible for picking a value in flonum range.
pub fn flonum(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits == 0 {
        return 0x8000_0000_0000_0002;
    }
    (bits.rotate_left(3) & !1) | abi::FLONUM_FLAG
}

/// Encode a static symbol id as an immediate word.
pub fn static_symbol_word(id: u64) -> u64 {
    (id << 8) | abi::SYMBOL_FLAG
}

pub struct HeapBuilder {
    memory: Vec<u8>,
    constants: BTreeMap<String, u64>,
    expressions: BTreeMap<String, u64>,
    poisoned: Vec<(u64, u64)>,
    memory_reads: Cell<usize>,
    next_symbol_id: u64,
}

impl Default for HeapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapBuilder {
    pub fn new() -> Self {
        let mut constants = BTreeMap::new();
        for (name, value) in [
            ("RUBY_Qfalse", abi::Q_FALSE),
            ("RUBY_Qnil", abi::Q_NIL),
            ("RUBY_Qtrue", abi::Q_TRUE),
            ("RUBY_Qundef", abi::Q_UNDEF),
            ("RUBY_FIXNUM_FLAG", abi::FIXNUM_FLAG),
            ("RUBY_FLONUM_MASK", abi::FLONUM_MASK),
            ("RUBY_FLONUM_FLAG", abi::FLONUM_FLAG),
            ("RUBY_SYMBOL_FLAG", abi::SYMBOL_FLAG),
            ("RUBY_T_MASK", abi::T_MASK),
            ("RUBY_T_NONE", abi::T_NONE),
            ("RUBY_T_OBJECT", abi::T_OBJECT),
            ("RUBY_T_CLASS", abi::T_CLASS),
            ("RUBY_T_MODULE", abi::T_MODULE),
            ("RUBY_T_FLOAT", abi::T_FLOAT),
            ("RUBY_T_STRING", abi::T_STRING),
            ("RUBY_T_REGEXP", abi::T_REGEXP),
            ("RUBY_T_ARRAY", abi::T_ARRAY),
            ("RUBY_T_HASH", abi::T_HASH),
            ("RUBY_T_STRUCT", abi::T_STRUCT),
            ("RUBY_T_BIGNUM", abi::T_BIGNUM),
            ("RUBY_T_FILE", abi::T_FILE),
            ("RUBY_T_DATA", abi::T_DATA),
            ("RUBY_T_MATCH", abi::T_MATCH),
            ("RUBY_T_COMPLEX", abi::T_COMPLEX),
            ("RUBY_T_RATIONAL", abi::T_RATIONAL),
            ("RUBY_T_NIL", abi::T_NIL),
            ("RUBY_T_TRUE", abi::T_TRUE),
            ("RUBY_T_FALSE", abi::T_FALSE),
            ("RUBY_T_SYMBOL", abi::T_SYMBOL),
            ("RUBY_T_FIXNUM", abi::T_FIXNUM),
            ("RUBY_T_UNDEF", abi::T_UNDEF),
            ("RUBY_T_IMEMO", abi::T_IMEMO),
            ("RUBY_T_NODE", abi::T_NODE),
            ("RUBY_T_ICLASS", abi::T_ICLASS),
            ("RUBY_T_ZOMBIE", abi::T_ZOMBIE),
            ("RUBY_FL_NOEMBED", abi::FL_NOEMBED),
            ("RUBY_FL_BIGNUM_POSITIVE", abi::FL_BIGNUM_POSITIVE),
            ("RUBY_HASH_AR_TABLE_MAX_SIZE", abi::AR_TABLE_MAX_SIZE),
        ] {
            constants.insert(name.to_owned(), value);
        }
        Self {
            memory: Vec::new(),
            constants,
            expressions: BTreeMap::new(),
            poisoned: Vec::new(),
            memory_reads: Cell::new(0),
            next_symbol_id: 0x1000,
        }
    }

    /// One past the highest mapped address.
    pub fn end(&self) -> u64 {
        BASE_ADDRESS + self.memory.len() as u64
    }

    /// Memory reads performed through the gateway so far.
    pub fn reads(&self) -> usize {
        self.memory_reads.get()
    }

    pub fn reset_reads(&self) {
        self.memory_reads.set(0);
    }

    /// Register an expression the gateway will evaluate to `word`.
    pub fn expression(&mut self, expression: &str, word: u64) {
        self.expressions.insert(expression.to_owned(), word);
    }

    /// Override or add a named constant.
    pub fn constant(&mut self, name: &str, value: u64) {
        self.constants.insert(name.to_owned(), value);
    }

    pub fn remove_constant(&mut self, name: &str) {
        self.constants.remove(name);
    }

    /// Mark `[address, address + size)` as unmapped; reads touching it fail.
    pub fn poison(&mut self, address: u64, size: u64) {
        self.poisoned.push((address, size));
    }

    fn align(&mut self) {
        while self.memory.len() % WORD_SIZE != 0 {
            self.memory.push(0);
        }
    }

    fn push_word(&mut self, word: u64) {
        self.memory.extend_from_slice(&word.to_le_bytes());
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.memory.extend_from_slice(bytes);
    }

    /// Start a heap object: aligned flags word (tag | flags) and class word.
    /// Returns the object's address.
    fn begin_object(&mut self, tag: u64, flags: HeaderFlags) -> u64 {
        self.align();
        let address = self.end();
        self.push_word(tag | flags.bits());
        self.push_word(0); // class word, never decoded
        address
    }

    /// Allocate a standalone run of words, returning its base address.
    fn alloc_words(&mut self, words: &[u64]) -> u64 {
        self.align();
        let address = self.end();
        for word in words {
            self.push_word(*word);
        }
        address
    }

    /// Allocate a standalone byte buffer, returning its base address.
    fn alloc_bytes(&mut self, bytes: &[u8]) -> u64 {
        self.align();
        let address = self.end();
        self.push_bytes(bytes);
        address
    }

    pub fn string(&mut self, text: &str) -> u64 {
        if text.len() <= 16 {
            self.string_embedded(text)
        } else {
            self.string_heap(text)
        }
    }

    pub fn string_embedded(&mut self, text: &str) -> u64 {
        let address = self.begin_object(abi::T_STRING, HeaderFlags::empty());
        self.push_word(text.len() as u64);
        self.push_bytes(text.as_bytes());
        address
    }

    pub fn string_heap(&mut self, text: &str) -> u64 {
        let buffer = self.alloc_bytes(text.as_bytes());
        let address = self.begin_object(abi::T_STRING, HeaderFlags::NOEMBED);
        self.push_word(text.len() as u64);
        self.push_word(buffer);
        address
    }

    pub fn array(&mut self, elements: &[u64]) -> u64 {
        if elements.len() <= 3 {
            self.array_embedded(elements)
        } else {
            self.array_heap(elements)
        }
    }

    pub fn array_embedded(&mut self, elements: &[u64]) -> u64 {
        let address = self.begin_object(abi::T_ARRAY, HeaderFlags::empty());
        self.push_word(elements.len() as u64);
        for element in elements {
            self.push_word(*element);
        }
        address
    }

    pub fn array_heap(&mut self, elements: &[u64]) -> u64 {
        let buffer = self.alloc_words(elements);
        let address = self.begin_object(abi::T_ARRAY, HeaderFlags::NOEMBED);
        self.push_word(elements.len() as u64);
        self.push_word(buffer);
        address
    }

    /// Reserve an embedded array object whose elements are patched later;
    /// needed to build self-referential structures.
    pub fn array_placeholder(&mut self, len: usize) -> u64 {
        self.array_embedded(&vec![abi::Q_NIL; len])
    }

    /// Overwrite element `index` of an embedded array built earlier.
    pub fn patch_array_element(&mut self, array: u64, index: usize, word: u64) {
        let offset =
            (array - BASE_ADDRESS + layout::OFF_BODY) as usize + index * WORD_SIZE;
        self.memory[offset..offset + WORD_SIZE].copy_from_slice(&word.to_le_bytes());
    }

    /// Overwrite the value of entry `index` of a compact hash built earlier.
    pub fn patch_hash_value(&mut self, hash: u64, index: usize, word: u64) {
        let offset =
            (hash - BASE_ADDRESS + layout::OFF_BODY) as usize + index * 2 * WORD_SIZE + WORD_SIZE;
        self.memory[offset..offset + WORD_SIZE].copy_from_slice(&word.to_le_bytes());
    }

    pub fn struct_value(&mut self, members: &[u64]) -> u64 {
        if members.len() <= 3 {
            self.struct_embedded(members)
        } else {
            self.struct_heap(members)
        }
    }

    pub fn struct_embedded(&mut self, members: &[u64]) -> u64 {
        let address = self.begin_object(abi::T_STRUCT, HeaderFlags::empty());
        self.push_word(members.len() as u64);
        for member in members {
            self.push_word(*member);
        }
        address
    }

    pub fn struct_heap(&mut self, members: &[u64]) -> u64 {
        let buffer = self.alloc_words(members);
        let address = self.begin_object(abi::T_STRUCT, HeaderFlags::NOEMBED);
        self.push_word(members.len() as u64);
        self.push_word(buffer);
        address
    }

    pub fn hash(&mut self, pairs: &[(u64, u64)]) -> u64 {
        if (pairs.len() as u64) < abi::AR_TABLE_MAX_SIZE {
            self.hash_compact(pairs)
        } else {
            self.hash_table(pairs, &[])
        }
    }

    /// Compact encoding: key/value pairs inline, insertion order.
    pub fn hash_compact(&mut self, pairs: &[(u64, u64)]) -> u64 {
        let address = self.begin_object(abi::T_HASH, HeaderFlags::empty());
        self.push_word(pairs.len() as u64);
        for (key, value) in pairs {
            self.push_word(*key);
            self.push_word(*value);
        }
        address
    }

    /// Table encoding: a descriptor pointing at (hash, key, value) triples.
    /// `holes` lists slot indices written as deleted entries.
    pub fn hash_table(&mut self, pairs: &[(u64, u64)], holes: &[usize]) -> u64 {
        let bound = pairs.len() + holes.len();
        let mut slots = Vec::with_capacity(bound * 3);
        let mut live = pairs.iter();
        for slot in 0..bound {
            if holes.contains(&slot) {
                slots.extend_from_slice(&[0, abi::Q_UNDEF, 0]);
            } else if let Some((key, value)) = live.next() {
                slots.extend_from_slice(&[slot as u64, *key, *value]);
            } else {
                // More holes than distinct slots; keep the region sized to
                // the bound.
                slots.extend_from_slice(&[0, abi::Q_UNDEF, 0]);
            }
        }
        let entries = self.alloc_words(&slots);
        let descriptor = self.alloc_words(&[bound as u64, entries]);
        let address = self.begin_object(abi::T_HASH, HeaderFlags::empty());
        self.push_word(pairs.len() as u64);
        self.push_word(descriptor);
        address
    }

    pub fn float(&mut self, value: f64) -> u64 {
        let address = self.begin_object(abi::T_FLOAT, HeaderFlags::empty());
        self.push_word(value.to_bits());
        address
    }

    /// Bignum from 64-bit limbs, least significant first.
    pub fn bignum(&mut self, positive: bool, limbs: &[u64]) -> u64 {
        if limbs.len() <= 2 {
            self.bignum_embedded(positive, limbs)
        } else {
            self.bignum_heap(positive, limbs)
        }
    }

    pub fn bignum_embedded(&mut self, positive: bool, limbs: &[u64]) -> u64 {
        let flags = if positive {
            HeaderFlags::BIGNUM_POSITIVE
        } else {
            HeaderFlags::empty()
        };
        let address = self.begin_object(abi::T_BIGNUM, flags);
        self.push_word(limbs.len() as u64);
        for limb in limbs {
            self.push_word(*limb);
        }
        address
    }

    pub fn bignum_heap(&mut self, positive: bool, limbs: &[u64]) -> u64 {
        let buffer = self.alloc_words(limbs);
        let flags = if positive {
            HeaderFlags::BIGNUM_POSITIVE | HeaderFlags::NOEMBED
        } else {
            HeaderFlags::NOEMBED
        };
        let address = self.begin_object(abi::T_BIGNUM, flags);
        self.push_word(limbs.len() as u64);
        self.push_word(buffer);
        address
    }

    /// Dynamic (heap) symbol with its name string.
    pub fn symbol(&mut self, name: &str) -> u64 {
        let fstr = self.string(name);
        let id = self.next_symbol_id;
        self.next_symbol_id += 1;
        let address = self.begin_object(abi::T_SYMBOL, HeaderFlags::empty());
        self.push_word(fstr);
        self.push_word(id);
        address
    }

    /// Static symbol: registers the `rb_id2str` resolution expression and
    /// returns the immediate word.
    pub fn static_symbol(&mut self, id: u64, name: &str) -> u64 {
        let fstr = self.string(name);
        self.expression(&format!("rb_id2str({id})"), fstr);
        static_symbol_word(id)
    }

    /// A recognized heap object with no field decoder (or, with an
    /// out-of-set tag, an unknown-tag object): header only.
    pub fn opaque(&mut self, tag: u64) -> u64 {
        self.begin_object(tag, HeaderFlags::empty())
    }
}

impl Gateway for HeapBuilder {
    fn evaluate(&self, expression: &str) -> Result<u64> {
        self.expressions
            .get(expression)
            .copied()
            .ok_or_else(|| Error::InvalidExpression {
                expression: expression.to_owned(),
                reason: "no such expression in fixture".to_owned(),
            })
    }

    fn read_memory(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.memory_reads.set(self.memory_reads.get() + 1);
        let fail = Error::UnreadableMemory { address, size };
        let Some(end) = address.checked_add(size as u64) else {
            return Err(fail);
        };
        if address < BASE_ADDRESS || end > self.end() {
            return Err(fail);
        }
        for &(start, psize) in &self.poisoned {
            if address < start + psize && end > start {
                return Err(fail);
            }
        }
        let offset = (address - BASE_ADDRESS) as usize;
        Ok(self.memory[offset..offset + size].to_vec())
    }

    fn lookup_constant(&self, name: &str) -> Result<u64> {
        self.constants
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingConstant {
                name: name.to_owned(),
            })
    }
}
