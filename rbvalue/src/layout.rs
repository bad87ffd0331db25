//! Field layout of the target interpreter's heap objects.
//!
//! The target ships no debug symbols describing logical structure, so the
//! byte offsets of each object family are compiled in here. Every heap object
//! starts with the basic header (flags word, class word); the type-specific
//! payload follows at [`OFF_PAYLOAD`].
//!
//! The `abi` submodule carries the canonical numeric values of the named
//! constants for the interpreter version this decoder targets. The decoder
//! itself never reads them directly (constants always come through the
//! gateway, which may serve a different build of the interpreter); they exist
//! so that fixtures and host integrations can publish a coherent constant
//! table.

/// Offset of the flags word in the basic header.
pub const OFF_FLAGS: u64 = 0;
/// Offset of the class word in the basic header.
pub const OFF_KLASS: u64 = 8;
/// Offset of the type-specific payload word: string/array/struct length,
/// hash entry count, float bits, bignum digit count, symbol name string.
pub const OFF_PAYLOAD: u64 = 16;
/// Offset of the body: inline data for embedded encodings, or the
/// out-of-line buffer pointer for heap encodings.
pub const OFF_BODY: u64 = 24;

/// Offset of the slot bound inside a hash table descriptor.
pub const TBL_OFF_BOUND: u64 = 0;
/// Offset of the entries-base pointer inside a hash table descriptor.
pub const TBL_OFF_ENTRIES: u64 = 8;
/// Stride of one table entry: (hash, key, value) word triple.
pub const TBL_ENTRY_STRIDE: u64 = 24;

/// Canonical constant values for the targeted interpreter version.
pub mod abi {
    pub const Q_FALSE: u64 = 0x00;
    pub const Q_NIL: u64 = 0x08;
    pub const Q_TRUE: u64 = 0x14;
    pub const Q_UNDEF: u64 = 0x34;

    pub const FIXNUM_FLAG: u64 = 0x01;
    pub const FLONUM_MASK: u64 = 0x03;
    pub const FLONUM_FLAG: u64 = 0x02;
    pub const SYMBOL_FLAG: u64 = 0x0c;

    pub const T_MASK: u64 = 0x1f;

    pub const T_NONE: u64 = 0x00;
    pub const T_OBJECT: u64 = 0x01;
    pub const T_CLASS: u64 = 0x02;
    pub const T_MODULE: u64 = 0x03;
    pub const T_FLOAT: u64 = 0x04;
    pub const T_STRING: u64 = 0x05;
    pub const T_REGEXP: u64 = 0x06;
    pub const T_ARRAY: u64 = 0x07;
    pub const T_HASH: u64 = 0x08;
    pub const T_STRUCT: u64 = 0x09;
    pub const T_BIGNUM: u64 = 0x0a;
    pub const T_FILE: u64 = 0x0b;
    pub const T_DATA: u64 = 0x0c;
    pub const T_MATCH: u64 = 0x0d;
    pub const T_COMPLEX: u64 = 0x0e;
    pub const T_RATIONAL: u64 = 0x0f;
    pub const T_NIL: u64 = 0x11;
    pub const T_TRUE: u64 = 0x12;
    pub const T_FALSE: u64 = 0x13;
    pub const T_SYMBOL: u64 = 0x14;
    pub const T_FIXNUM: u64 = 0x15;
    pub const T_UNDEF: u64 = 0x16;
    pub const T_IMEMO: u64 = 0x1a;
    pub const T_NODE: u64 = 0x1b;
    pub const T_ICLASS: u64 = 0x1c;
    pub const T_ZOMBIE: u64 = 0x1d;

    /// Set when the object's body is an out-of-line buffer pointer instead
    /// of inline data. Shared bit position across strings, arrays, structs
    /// and bignums.
    pub const FL_NOEMBED: u64 = 1 << 13;
    /// Set on bignums with a non-negative magnitude.
    pub const FL_BIGNUM_POSITIVE: u64 = 1 << 14;

    /// Largest entry count stored in the compact (array-backed) hash
    /// encoding. Hashes with this many entries or more use the table
    /// encoding.
    pub const AR_TABLE_MAX_SIZE: u64 = 8;
}
