//! Classification of a single tagged word.
//!
//! Immediates are recognized from the word's low-order bits alone, with no
//! memory access. Anything else is treated as a heap pointer: the header word
//! is read, the type tag extracted with the tag mask, and the numeric tag
//! matched exhaustively against the interpreter's closed tag set. An
//! unrecognized tag and an unreadable header are both first-class
//! classifications, not failures.

use strum::{EnumIs, EnumIter, IntoEnumIterator};

use crate::constants;
use crate::gateway::Gateway;
use crate::session::Session;
use crate::trace::TraceEvent;
use crate::utils::{Error, Result};

/// An unboxed value encoded entirely in the word's bits.
#[derive(Debug, Clone, Copy, PartialEq, EnumIs)]
pub enum Immediate {
    False,
    Nil,
    True,
    Undef,
    Fixnum(i64),
    Flonum(f64),
    StaticSymbol(u64),
}

/// Logical type of a heap object, as named by its header tag.
///
/// The set is closed and versioned by the interpreter; the variants cover
/// every tag the targeted version can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, EnumIter)]
pub enum HeapKind {
    None,
    Object,
    Class,
    Module,
    Float,
    String,
    Regexp,
    Array,
    Hash,
    Struct,
    Bignum,
    File,
    Data,
    Match,
    Complex,
    Rational,
    Nil,
    True,
    False,
    Symbol,
    Fixnum,
    Undef,
    Imemo,
    Node,
    IClass,
    Zombie,
}

impl HeapKind {
    /// Name of the debugger constant carrying this tag's numeric value.
    pub const fn constant_name(self) -> &'static str {
        match self {
            Self::None => "RUBY_T_NONE",
            Self::Object => "RUBY_T_OBJECT",
            Self::Class => "RUBY_T_CLASS",
            Self::Module => "RUBY_T_MODULE",
            Self::Float => "RUBY_T_FLOAT",
            Self::String => "RUBY_T_STRING",
            Self::Regexp => "RUBY_T_REGEXP",
            Self::Array => "RUBY_T_ARRAY",
            Self::Hash => "RUBY_T_HASH",
            Self::Struct => "RUBY_T_STRUCT",
            Self::Bignum => "RUBY_T_BIGNUM",
            Self::File => "RUBY_T_FILE",
            Self::Data => "RUBY_T_DATA",
            Self::Match => "RUBY_T_MATCH",
            Self::Complex => "RUBY_T_COMPLEX",
            Self::Rational => "RUBY_T_RATIONAL",
            Self::Nil => "RUBY_T_NIL",
            Self::True => "RUBY_T_TRUE",
            Self::False => "RUBY_T_FALSE",
            Self::Symbol => "RUBY_T_SYMBOL",
            Self::Fixnum => "RUBY_T_FIXNUM",
            Self::Undef => "RUBY_T_UNDEF",
            Self::Imemo => "RUBY_T_IMEMO",
            Self::Node => "RUBY_T_NODE",
            Self::IClass => "RUBY_T_ICLASS",
            Self::Zombie => "RUBY_T_ZOMBIE",
        }
    }

    /// Display tag used in rendered headers, e.g. `T_STRING`.
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::None => "T_NONE",
            Self::Object => "T_OBJECT",
            Self::Class => "T_CLASS",
            Self::Module => "T_MODULE",
            Self::Float => "T_FLOAT",
            Self::String => "T_STRING",
            Self::Regexp => "T_REGEXP",
            Self::Array => "T_ARRAY",
            Self::Hash => "T_HASH",
            Self::Struct => "T_STRUCT",
            Self::Bignum => "T_BIGNUM",
            Self::File => "T_FILE",
            Self::Data => "T_DATA",
            Self::Match => "T_MATCH",
            Self::Complex => "T_COMPLEX",
            Self::Rational => "T_RATIONAL",
            Self::Nil => "T_NIL",
            Self::True => "T_TRUE",
            Self::False => "T_FALSE",
            Self::Symbol => "T_SYMBOL",
            Self::Fixnum => "T_FIXNUM",
            Self::Undef => "T_UNDEF",
            Self::Imemo => "T_IMEMO",
            Self::Node => "T_NODE",
            Self::IClass => "T_ICLASS",
            Self::Zombie => "T_ZOMBIE",
        }
    }
}

/// The classification of one tagged word.
///
/// A pure function of the word's bits and the header it points to; heap
/// classifications keep the header flags so decoders need not re-read them.
#[derive(Debug, Clone, Copy, PartialEq, EnumIs)]
pub enum Classification {
    Immediate(Immediate),
    Heap {
        kind: HeapKind,
        address: u64,
        flags: u64,
    },
    Unreadable {
        address: u64,
    },
    UnknownTag {
        address: u64,
        tag: u64,
    },
}

/// Decode the immediate float encoding.
///
/// The interpreter stores flonum-range doubles rotated left by three with the
/// low two bits replaced by the flonum tag; zero gets a dedicated pattern.
/// This is the inverse rotation.
pub fn flonum_value(word: u64) -> f64 {
    if word == 0x8000_0000_0000_0002 {
        return 0.0;
    }
    let b63 = word >> 63;
    f64::from_bits((2u64.wrapping_sub(b63) | (word & !3)).rotate_right(3))
}

/// Classify one tagged word.
///
/// Immediate patterns are checked first and perform no memory access. Only
/// [`Error::MissingConstant`] (and other gateway-level failures on the
/// constant surface) propagate; unreadable headers and unrecognized tags
/// come back as `Ok` classifications.
pub fn classify<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    word: u64,
) -> Result<Classification> {
    if word == session.constant(constants::Q_FALSE)? {
        return Ok(Classification::Immediate(Immediate::False));
    }
    if word == session.constant(constants::Q_NIL)? {
        return Ok(Classification::Immediate(Immediate::Nil));
    }
    if word == session.constant(constants::Q_TRUE)? {
        return Ok(Classification::Immediate(Immediate::True));
    }
    if word == session.constant(constants::Q_UNDEF)? {
        return Ok(Classification::Immediate(Immediate::Undef));
    }
    if word & session.constant(constants::FIXNUM_FLAG)? != 0 {
        return Ok(Classification::Immediate(Immediate::Fixnum(
            (word as i64) >> 1,
        )));
    }
    if word & session.constant(constants::FLONUM_MASK)?
        == session.constant(constants::FLONUM_FLAG)?
    {
        return Ok(Classification::Immediate(Immediate::Flonum(flonum_value(
            word,
        ))));
    }
    if word & 0xff == session.constant(constants::SYMBOL_FLAG)? {
        return Ok(Classification::Immediate(Immediate::StaticSymbol(
            word >> 8,
        )));
    }

    // Heap pointer. A failed header read is a visible classification, not an
    // abort.
    let flags = match session.read_word(word) {
        Ok(flags) => flags,
        Err(Error::UnreadableMemory { .. }) => {
            log::debug!("header read failed at 0x{word:x}");
            return Ok(Classification::Unreadable { address: word });
        }
        Err(error) => return Err(error),
    };
    let tag = flags & session.constant(constants::T_MASK)?;
    session.trace().record(TraceEvent::HeaderRead {
        address: word,
        flags,
        tag,
    });

    for kind in HeapKind::iter() {
        if session.constant(kind.constant_name())? == tag {
            return Ok(Classification::Heap {
                kind,
                address: word,
                flags,
            });
        }
    }
    log::debug!("unrecognized type tag 0x{tag:x} at 0x{word:x}");
    Ok(Classification::UnknownTag { address: word, tag })
}
