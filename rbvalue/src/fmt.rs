//! Text rendering of decoded node trees.
//!
//! The grammar is bit-exact; snapshots of the output are compared
//! line-by-line. Immediates render as `<KIND>` or `<KIND> value`, heap
//! values as `<KIND@0xADDR>` with scalar leaves appending their rendering.
//! Array and struct children render as `[ N] CHILD` lines with the index
//! right-aligned; hash entries take two lines, `[ N] K: KEY` and a
//! `V: VALUE` line aligned beneath the key. Each nesting level indents by
//! two further spaces.

use crate::classify::Immediate;
use crate::decode::{Children, DecodedNode, NodeValue, string};

impl DecodedNode {
    /// Build a formatting helper that renders the tree in textual form.
    pub fn fmt(&self) -> impl std::fmt::Display + '_ {
        struct Fmt<'a> {
            node: &'a DecodedNode,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write_node(f, self.node, 0)
            }
        }

        Fmt { node: self }
    }
}

fn write_node(
    f: &mut std::fmt::Formatter<'_>,
    node: &DecodedNode,
    level: usize,
) -> std::fmt::Result {
    write_value(f, &node.value)?;
    let indent = 2 * (level + 1);
    match &node.children {
        Children::Unexpanded => Ok(()),
        Children::Elements(elements) => {
            let width = index_width(elements.len());
            for (index, child) in elements.iter().enumerate() {
                writeln!(f)?;
                write!(f, "{:indent$}[{index:>width$}] ", "")?;
                write_node(f, child, level + 1)?;
            }
            Ok(())
        }
        Children::Entries(entries) => {
            let width = index_width(entries.len());
            // "[ N] " ahead of the key; the value line pads by the same
            // amount so K: and V: line up.
            let pad = width + 3;
            for (index, (key, value)) in entries.iter().enumerate() {
                writeln!(f)?;
                write!(f, "{:indent$}[{index:>width$}] K: ", "")?;
                write_node(f, key, level + 1)?;
                writeln!(f)?;
                write!(f, "{:indent$}{:pad$}V: ", "", "")?;
                write_node(f, value, level + 1)?;
            }
            Ok(())
        }
    }
}

fn write_value(f: &mut std::fmt::Formatter<'_>, value: &NodeValue) -> std::fmt::Result {
    match value {
        NodeValue::Immediate(immediate) => match immediate {
            Immediate::False => write!(f, "<T_FALSE>"),
            Immediate::Nil => write!(f, "<T_NIL>"),
            Immediate::True => write!(f, "<T_TRUE>"),
            Immediate::Undef => write!(f, "<T_UNDEF>"),
            Immediate::Fixnum(value) => write!(f, "<T_FIXNUM> {value}"),
            Immediate::Flonum(value) => write!(f, "<T_FLOAT> {value:?}"),
            Immediate::StaticSymbol(id) => write!(f, "<T_SYMBOL> {id}"),
        },
        NodeValue::StaticSymbol { id, name } => match name {
            Some(name) => write!(f, "<T_SYMBOL> :{}", String::from_utf8_lossy(name)),
            None => write!(f, "<T_SYMBOL> {id}"),
        },
        NodeValue::HeapSymbol { address, name } => match name {
            Some(name) => write!(
                f,
                "<T_SYMBOL@0x{address:x}> :{}",
                String::from_utf8_lossy(name)
            ),
            None => write!(f, "<T_SYMBOL@0x{address:x}>"),
        },
        NodeValue::Str { address, bytes } => {
            write!(f, "<T_STRING@0x{address:x}> {}", string::quote(bytes))
        }
        NodeValue::Float { address, value } => {
            write!(f, "<T_FLOAT@0x{address:x}> {value:?}")
        }
        NodeValue::Bignum { address, value } => {
            write!(f, "<T_BIGNUM@0x{address:x}> {value}")
        }
        NodeValue::Container { kind, address } | NodeValue::Opaque { kind, address } => {
            write!(f, "<{}@0x{address:x}>", kind.tag_name())
        }
        NodeValue::Unreadable { address } => write!(f, "<UNREADABLE@0x{address:x}>"),
        NodeValue::UnknownTag { address, tag } => {
            write!(f, "<Unknown(0x{tag:x})@0x{address:x}>")
        }
    }
}

/// Width of the index field: at least two columns, growing for containers
/// with 100 or more children.
fn index_width(len: usize) -> usize {
    let mut digits = 1;
    let mut rest = len.saturating_sub(1);
    while rest >= 10 {
        digits += 1;
        rest /= 10;
    }
    digits.max(2)
}
