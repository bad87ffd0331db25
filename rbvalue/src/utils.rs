use strum::EnumIs;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// The gateway could not evaluate the requested expression. Nothing can
    /// be rendered, so this aborts the whole invocation.
    #[error("failed to evaluate expression `{expression}`: {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// A header or field read failed, e.g. the address is unmapped. When it
    /// occurs below the root, the failing node renders as a placeholder and
    /// siblings are unaffected.
    #[error("cannot read {size} bytes at 0x{address:x}")]
    UnreadableMemory { address: u64, size: usize },

    /// A heap header carries a tag outside the interpreter's closed tag set.
    /// Indicates an interpreter-version mismatch or true corruption.
    #[error("object header at 0x{address:x} carries unrecognized type tag 0x{tag:x}")]
    UnknownTypeTag { address: u64, tag: u64 },

    /// A named constant required for classification is not defined in the
    /// target. Classification is impossible without the tag masks, so this
    /// aborts the invocation.
    #[error("required constant `{name}` is not defined in the target")]
    MissingConstant { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
