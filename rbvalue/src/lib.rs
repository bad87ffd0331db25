//! Decoding of a running Ruby interpreter's tagged values from outside the
//! process.
//!
//! Everything the decoder knows about the target comes through the
//! [`Gateway`] capability: expression evaluation, raw memory reads, and
//! named constant lookups. On top of that it replicates the interpreter's
//! own rules for distinguishing immediates from heap pointers, reading
//! object headers, and walking the dual physical encodings of the hash and
//! array families, producing a depth-bounded node tree and its textual
//! rendering.

pub mod classify;
pub mod constants;
pub mod decode;
mod fmt;
pub mod gateway;
pub mod inspect;
pub mod layout;
pub mod session;
pub mod trace;
pub mod utils;

pub use classify::{Classification, HeapKind, Immediate, classify};
pub use decode::{Children, DecodedNode, NodeValue, decode};
pub use gateway::Gateway;
pub use inspect::{InspectOptions, Inspection, inspect, inspect_many, inspect_word};
pub use session::Session;
pub use trace::TraceEvent;
pub use utils::{Error, Result};
