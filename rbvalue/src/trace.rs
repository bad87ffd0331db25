//! Diagnostics side channel.
//!
//! One [`Trace`] lives for one invocation and records every decoding decision
//! in the order it was taken: expressions evaluated, constants loaded, memory
//! reads, header reads, classifications. Events interleave with the decode
//! steps that produced them, so an output line can be matched to the exact
//! steps behind it. Disabling the trace has no effect on decoding results.

use strum::EnumIs;

#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum TraceEvent {
    /// An expression was evaluated by the gateway.
    Evaluated { expression: String, word: u64 },
    /// A named constant was resolved (first use in this invocation).
    ConstantLoaded { name: &'static str, value: u64 },
    /// Raw bytes were read from the target.
    MemoryRead { address: u64, size: usize },
    /// An object header was read and its tag extracted.
    HeaderRead { address: u64, flags: u64, tag: u64 },
    /// A dual-encoding container committed to one physical reader.
    EncodingSelected { address: u64, encoding: &'static str },
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEvent::Evaluated { expression, word } => {
                write!(f, "eval `{expression}` -> 0x{word:x}")
            }
            TraceEvent::ConstantLoaded { name, value } => {
                write!(f, "constant {name} = 0x{value:x}")
            }
            TraceEvent::MemoryRead { address, size } => {
                write!(f, "read {size} bytes at 0x{address:x}")
            }
            TraceEvent::HeaderRead { address, flags, tag } => {
                write!(f, "header at 0x{address:x}: flags=0x{flags:x} tag=0x{tag:x}")
            }
            TraceEvent::EncodingSelected { address, encoding } => {
                write!(f, "object at 0x{address:x} uses {encoding} encoding")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Trace {
    enabled: bool,
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, event: TraceEvent) {
        log::trace!("{event}");
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}
