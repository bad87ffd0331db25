//! Per-invocation decode state: the gateway handle, the constant cache, and
//! the trace sink. Every classifier and decoder call threads a `Session`
//! through, the way formatting threads a type registry in larger IRs.

use crate::constants::ConstantPool;
use crate::gateway::{Gateway, WORD_SIZE};
use crate::trace::{Trace, TraceEvent};
use crate::utils::Result;

pub struct Session<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
    constants: ConstantPool,
    trace: Trace,
}

impl<'a, G: Gateway + ?Sized> Session<'a, G> {
    pub fn new(gateway: &'a G, trace_enabled: bool) -> Self {
        Self {
            gateway,
            constants: ConstantPool::default(),
            trace: Trace::new(trace_enabled),
        }
    }

    /// Resolve a named constant, cached for the rest of this invocation.
    pub fn constant(&mut self, name: &'static str) -> Result<u64> {
        self.constants.get(self.gateway, &mut self.trace, name)
    }

    pub fn evaluate(&mut self, expression: &str) -> Result<u64> {
        let word = self.gateway.evaluate(expression)?;
        self.trace.record(TraceEvent::Evaluated {
            expression: expression.to_owned(),
            word,
        });
        Ok(word)
    }

    pub fn read_word(&mut self, address: u64) -> Result<u64> {
        let word = self.gateway.read_word(address)?;
        self.trace.record(TraceEvent::MemoryRead {
            address,
            size: WORD_SIZE,
        });
        Ok(word)
    }

    pub fn read_memory(&mut self, address: u64, size: usize) -> Result<Vec<u8>> {
        let bytes = self.gateway.read_memory(address, size)?;
        self.trace.record(TraceEvent::MemoryRead { address, size });
        Ok(bytes)
    }

    pub fn trace(&mut self) -> &mut Trace {
        &mut self.trace
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }
}
