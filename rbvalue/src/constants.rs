//! Named interpreter constants and the per-invocation lookup cache.

use std::collections::BTreeMap;

use crate::gateway::Gateway;
use crate::trace::{Trace, TraceEvent};
use crate::utils::Result;

pub const Q_FALSE: &str = "RUBY_Qfalse";
pub const Q_NIL: &str = "RUBY_Qnil";
pub const Q_TRUE: &str = "RUBY_Qtrue";
pub const Q_UNDEF: &str = "RUBY_Qundef";

pub const FIXNUM_FLAG: &str = "RUBY_FIXNUM_FLAG";
pub const FLONUM_MASK: &str = "RUBY_FLONUM_MASK";
pub const FLONUM_FLAG: &str = "RUBY_FLONUM_FLAG";
pub const SYMBOL_FLAG: &str = "RUBY_SYMBOL_FLAG";

pub const T_MASK: &str = "RUBY_T_MASK";

pub const FL_NOEMBED: &str = "RUBY_FL_NOEMBED";
pub const FL_BIGNUM_POSITIVE: &str = "RUBY_FL_BIGNUM_POSITIVE";
pub const AR_TABLE_MAX_SIZE: &str = "RUBY_HASH_AR_TABLE_MAX_SIZE";

/// Caches gateway constant lookups for the duration of one invocation, so
/// each named constant is fetched (and traced) at most once per decode.
#[derive(Debug, Default)]
pub struct ConstantPool {
    cache: BTreeMap<&'static str, u64>,
}

impl ConstantPool {
    pub fn get<G: Gateway + ?Sized>(
        &mut self,
        gateway: &G,
        trace: &mut Trace,
        name: &'static str,
    ) -> Result<u64> {
        if let Some(value) = self.cache.get(name) {
            return Ok(*value);
        }
        let value = gateway.lookup_constant(name)?;
        trace.record(TraceEvent::ConstantLoaded { name, value });
        self.cache.insert(name, value);
        Ok(value)
    }
}
