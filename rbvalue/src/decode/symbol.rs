//! Symbol name resolution.
//!
//! Dynamic symbols are heap objects whose payload word holds the name string.
//! Static symbols carry only a numeric id in their immediate bits; the target
//! is asked to resolve it via `rb_id2str`, and when it cannot (a minimal core
//! dump has no evaluator for calls) the numeric id is rendered instead.

use crate::decode::{soften, string};
use crate::gateway::Gateway;
use crate::layout;
use crate::session::Session;
use crate::utils::{Error, Result};

/// Read the name of a dynamic (heap) symbol. `Ok(None)` when the name string
/// cannot be read; only gateway-level aborts propagate as `Err`.
pub fn dynamic_name<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
) -> Result<Option<Vec<u8>>> {
    match soften(session.read_word(address + layout::OFF_PAYLOAD))? {
        Some(fstr) => name_from_string_word(session, fstr),
        None => Ok(None),
    }
}

/// Resolve a static symbol id to its name through the target's evaluator.
pub fn static_name<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    id: u64,
) -> Result<Option<Vec<u8>>> {
    let expression = format!("rb_id2str({id})");
    let word = match session.evaluate(&expression) {
        Ok(word) => word,
        Err(Error::InvalidExpression { .. }) => {
            log::debug!("target cannot resolve static symbol id {id}");
            return Ok(None);
        }
        Err(error) => return Err(error),
    };
    name_from_string_word(session, word)
}

fn name_from_string_word<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    word: u64,
) -> Result<Option<Vec<u8>>> {
    match soften(session.read_word(word))? {
        Some(flags) => soften(string::read_bytes(session, word, flags)),
        None => Ok(None),
    }
}
