//! Top-level invocation surface.
//!
//! One call evaluates (or takes) a tagged word, decodes it under a depth
//! budget, and renders the tree. Each invocation is independent: a fresh
//! session, constant cache, and trace, nothing shared across calls.

use crate::decode::{DecodedNode, decode};
use crate::gateway::Gateway;
use crate::session::Session;
use crate::trace::TraceEvent;
use crate::utils::Result;

#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Maximum number of container levels expanded below the root. Depth 0
    /// degenerates to the root header alone.
    pub depth: u32,
    /// Record the diagnostic event sequence. Has no effect on the rendered
    /// text.
    pub trace: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            depth: 1,
            trace: false,
        }
    }
}

/// The result of one inspection: the rendered text, the decoded tree it was
/// rendered from, and the trace events (empty unless tracing was enabled).
#[derive(Debug)]
pub struct Inspection {
    pub text: String,
    pub root: DecodedNode,
    pub trace: Vec<TraceEvent>,
}

/// Evaluate `expression` in the target and render the resulting value.
pub fn inspect<G: Gateway + ?Sized>(
    gateway: &G,
    expression: &str,
    options: &InspectOptions,
) -> Result<Inspection> {
    let mut session = Session::new(gateway, options.trace);
    let word = session.evaluate(expression)?;
    finish(session, word, options.depth)
}

/// Render a raw tagged word, for callers that already hold one (heap
/// scanners, stack walkers).
pub fn inspect_word<G: Gateway + ?Sized>(
    gateway: &G,
    word: u64,
    options: &InspectOptions,
) -> Result<Inspection> {
    let session = Session::new(gateway, options.trace);
    finish(session, word, options.depth)
}

/// Inspect several expressions in order. A failure is localized to its
/// expression; the remaining expressions are still inspected.
pub fn inspect_many<'e, G: Gateway + ?Sized>(
    gateway: &G,
    expressions: impl IntoIterator<Item = &'e str>,
    options: &InspectOptions,
) -> Vec<(String, Result<Inspection>)> {
    expressions
        .into_iter()
        .map(|expression| {
            (
                expression.to_owned(),
                inspect(gateway, expression, options),
            )
        })
        .collect()
}

fn finish<G: Gateway + ?Sized>(
    mut session: Session<'_, G>,
    word: u64,
    depth: u32,
) -> Result<Inspection> {
    log::debug!("decoding word 0x{word:x} with depth budget {depth}");
    let root = decode(&mut session, word, depth)?;
    let text = root.fmt().to_string();
    Ok(Inspection {
        text,
        root,
        trace: session.into_trace().into_events(),
    })
}
