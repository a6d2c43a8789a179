//! Ambient tracing (`spec.md` §9 ambient stack: logging/diagnostics).
//!
//! Encode/decode failures already carry a readable message via
//! [`crate::error::EncodeError`]/[`crate::error::DecodeError`]; this module
//! is for callers who want a structured trace of *successful* traversal
//! too — which field was being decoded, how many bytes a TLV unit
//! consumed — the way a production decoder logs at `trace`/`debug` level
//! without a caller having to thread a channel through every function.

use crate::codec::Codec;
use crate::tag::Identifier;

/// One point of interest during encode/decode. Kept small and `Copy`-able
/// where possible since a hot decode loop may emit many of these.
#[derive(Debug, Clone)]
pub enum Event<'a> {
    /// A TLV unit's identifier and content length were read.
    TlvRead {
        identifier: Identifier,
        content_len: usize,
        codec: Codec,
    },
    /// An OPTIONAL/DEFAULT element elided (consumed zero bytes).
    Elided { name: Option<&'a str> },
    /// A CHOICE alternative was selected.
    ChoiceSelected { name: &'a str },
}

/// A sink for [`Event`]s. The default, no-op implementation is what every
/// encode/decode path uses unless a caller installs a different one via
/// [`set_tracer`]; this keeps the hot path free of formatting work when
/// nobody is listening.
pub trait Tracer: Send + Sync {
    fn record(&self, event: &Event<'_>);
}

struct NoopTracer;

impl Tracer for NoopTracer {
    fn record(&self, _event: &Event<'_>) {}
}

/// Emits `event` through `tracing`'s `trace!` macro, the way the rest of
/// this crate's ambient stack does structured logging.
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn record(&self, event: &Event<'_>) {
        match event {
            Event::TlvRead { identifier, content_len, codec } => {
                tracing::trace!(
                    class = ?identifier.class(),
                    number = identifier.number(),
                    constructed = identifier.constructed,
                    content_len,
                    %codec,
                    "read TLV unit"
                );
            }
            Event::Elided { name } => {
                tracing::trace!(name, "element elided (zero bytes consumed)");
            }
            Event::ChoiceSelected { name } => {
                tracing::trace!(name, "CHOICE alternative selected");
            }
        }
    }
}

static TRACER: std::sync::OnceLock<Box<dyn Tracer>> = std::sync::OnceLock::new();

/// Installs the process-wide tracer. Only the first call takes effect,
/// matching `std::sync::OnceLock`'s semantics; callers typically do this
/// once during application startup.
pub fn set_tracer(tracer: Box<dyn Tracer>) {
    let _ = TRACER.set(tracer);
}

/// Records `event` through the installed tracer, or drops it silently if
/// none has been installed.
pub fn record(event: Event<'_>) {
    if let Some(tracer) = TRACER.get() {
        tracer.record(&event);
    }
}
