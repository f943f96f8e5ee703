//! Server-Sent-Events token stream decoder
//!
//! Consumes a chunked byte stream framed as newline-delimited
//! `data: {...}` lines and dispatches each event to a `StreamHandler`.
//!
//! ## State machine
//!
//! ```text
//! Streaming ──chunk──▶ decode UTF-8 ─▶ split lines ─▶ dispatch (in order)
//!     │                                                 │
//!     ├── end of input ──────────▶ Done (partial line dropped, on_complete)
//!     ├── {"type":"done"} ───────▶ Done (on_complete, stop reading)
//!     ├── {"type":"error"} ──────▶ Failed (on_error, stop reading)
//!     └── transport error ───────▶ Failed (on_error, stop reading)
//! ```
//!
//! Unparsable lines are logged and skipped; unknown event types are
//! ignored. No retries and no timeouts: the transport owns both.

mod callbacks;
mod event;
mod line;

pub use callbacks::JsCallbacks;
pub use event::{parse_line, ParsedLine, StreamEvent, DATA_PREFIX, KNOWN_EVENT_TYPES};
pub use line::{LineDecoder, Utf8Decoder};

use futures::{pin_mut, Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Receives decoded events. Calls never overlap for one decoder.
pub trait StreamHandler {
    fn on_token(&mut self, content: &str);
    fn on_sources(&mut self, sources: &Value);
    fn on_thinking(&mut self, _content: &str) {}
    fn on_final_response(&mut self, _content: &str) {}
    fn on_complete(&mut self);
    fn on_error(&mut self, message: &str);
}

/// Why the decoder stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A `done` event arrived.
    Completed,
    /// The source ran dry without a `done` event.
    EndOfInput,
    /// The server sent an `error` event.
    ServerError,
    /// The transport failed before or during the stream.
    TransportFailed,
}

/// Summary of one decoded stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamOutcome {
    pub termination: Termination,
    pub chunks: usize,
    pub lines: usize,
    pub events: usize,
    /// `data:` lines that failed to parse.
    pub skipped: usize,
}

impl StreamOutcome {
    pub fn transport_failed() -> Self {
        Self {
            termination: Termination::TransportFailed,
            chunks: 0,
            lines: 0,
            events: 0,
            skipped: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.termination, Termination::Completed | Termination::EndOfInput)
    }
}

/// Per-stream decoder state. One instance drives exactly one stream.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    lines: LineDecoder,
    chunks: usize,
    line_count: usize,
    events: usize,
    skipped: usize,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk and dispatch every complete line.
    ///
    /// Returns the termination if a terminal event was dispatched; lines
    /// after it in the same chunk are not processed.
    pub fn push_chunk<H: StreamHandler + ?Sized>(&mut self, chunk: &[u8], handler: &mut H) -> Option<Termination> {
        self.chunks += 1;
        for line in self.lines.feed(chunk) {
            self.line_count += 1;
            if let Some(termination) = self.dispatch_line(&line, handler) {
                self.lines.discard();
                return Some(termination);
            }
        }
        None
    }

    fn dispatch_line<H: StreamHandler + ?Sized>(&mut self, line: &str, handler: &mut H) -> Option<Termination> {
        let event = match parse_line(line) {
            ParsedLine::Event(event) => event,
            ParsedLine::Ignored => return None,
            ParsedLine::Unknown(kind) => {
                log::debug!("Ignoring unknown stream event type: {}", kind);
                return None;
            }
            ParsedLine::Invalid(reason) => {
                log::warn!("Skipping unparsable stream line ({}): {}", reason, line);
                self.skipped += 1;
                return None;
            }
        };

        self.events += 1;
        match event {
            StreamEvent::Token { content } => handler.on_token(&content),
            StreamEvent::Sources { sources } => handler.on_sources(&sources),
            StreamEvent::Thinking { content } => handler.on_thinking(&content),
            StreamEvent::FinalResponse { content } => handler.on_final_response(&content),
            StreamEvent::Done => {
                handler.on_complete();
                return Some(Termination::Completed);
            }
            StreamEvent::Error { message } => {
                handler.on_error(&message);
                return Some(Termination::ServerError);
            }
        }
        None
    }

    /// Signal end of input. Any buffered partial line is dropped.
    pub fn finish<H: StreamHandler + ?Sized>(&mut self, handler: &mut H) -> Termination {
        let dropped = self.lines.discard();
        if !dropped.is_empty() {
            log::debug!("Discarding unterminated trailing line ({} bytes)", dropped.len());
        }
        handler.on_complete();
        Termination::EndOfInput
    }

    /// Report a transport failure and stop.
    pub fn fail<H: StreamHandler + ?Sized>(&mut self, message: &str, handler: &mut H) -> Termination {
        log::error!("Stream transport failed: {}", message);
        self.lines.discard();
        handler.on_error(message);
        Termination::TransportFailed
    }

    fn outcome(&self, termination: Termination) -> StreamOutcome {
        StreamOutcome {
            termination,
            chunks: self.chunks,
            lines: self.line_count,
            events: self.events,
            skipped: self.skipped,
        }
    }

    /// Drive `source` to completion.
    ///
    /// The source is not polled again after a terminal event or error.
    pub async fn run<S, B, E, H>(mut self, source: S, handler: &mut H) -> StreamOutcome
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
        H: StreamHandler + ?Sized,
    {
        pin_mut!(source);
        let termination = loop {
            match source.next().await {
                Some(Ok(chunk)) => {
                    if let Some(termination) = self.push_chunk(chunk.as_ref(), handler) {
                        break termination;
                    }
                }
                Some(Err(e)) => break self.fail(&e.to_string(), handler),
                None => break self.finish(handler),
            }
        };
        self.outcome(termination)
    }
}

/// Decode `source` with a fresh decoder.
pub async fn decode_stream<S, B, E, H>(source: S, handler: &mut H) -> StreamOutcome
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    H: StreamHandler + ?Sized,
{
    EventStreamDecoder::new().run(source, handler).await
}
