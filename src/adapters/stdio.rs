//! Line-oriented stdio adapters for running the controller standalone.
//!
//! - [`LineStates`] reads one state per line (`idle`, `teardown welcome`).
//!   Unrecognised lines are logged and skipped; end of input closes the
//!   stream.
//! - [`JsonLinesEvents`] writes one JSON object per outbound event:
//!   `{"target":"master","event":"trigger"}`.

use std::io::{BufRead, Write};
use std::sync::Mutex;

use log::warn;
use serde::Serialize;

use crate::app::events::{AppEvent, Worker};
use crate::app::ports::{ChannelError, EventSender, StateSource};
use crate::app::states::State;

pub struct LineStates<R: BufRead> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineStates<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> StateSource for LineStates<R> {
    fn recv_state(&mut self) -> Result<State, ChannelError> {
        loop {
            self.line.clear();
            let n = self.reader.read_line(&mut self.line).map_err(|e| {
                warn!("states: read failed: {}", e);
                ChannelError::Io
            })?;
            if n == 0 {
                return Err(ChannelError::Closed);
            }

            let text = self.line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            match text.parse() {
                Ok(state) => return Ok(state),
                Err(e) => warn!("states: {}", e),
            }
        }
    }
}

#[derive(Serialize)]
struct Envelope {
    target: Worker,
    event: AppEvent,
}

pub struct JsonLinesEvents<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesEvents<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send + 'static> EventSender for JsonLinesEvents<W> {
    fn send(&self, target: Worker, event: AppEvent) -> Result<(), ChannelError> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let envelope = Envelope { target, event };
        serde_json::to_writer(&mut *out, &envelope).map_err(|_| ChannelError::Io)?;
        out.write_all(b"\n").map_err(|_| ChannelError::Io)?;
        out.flush().map_err(|_| ChannelError::Io)
    }
}
