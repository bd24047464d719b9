//! Controller session
//!
//! Owns the one [`MachineState`] and the transport. Every operator action
//! goes through [`Controller::dispatch`], which translates the intent and
//! writes its payloads in order.

use tokio::io::AsyncWrite;
use tokio::sync::watch;

use crate::command::{Intent, MachineState, Translator};
use crate::error::{Error, Result};
use crate::feedback::Position;
use crate::job::Job;
use crate::parser::{ParsedLine, parse_line};
use crate::transport::Transport;

pub struct Controller<W> {
    state: MachineState,
    translator: Translator,
    transport: Transport<W>,
    halted: bool,
    positions: Option<watch::Receiver<Option<Position>>>,
}

impl<W: AsyncWrite + Unpin> Controller<W> {
    pub fn new(state: MachineState, translator: Translator, transport: Transport<W>) -> Self {
        Self {
            state,
            translator,
            transport,
            halted: false,
            positions: None,
        }
    }

    /// Follow position reports published by a feedback reader
    pub fn with_positions(mut self, positions: watch::Receiver<Option<Position>>) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Allow commands again after an emergency stop
    pub fn resume(&mut self) {
        if self.halted {
            log::info!("resuming after emergency stop");
        }
        self.halted = false;
    }

    /// Translate and send one intent, returning the payloads written.
    ///
    /// After an Abort, or a raw M112, nothing else is sent until
    /// [`Controller::resume`].
    pub async fn dispatch(&mut self, intent: Intent) -> Result<Vec<String>> {
        if self.halted {
            log::warn!("dropping {intent:?}: machine halted");
            return Err(Error::Halted);
        }

        let payloads = match self.translator.translate(&mut self.state, &intent) {
            Ok(payloads) => payloads,
            Err(e) => {
                log::warn!("rejected {intent:?}: {e}");
                return Err(e);
            }
        };

        if is_emergency_stop(&intent) {
            self.halted = true;
        }

        for payload in &payloads {
            self.transport.send(payload).await?;
        }

        Ok(payloads)
    }

    /// Send every job line as a raw command, in file order
    pub async fn stream_job(&mut self, job: &Job) -> Result<usize> {
        let mut sent = 0;
        for line in job.lines() {
            sent += self.dispatch(Intent::SendRaw(line.text.clone())).await?.len();
        }
        Ok(sent)
    }

    /// Apply the newest position report, if one arrived since the last call
    pub fn refresh_position(&mut self) -> bool {
        let Some(positions) = self.positions.as_mut() else {
            return false;
        };
        if !positions.has_changed().unwrap_or(false) {
            return false;
        }

        match *positions.borrow_and_update() {
            Some(position) => {
                self.state.apply_position(position.x, position.y);
                true
            }
            None => false,
        }
    }

    pub fn status_line(&self) -> String {
        let connected = self
            .positions
            .as_ref()
            .is_some_and(|rx| rx.has_changed().is_ok());
        self.state.status_line(connected)
    }

    pub fn into_transport(self) -> Transport<W> {
        self.transport
    }
}

/// Abort, or a raw line that carries M112
fn is_emergency_stop(intent: &Intent) -> bool {
    match intent {
        Intent::Abort => true,
        Intent::SendRaw(text) => {
            matches!(parse_line(text), ParsedLine::Command(cmd) if cmd.is_emergency_stop())
        }
        _ => false,
    }
}
