//! Command dispatch registry
//!
//! A fixed-size table from command id to handler, filled by each feature
//! module at startup. Lookup is a linear scan in registration order and the
//! first match wins, so registering the same id twice leaves the second
//! handler unreachable.

use heapless::Vec;

use crate::commands::CMD_UNKNOWN;
use crate::transmit::FrameSink;

/// Default number of registry slots
pub const MAX_COMMANDS: usize = 16;

/// Handles the payload of one command id.
///
/// Runs synchronously inside the parser loop, so implementations must not
/// block or spin-wait.
pub trait CommandHandler {
    fn handle(&mut self, data: &[u8], tx: &mut dyn FrameSink);
}

impl<F> CommandHandler for F
where
    F: FnMut(&[u8], &mut dyn FrameSink),
{
    fn handle(&mut self, data: &[u8], tx: &mut dyn FrameSink) {
        self(data, tx)
    }
}

/// Registration failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Every slot is taken
    RegistryFull,
}

/// Outcome of [`CommandRegistry::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// A handler ran
    Handled,
    /// No handler; an unknown-command frame was sent back
    Unknown,
}

/// Command id to handler table with `M` slots
pub struct CommandRegistry<'a, const M: usize = MAX_COMMANDS> {
    entries: Vec<(u8, &'a mut dyn CommandHandler), M>,
}

impl<const M: usize> Default for CommandRegistry<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const M: usize> CommandRegistry<'a, M> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a handler for `command`.
    ///
    /// Duplicate ids are not rejected.
    pub fn register(
        &mut self,
        command: u8,
        handler: &'a mut dyn CommandHandler,
    ) -> Result<(), RegistryError> {
        self.entries
            .push((command, handler))
            .map_err(|_| RegistryError::RegistryFull)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub fn contains(&self, command: u8) -> bool {
        self.entries.iter().any(|(id, _)| *id == command)
    }

    /// Run the first handler registered for `command`.
    ///
    /// Unmatched ids are answered with a [`CMD_UNKNOWN`] frame whose payload
    /// is the rejected id.
    pub fn dispatch(&mut self, command: u8, data: &[u8], tx: &mut dyn FrameSink) -> Dispatch {
        if let Some((_, handler)) = self.entries.iter_mut().find(|(id, _)| *id == command) {
            handler.handle(data, tx);
            return Dispatch::Handled;
        }

        // Best effort: the link has no retransmission to fall back on
        let _ = tx.send_frame(CMD_UNKNOWN, &[command]);
        Dispatch::Unknown
    }
}
