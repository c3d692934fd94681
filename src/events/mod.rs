pub mod execution_observed;

use serde::Serialize;
use sha2::{Digest, Sha256};
use strum::IntoEnumIterator;

use crate::error::Error;

pub use execution_observed::{ExecutionObserved, QuoteId};

pub const DISCRIMINATOR_LEN: usize = 8;

/// Wrapper discriminator followed by event discriminator.
pub const FRAME_HEADER_LEN: usize = 2 * DISCRIMINATOR_LEN;

/// `sha256("anchor:event")[..8]` read as a big-endian integer.
pub const EVENT_IX_TAG: u64 = 0x1d9a_cb51_2ea5_45e4;

/// Wrapper discriminator as it appears at the start of every `emit_cpi!`
/// self-invocation (`e445a52e51cb9a1d`).
pub const EVENT_IX_TAG_LE: [u8; DISCRIMINATOR_LEN] = EVENT_IX_TAG.to_le_bytes();

const EVENT_NAMESPACE: &str = "event";

/// Anchor event discriminator: `sha256("event:<EventName>")[..8]`.
pub fn event_discriminator(event_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::new()
        .chain_update(EVENT_NAMESPACE)
        .chain_update(":")
        .chain_update(event_name)
        .finalize();
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    discriminator
}

/// Builds the instruction data an `emit_cpi!` self-invocation carries.
pub fn encode_event_frame(event_name: &str, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&EVENT_IX_TAG_LE);
    frame.extend_from_slice(&event_discriminator(event_name));
    frame.extend_from_slice(payload);
    frame
}

/// A fixed-layout event payload identified by its declared name.
pub trait AnchorEvent: Sized {
    const NAME: &'static str;
    const PAYLOAD_LEN: usize;

    fn decode_payload(payload: &[u8]) -> Result<Self, Error>;

    fn encode_payload(&self) -> Vec<u8>;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        event_discriminator(Self::NAME)
    }

    fn frame_len() -> usize {
        FRAME_HEADER_LEN + Self::PAYLOAD_LEN
    }

    fn to_frame(&self) -> Vec<u8> {
        encode_event_frame(Self::NAME, &self.encode_payload())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::VariantNames,
    strum_macros::EnumIter,
)]
pub enum EventKind {
    ExecutionObserved,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::ExecutionObserved => ExecutionObserved::NAME,
        }
    }

    pub fn payload_len(self) -> usize {
        match self {
            Self::ExecutionObserved => ExecutionObserved::PAYLOAD_LEN,
        }
    }

    pub fn discriminator(self) -> [u8; DISCRIMINATOR_LEN] {
        event_discriminator(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum KnownEvent {
    ExecutionObserved(ExecutionObserved),
}

impl KnownEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ExecutionObserved(_) => EventKind::ExecutionObserved,
        }
    }
}

pub fn decode_known(kind: EventKind, payload: &[u8]) -> Result<KnownEvent, Error> {
    match kind {
        EventKind::ExecutionObserved => {
            ExecutionObserved::decode_payload(payload).map(KnownEvent::ExecutionObserved)
        }
    }
}

/// Discriminator → schema lookup over every [`EventKind`].
#[derive(Debug, Clone)]
pub struct EventTable {
    entries: Vec<([u8; DISCRIMINATOR_LEN], EventKind)>,
}

impl EventTable {
    pub fn known() -> Self {
        Self {
            entries: EventKind::iter()
                .map(|kind| (kind.discriminator(), kind))
                .collect(),
        }
    }

    pub fn lookup(&self, discriminator: &[u8; DISCRIMINATOR_LEN]) -> Option<EventKind> {
        self.entries
            .iter()
            .find(|(known, _)| known == discriminator)
            .map(|(_, kind)| *kind)
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::known()
    }
}
