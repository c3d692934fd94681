pub mod frame;

use solana_pubkey::Pubkey;
use tracing::{debug, warn};

use crate::error::Error;
use crate::events::{
    AnchorEvent, DISCRIMINATOR_LEN, EventTable, ExecutionObserved, KnownEvent, decode_known,
    event_discriminator,
};
use crate::types::{RawInstruction, TransactionTrace};

pub use frame::{FrameState, SkipReason};

/// Result of scanning one transaction for events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    /// The transaction carried no inner instructions (or no metadata at all).
    NoTrace,
    /// Inner instructions were scanned and none matched.
    NotFound,
    /// Matching events in group order, then instruction order. Never empty.
    Events(Vec<T>),
}

impl<T> Extraction<T> {
    pub fn events(&self) -> &[T] {
        match self {
            Self::Events(events) => events,
            Self::NoTrace | Self::NotFound => &[],
        }
    }

    pub fn into_events(self) -> Vec<T> {
        match self {
            Self::Events(events) => events,
            Self::NoTrace | Self::NotFound => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTrace => "no_trace",
            Self::NotFound => "not_found",
            Self::Events(_) => "found",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InstructionPosition {
    group: usize,
    instruction: usize,
}

/// Finds `emit_cpi!` events of one program inside a transaction's inner instructions.
#[derive(Debug, Clone)]
pub struct EventExtractor {
    program_id: Pubkey,
    known: EventTable,
}

impl EventExtractor {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            known: EventTable::known(),
        }
    }

    pub fn from_base58(program_id: &str) -> Result<Self, Error> {
        let program_id = frame::decode_pubkey(program_id).map_err(|reason| {
            Error::InvalidProgramId {
                value: program_id.to_string(),
                reason,
            }
        })?;
        Ok(Self::new(program_id))
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn classify(
        &self,
        ix: &RawInstruction,
        expected: &[u8; DISCRIMINATOR_LEN],
    ) -> FrameState {
        frame::classify(ix, &self.program_id, expected)
    }

    /// Extracts every event named `event_name`, decoded with the
    /// `ExecutionObserved` layout.
    pub fn extract(
        &self,
        trace: &TransactionTrace,
        event_name: &str,
    ) -> Result<Extraction<ExecutionObserved>, Error> {
        self.extract_with(
            trace,
            event_name,
            ExecutionObserved::PAYLOAD_LEN,
            ExecutionObserved::decode_payload,
        )
    }

    pub fn extract_event<T: AnchorEvent>(
        &self,
        trace: &TransactionTrace,
    ) -> Result<Extraction<T>, Error> {
        self.extract_with(trace, T::NAME, T::PAYLOAD_LEN, T::decode_payload)
    }

    /// Extracts every event whose discriminator belongs to a known schema.
    pub fn extract_known(
        &self,
        trace: &TransactionTrace,
    ) -> Result<Extraction<KnownEvent>, Error> {
        self.scan(trace, "known", |position, ix| {
            let frame = match frame::wrapped_event_frame(ix, &self.program_id) {
                Ok(frame) => frame,
                Err(reason) => {
                    debug!(
                        group = position.group,
                        instruction = position.instruction,
                        reason = reason.as_ref(),
                        "skipping instruction"
                    );
                    return Ok(None);
                }
            };

            let Some(discriminator) = frame::event_discriminator_of(&frame) else {
                return Ok(None);
            };
            let Some(kind) = self.known.lookup(&discriminator) else {
                debug!(
                    group = position.group,
                    instruction = position.instruction,
                    discriminator = %hex::encode(discriminator),
                    "skipping unknown event"
                );
                return Ok(None);
            };

            let payload = frame::payload_of(&frame, kind.name(), kind.payload_len())?;
            decode_known(kind, payload).map(Some)
        })
    }

    fn extract_with<T>(
        &self,
        trace: &TransactionTrace,
        event_name: &str,
        payload_len: usize,
        decode: impl Fn(&[u8]) -> Result<T, Error>,
    ) -> Result<Extraction<T>, Error> {
        let expected = event_discriminator(event_name);

        self.scan(trace, event_name, |position, ix| {
            match self.classify(ix, &expected) {
                FrameState::NotACandidate(reason) => {
                    debug!(
                        group = position.group,
                        instruction = position.instruction,
                        reason = reason.as_ref(),
                        "skipping instruction"
                    );
                    Ok(None)
                }
                FrameState::WrapperMatched { discriminator } => {
                    debug!(
                        group = position.group,
                        instruction = position.instruction,
                        discriminator = %hex::encode(discriminator),
                        "skipping other event"
                    );
                    Ok(None)
                }
                FrameState::EventMatched { frame } => {
                    let payload = frame::payload_of(&frame, event_name, payload_len)?;
                    decode(payload).map(Some)
                }
            }
        })
    }

    fn scan<T>(
        &self,
        trace: &TransactionTrace,
        target: &str,
        mut visit: impl FnMut(InstructionPosition, &RawInstruction) -> Result<Option<T>, Error>,
    ) -> Result<Extraction<T>, Error> {
        let groups = trace.instruction_groups();
        if groups.is_empty() {
            if trace.has_meta() {
                debug!(event = target, "transaction has no inner instructions");
            } else {
                warn!(event = target, "transaction metadata unavailable");
            }
            return Ok(Extraction::NoTrace);
        }

        let mut events = Vec::new();
        for (group, entry) in groups.iter().enumerate() {
            for (instruction, ix) in entry.instructions.iter().enumerate() {
                let position = InstructionPosition { group, instruction };
                if let Some(event) = visit(position, ix)? {
                    events.push(event);
                }
            }
        }

        debug!(
            event = target,
            program_id = %self.program_id,
            groups = groups.len(),
            matched = events.len(),
            "scanned inner instructions"
        );

        if events.is_empty() {
            Ok(Extraction::NotFound)
        } else {
            Ok(Extraction::Events(events))
        }
    }
}

/// Extracts every `event_name` event emitted by `program_id` in `trace`.
pub fn extract(
    trace: &TransactionTrace,
    program_id: &Pubkey,
    event_name: &str,
) -> Result<Extraction<ExecutionObserved>, Error> {
    EventExtractor::new(*program_id).extract(trace, event_name)
}
