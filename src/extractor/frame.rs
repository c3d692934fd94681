use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::events::{DISCRIMINATOR_LEN, EVENT_IX_TAG_LE, FRAME_HEADER_LEN};
use crate::types::RawInstruction;

/// Why an instruction was not considered an event candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    MissingField,
    UndecodableProgramId,
    ProgramMismatch,
    UndecodableData,
    TooShort { len: usize },
    WrapperMismatch,
}

/// Classification of one inner instruction against an expected event.
///
/// Only `EventMatched` commits the instruction to being the expected event;
/// any failure past that point aborts the extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameState {
    NotACandidate(SkipReason),
    /// An Anchor event of a different type.
    WrapperMatched {
        discriminator: [u8; DISCRIMINATOR_LEN],
    },
    EventMatched {
        frame: Vec<u8>,
    },
}

/// Base58 account address to `Pubkey`; the decoded value must be exactly 32 bytes.
pub(crate) fn decode_pubkey(value: &str) -> Result<Pubkey, String> {
    let bytes = bs58::decode(value).into_vec().map_err(|e| e.to_string())?;
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))?;
    Ok(Pubkey::new_from_array(array))
}

/// Decodes the instruction data of a wrapped event emitted by `program_id`.
pub fn wrapped_event_frame(
    ix: &RawInstruction,
    program_id: &Pubkey,
) -> Result<Vec<u8>, SkipReason> {
    let (Some(ix_program_id), Some(data)) = (ix.program_id.as_deref(), ix.data.as_deref()) else {
        return Err(SkipReason::MissingField);
    };

    let ix_program_id =
        decode_pubkey(ix_program_id).map_err(|_| SkipReason::UndecodableProgramId)?;
    if ix_program_id != *program_id {
        return Err(SkipReason::ProgramMismatch);
    }

    let frame = bs58::decode(data)
        .into_vec()
        .map_err(|_| SkipReason::UndecodableData)?;
    if frame.len() < FRAME_HEADER_LEN {
        return Err(SkipReason::TooShort { len: frame.len() });
    }
    if !frame.starts_with(&EVENT_IX_TAG_LE) {
        return Err(SkipReason::WrapperMismatch);
    }

    Ok(frame)
}

pub fn event_discriminator_of(frame: &[u8]) -> Option<[u8; DISCRIMINATOR_LEN]> {
    frame
        .get(DISCRIMINATOR_LEN..FRAME_HEADER_LEN)
        .and_then(|bytes| bytes.try_into().ok())
}

pub fn classify(
    ix: &RawInstruction,
    program_id: &Pubkey,
    expected: &[u8; DISCRIMINATOR_LEN],
) -> FrameState {
    let frame = match wrapped_event_frame(ix, program_id) {
        Ok(frame) => frame,
        Err(reason) => return FrameState::NotACandidate(reason),
    };

    match event_discriminator_of(&frame) {
        Some(discriminator) if discriminator == *expected => FrameState::EventMatched { frame },
        Some(discriminator) => FrameState::WrapperMatched { discriminator },
        None => FrameState::NotACandidate(SkipReason::TooShort { len: frame.len() }),
    }
}

/// Payload of an event-matched frame; the frame must be exactly header + `payload_len`.
pub fn payload_of<'a>(
    frame: &'a [u8],
    event: &str,
    payload_len: usize,
) -> Result<&'a [u8], Error> {
    let expected = FRAME_HEADER_LEN + payload_len;
    if frame.len() != expected {
        return Err(Error::MalformedEventFrame {
            event: event.to_string(),
            expected,
            actual: frame.len(),
        });
    }

    frame.get(FRAME_HEADER_LEN..).ok_or_else(|| Error::Decode {
        event: event.to_string(),
        reason: "frame shorter than header".into(),
    })
}
