#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod error;
pub mod events;
pub mod extractor;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::Error;
pub use events::{
    AnchorEvent, EVENT_IX_TAG, EVENT_IX_TAG_LE, EventKind, EventTable, ExecutionObserved,
    KnownEvent, QuoteId, decode_known, encode_event_frame, event_discriminator,
};
pub use extractor::{EventExtractor, Extraction, FrameState, SkipReason, extract};
pub use solana_pubkey::Pubkey;
pub use types::{InstructionGroup, RawInstruction, TransactionMeta, TransactionTrace};
