#![expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]

use execution_beacon_events::{
    AnchorEvent, EVENT_IX_TAG_LE, Error, EventExtractor, EventKind, ExecutionObserved, Extraction,
    FrameState, KnownEvent, QuoteId, SkipReason, TransactionTrace, event_discriminator, extract,
};

const BEACON_PROGRAM_ID: &str = "BRoueHsu3h2SfEse9ohXipm1R9uRGRSe3zPYsAT8RySr";
// base58 of [7u8; 32]; carries a copy of the first beacon frame in the fixture
const FOREIGN_PROGRAM_ID: &str = "US517G5965aydkZ46HS38QLi7UQiSojurfbQfKCELFx";
const FIRST_PAYER: &str = "7WqgMfwT7om5FDs3LonZuPQNYcrMPoNruyFkrhxS51B7";
const SECOND_PAYER: &str = "DLJyYjaTy2iSzUKde2Qkf8VEqsLMSADgQvF27jW5gLXi";

fn load_trace(filename: &str) -> TransactionTrace {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    let data =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
    TransactionTrace::from_json(&data).unwrap_or_else(|e| panic!("failed to parse {path}: {e}"))
}

fn beacon() -> EventExtractor {
    EventExtractor::from_base58(BEACON_PROGRAM_ID).unwrap()
}

fn instruction_data(trace: &TransactionTrace, group: usize, instruction: usize) -> Vec<u8> {
    let data = trace.instruction_groups()[group].instructions[instruction]
        .data
        .as_deref()
        .unwrap();
    bs58::decode(data).into_vec().unwrap()
}

fn extract_observed(filename: &str) -> Result<Extraction<ExecutionObserved>, Error> {
    beacon().extract(&load_trace(filename), ExecutionObserved::NAME)
}

// ──────────────────── ExecutionObserved ────────────────────

#[test]
fn extracts_execution_observed_from_parsed_transaction() {
    let events = extract_observed("execution_observed_tx.json")
        .unwrap()
        .into_events();

    assert_eq!(events.len(), 2, "unexpected events: {events:?}");

    assert_eq!(events[0].payer_base58(), FIRST_PAYER);
    assert_eq!(events[0].quote_id, QuoteId([0xaa; 32]));

    let sequential: [u8; 32] = std::array::from_fn(|i| i as u8);
    assert_eq!(events[1].payer_base58(), SECOND_PAYER);
    assert_eq!(events[1].quote_id, QuoteId(sequential));
    assert_eq!(
        events[1].quote_id.to_string(),
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
    );
}

#[test]
fn foreign_program_frames_are_excluded() {
    let trace = load_trace("execution_observed_tx.json");
    let foreign = EventExtractor::from_base58(FOREIGN_PROGRAM_ID).unwrap();

    // the foreign program entry carries a byte-identical ExecutionObserved frame
    assert_eq!(instruction_data(&trace, 1, 0), instruction_data(&trace, 0, 1));
    let foreign_ix = &trace.instruction_groups()[1].instructions[0];
    assert_eq!(
        beacon().classify(foreign_ix, &ExecutionObserved::discriminator()),
        FrameState::NotACandidate(SkipReason::ProgramMismatch)
    );

    let events = foreign.extract(&trace, ExecutionObserved::NAME).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events.events()[0].payer_base58(), FIRST_PAYER);

    let beacon_events = beacon()
        .extract(&trace, ExecutionObserved::NAME)
        .unwrap()
        .into_events();
    assert_eq!(beacon_events.len(), 2);
}

#[test]
fn fixture_frames_carry_anchor_event_header() {
    let trace = load_trace("execution_observed_tx.json");

    let frame = instruction_data(&trace, 0, 1);
    assert_eq!(frame.len(), 80);
    assert_eq!(hex::encode(&frame[..16]), "e445a52e51cb9a1d40a70cba9464f7c9");
    assert_eq!(&frame[..8], EVENT_IX_TAG_LE.as_slice());
    assert_eq!(&frame[8..16], ExecutionObserved::discriminator().as_slice());

    // other event, garbage, then the second ExecutionObserved
    let other = instruction_data(&trace, 1, 1);
    assert_eq!(other.len(), 48);
    assert_eq!(&other[8..16], event_discriminator("QuoteCancelled").as_slice());
    assert_eq!(instruction_data(&trace, 1, 2), [1, 2, 3]);
    assert_eq!(
        hex::encode(&instruction_data(&trace, 1, 3)[..16]),
        "e445a52e51cb9a1d40a70cba9464f7c9"
    );

    let truncated = load_trace("truncated_event_tx.json");
    assert_eq!(instruction_data(&truncated, 0, 0).len(), 80);
    let short = instruction_data(&truncated, 0, 1);
    assert_eq!(short.len(), 79);
    assert_eq!(hex::encode(&short[..16]), "e445a52e51cb9a1d40a70cba9464f7c9");
}

#[test]
fn truncated_event_frame_aborts_extraction() {
    let err = extract_observed("truncated_event_tx.json").unwrap_err();
    let Error::MalformedEventFrame {
        event,
        expected,
        actual,
    } = err
    else {
        panic!("expected MalformedEventFrame");
    };
    assert_eq!(event, "ExecutionObserved");
    assert_eq!(expected, 80);
    assert_eq!(actual, 79);
}

#[test]
fn transaction_without_inner_instructions_has_no_trace() {
    let result = extract_observed("no_inner_instructions_tx.json").unwrap();
    assert_eq!(result, Extraction::NoTrace);
}

#[test]
fn transaction_without_meta_has_no_trace() {
    let trace = load_trace("missing_meta_tx.json");
    assert!(!trace.has_meta());
    assert_eq!(
        beacon().extract(&trace, ExecutionObserved::NAME).unwrap(),
        Extraction::NoTrace
    );
}

#[test]
fn failed_transaction_scans_to_not_found() {
    let trace = load_trace("failed_tx.json");
    assert!(trace.failed());
    assert_eq!(
        beacon().extract(&trace, ExecutionObserved::NAME).unwrap(),
        Extraction::NotFound
    );
}

#[test]
fn unrelated_event_name_finds_nothing() {
    let result = beacon()
        .extract(&load_trace("execution_observed_tx.json"), "QuoteSettled")
        .unwrap();
    assert_eq!(result, Extraction::NotFound);
}

// ──────────────────── Known-event dispatch ────────────────────

#[test]
fn known_dispatch_matches_named_extraction() {
    let trace = load_trace("execution_observed_tx.json");

    let named = beacon()
        .extract(&trace, ExecutionObserved::NAME)
        .unwrap()
        .into_events();
    let known = beacon().extract_known(&trace).unwrap().into_events();

    assert_eq!(known.len(), named.len());
    for (known, named) in known.iter().zip(&named) {
        assert_eq!(known.kind(), EventKind::ExecutionObserved);
        let KnownEvent::ExecutionObserved(decoded) = known;
        assert_eq!(decoded, named);
    }
}

#[test]
fn known_events_serialize_with_event_tag() {
    let known = beacon()
        .extract_known(&load_trace("execution_observed_tx.json"))
        .unwrap();
    let json = serde_json::to_value(known.events()).unwrap();
    assert_eq!(
        json[0],
        serde_json::json!({
            "event": "ExecutionObserved",
            "payer": FIRST_PAYER,
            "quoteId": "aa".repeat(32),
        })
    );
}

// ──────────────────── Free function ────────────────────

#[test]
fn free_function_uses_given_program_id() {
    let trace = load_trace("execution_observed_tx.json");
    let program_id = *beacon().program_id();
    let result = extract(&trace, &program_id, "ExecutionObserved").unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(
        event_discriminator("ExecutionObserved"),
        ExecutionObserved::discriminator()
    );
}
