use serde::Serialize;
use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;

use crate::events::{self, EventKind, ExecutionObserved};
use crate::extractor::{EventExtractor, Extraction};
use crate::types::TransactionTrace;

fn to_js(value: &serde_json::Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn error_result(msg: &str) -> JsValue {
    to_js(&serde_json::json!({ "error": msg }))
}

fn extraction_result(extraction: &Extraction<ExecutionObserved>) -> JsValue {
    let events = match serde_json::to_value(extraction.events()) {
        Ok(events) => events,
        Err(e) => return error_result(&e.to_string()),
    };
    to_js(&serde_json::json!({
        "status": extraction.as_str(),
        "events": events,
    }))
}

/// Extract `ExecutionObserved`-layout events from a `getParsedTransaction` JSON payload.
///
/// Returns `{status, events}` on success, `{error}` on invalid input or a malformed event.
#[wasm_bindgen]
pub fn extract_execution_observed(
    tx_json: &str,
    program_id: &str,
    event_name: Option<String>,
) -> JsValue {
    let extractor = match EventExtractor::from_base58(program_id) {
        Ok(extractor) => extractor,
        Err(e) => return error_result(&e.to_string()),
    };
    let trace = match TransactionTrace::from_json(tx_json) {
        Ok(trace) => trace,
        Err(e) => return error_result(&e.to_string()),
    };

    let event_name = event_name.as_deref().unwrap_or(EventKind::ExecutionObserved.name());
    match extractor.extract(&trace, event_name) {
        Ok(extraction) => extraction_result(&extraction),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Hex of `sha256("event:<event_name>")[..8]`.
#[wasm_bindgen]
pub fn event_discriminator_hex(event_name: &str) -> String {
    hex::encode(events::event_discriminator(event_name))
}

/// Hex of the wrapper discriminator every emitted event starts with.
#[wasm_bindgen]
pub fn event_wrapper_discriminator_hex() -> String {
    hex::encode(events::EVENT_IX_TAG_LE)
}

/// Known event schemas with their discriminators and frame sizes.
#[wasm_bindgen]
pub fn known_events() -> JsValue {
    let result: Vec<serde_json::Value> = EventKind::iter()
        .map(|kind| {
            serde_json::json!({
                "name": kind.name(),
                "discriminator": hex::encode(kind.discriminator()),
                "payloadLen": kind.payload_len(),
                "frameLen": events::FRAME_HEADER_LEN + kind.payload_len(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(result))
}
