//! blocklab engine as a WASM module for the browser editor.
//!
//! This crate exposes the block pipeline via `wasm-bindgen`. Every entry
//! point takes and returns JSON strings so the editor can pass its state
//! through untouched.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run_challenge, hydrate } from 'blocklab-wasm';
//!
//! await init();
//!
//! const blocks = JSON.parse(hydrate(JSON.stringify(generated)));
//! const report = JSON.parse(run_challenge(JSON.stringify(blocks), JSON.stringify(challenge)));
//! // { results: [{ status: "success", message: "...", testCase: 1, state: {...}, trace: [...] }], error: "" }
//! ```

use blocklab_eval::{run_program as run_blocks, InterpreterConfig, TestRunner};
use blocklab_parser::build_tree as build_blocks;
use blocklab_types::block::{catalog, palette};
use blocklab_types::{
    BlockIdGen, Challenge, PlacedBlock, RunReport, StateOverrides, TestCaseLabel, TestResult,
};
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

/// Run a block sequence against a challenge.
///
/// `blocks` is a JSON array of placed blocks; `challenge` is a JSON object
/// with a `testCases` array. Returns a `RunReport`:
/// ```json
/// { "results": [{ "status": "failure", "message": "...", "testCase": 1 }], "error": "" }
/// ```
/// Malformed arguments produce a report with a single error result.
#[wasm_bindgen]
pub fn run_challenge(blocks: &str, challenge: &str) -> String {
    let report = match (parse_blocks(blocks), parse_challenge(challenge)) {
        (Ok(blocks), Ok(challenge)) => TestRunner::default().run_challenge(&blocks, &challenge),
        (Err(msg), _) | (_, Err(msg)) => input_error_report(msg),
    };
    to_json(&report)
}

/// Run a block sequence once, without expectations.
///
/// `overrides` is an optional JSON object of initial state fields (pass an
/// empty string for none). Returns `{ "state": {...}, "trace": [...] }` on
/// success or `{ "error": "...", "code": 202 }` on failure.
#[wasm_bindgen]
pub fn run_program(blocks: &str, overrides: &str) -> String {
    let blocks = match parse_blocks(blocks) {
        Ok(blocks) => blocks,
        Err(msg) => return json!({ "error": msg }).to_string(),
    };
    let overrides = serde_json::from_str::<Value>(overrides)
        .ok()
        .and_then(|v| StateOverrides::from_json(&v));
    let config = InterpreterConfig::default().with_trace(true);

    match run_blocks(&blocks, overrides.as_ref(), &config) {
        Ok(execution) => to_json(&json!({
            "state": execution.state,
            "trace": execution.trace,
        })),
        Err(err) => json!({ "error": err.to_string(), "code": err.code() }).to_string(),
    }
}

/// Build the program tree for a block sequence.
///
/// Returns `{ "nodes": [...] }` or `{ "error": { "code": 100, ... } }`.
#[wasm_bindgen]
pub fn build_tree(blocks: &str) -> String {
    let blocks = match parse_blocks(blocks) {
        Ok(blocks) => blocks,
        Err(msg) => return json!({ "error": { "message": msg } }).to_string(),
    };
    match build_blocks(&blocks) {
        Ok(nodes) => to_json(&json!({ "nodes": nodes })),
        Err(err) => to_json(&json!({ "error": err })),
    }
}

/// Hydrate a generated workspace into a balanced block sequence.
///
/// `generated` is the generator's raw JSON response. Ids are numbered after
/// `issued` so they never collide with ids the editor already handed out.
#[wasm_bindgen]
pub fn hydrate(generated: &str, issued: u32) -> String {
    let payload = serde_json::from_str::<Value>(generated).unwrap_or(Value::Null);
    let mut ids = BlockIdGen::starting_after(u64::from(issued));
    to_json(&blocklab_parser::hydrate(&payload, &mut ids))
}

/// Return the block catalog (labels, categories, colors, roles).
#[wasm_bindgen]
pub fn block_catalog() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&catalog()).map_err(JsValue::from)
}

/// Return the catalog entries of the default palette, in palette order.
#[wasm_bindgen]
pub fn block_palette() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&palette()).map_err(JsValue::from)
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_blocks(blocks: &str) -> Result<Vec<PlacedBlock>, String> {
    serde_json::from_str(blocks).map_err(|e| format!("Could not read the blocks: {e}"))
}

fn parse_challenge(challenge: &str) -> Result<Challenge, String> {
    serde_json::from_str(challenge).map_err(|e| format!("Could not read the challenge: {e}"))
}

fn input_error_report(message: String) -> RunReport {
    RunReport::from_results(vec![TestResult::error(TestCaseLabel::Unconstrained, message)])
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(r#"{{"error":"Serialization error: {e}"}}"#)
    })
}
