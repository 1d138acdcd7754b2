//! Purpose: Execute conformance manifests against the packed-date codec and slot summaries.
//! Exports: None (binary entry point).
//! Role: Reference runner for JSON vectors shared with non-Rust implementations.
//! Invariants: Manifests are JSON-only; steps execute in order; fail-fast on errors.
//! Invariants: Owner labels map to keys by copying their bytes into a zeroed 32-byte key.

use clap::Parser;
use quottery_shim::api::{
    BettorKey, CalendarTimestamp, Error, ErrorKind, SummaryOutcome, decode, encode, summarize,
};
use quottery_shim::core::slots::{KEY_LEN, MAX_BETTORS_PER_OPTION};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qtry-conformance", about = "Run Quottery shim conformance manifests")]
struct Args {
    /// Manifest files to run, in order.
    #[arg(required = true)]
    manifests: Vec<PathBuf>,
}

fn main() {
    init_tracing();
    let args = Args::parse();
    for manifest in &args.manifests {
        if let Err(err) = run(manifest) {
            eprintln!("{}: {err}", manifest.display());
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(manifest_path: &Path) -> Result<(), String> {
    let content = fs::read_to_string(manifest_path)
        .map_err(|err| format!("failed to read manifest: {err}"))?;
    let manifest: Value = serde_json::from_str(&content)
        .map_err(|err| format!("failed to parse manifest json: {err}"))?;

    let version = manifest
        .get("conformance_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| "missing conformance_version".to_string())?;
    if version != 0 {
        return Err(format!("unsupported conformance_version: {version}"));
    }

    let steps = manifest
        .get("steps")
        .and_then(Value::as_array)
        .ok_or_else(|| "manifest steps must be an array".to_string())?;

    for (index, step) in steps.iter().enumerate() {
        let step_id = step.get("id").and_then(Value::as_str).map(str::to_string);
        let op = step
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| step_err(index, &step_id, "missing op"))?;
        debug!(index, op, "running step");
        match op {
            "decode" => run_decode(step, index, &step_id)?,
            "encode" => run_encode(step, index, &step_id)?,
            "round_trip" => run_round_trip(step, index, &step_id)?,
            "summarize" => run_summarize(step, index, &step_id)?,
            _ => return Err(step_err(index, &step_id, &format!("unknown op: {op}"))),
        }
    }

    info!(manifest = %manifest_path.display(), steps = steps.len(), "manifest passed");
    Ok(())
}

fn run_decode(step: &Value, index: usize, step_id: &Option<String>) -> Result<(), String> {
    let input = input(step, index, step_id)?;
    let raw = input
        .get("raw")
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or_else(|| step_err(index, step_id, "input.raw must be a u32"))?;
    let fields = decode(raw).to_array();
    let expected = fields_from(expect(step, index, step_id)?, "fields", index, step_id)?;
    if fields != expected {
        return Err(step_err(
            index,
            step_id,
            &format!("decode({raw:#010x}) = {fields:?}, expected {expected:?}"),
        ));
    }
    Ok(())
}

fn run_encode(step: &Value, index: usize, step_id: &Option<String>) -> Result<(), String> {
    let fields = fields_from(input(step, index, step_id)?, "fields", index, step_id)?;
    let raw = encode(CalendarTimestamp::from_array(fields));
    let expected = expect(step, index, step_id)?
        .get("raw")
        .and_then(Value::as_u64)
        .ok_or_else(|| step_err(index, step_id, "expect.raw must be a u32"))?;
    if u64::from(raw) != expected {
        return Err(step_err(
            index,
            step_id,
            &format!("encode({fields:?}) = {raw:#010x}, expected {expected:#010x}"),
        ));
    }
    Ok(())
}

fn run_round_trip(step: &Value, index: usize, step_id: &Option<String>) -> Result<(), String> {
    let fields = fields_from(input(step, index, step_id)?, "fields", index, step_id)?;
    let back = decode(encode(CalendarTimestamp::from_array(fields))).to_array();
    if back != fields {
        return Err(step_err(
            index,
            step_id,
            &format!("round trip changed {fields:?} into {back:?}"),
        ));
    }
    Ok(())
}

fn run_summarize(step: &Value, index: usize, step_id: &Option<String>) -> Result<(), String> {
    let input = input(step, index, step_id)?;
    let owners = input
        .get("owners")
        .and_then(Value::as_array)
        .ok_or_else(|| step_err(index, step_id, "input.owners must be an array"))?;
    let table_len = input
        .get("table_len")
        .and_then(Value::as_u64)
        .map(|len| len as usize)
        .unwrap_or(owners.len());
    if table_len < owners.len() {
        return Err(step_err(index, step_id, "input.table_len is shorter than owners"));
    }
    let capacity = input
        .get("capacity")
        .and_then(Value::as_u64)
        .map(|cap| cap as usize)
        .unwrap_or(MAX_BETTORS_PER_OPTION);

    let mut raw = vec![0u8; table_len * KEY_LEN];
    for (slot, owner) in owners.iter().enumerate() {
        if owner.is_null() {
            continue;
        }
        let key = key_from_label(owner).map_err(|err| step_err(index, step_id, &err))?;
        raw[slot * KEY_LEN..(slot + 1) * KEY_LEN].copy_from_slice(key.as_bytes());
    }

    let expect = expect(step, index, step_id)?;
    let result = summarize(&raw, capacity);
    if expect.get("error").is_some() {
        return validate_expect_error(expect, &result.map(|_| ()), index, step_id);
    }
    let outcome = result.map_err(|err| step_err(index, step_id, &format!("unexpected error: {err}")))?;

    let status = expect
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| step_err(index, step_id, "expect.status is required"))?;
    let actual_status = match outcome {
        SummaryOutcome::NoData => "no_data",
        SummaryOutcome::Summary(_) => "success",
    };
    if status != actual_status {
        return Err(step_err(
            index,
            step_id,
            &format!("expected status {status}, got {actual_status}"),
        ));
    }

    let expected_entries = match expect.get("entries").and_then(Value::as_array) {
        Some(entries) => entries
            .iter()
            .map(|entry| expected_entry(entry).map_err(|err| step_err(index, step_id, &err)))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let actual_entries: Vec<(BettorKey, u32)> = outcome
        .entries()
        .iter()
        .map(|entry| (entry.owner, entry.slots))
        .collect();
    if actual_entries != expected_entries {
        return Err(step_err(
            index,
            step_id,
            &format!("summary {actual_entries:?} differs from expected {expected_entries:?}"),
        ));
    }
    Ok(())
}

fn expected_entry(entry: &Value) -> Result<(BettorKey, u32), String> {
    let pair = entry
        .as_array()
        .filter(|pair| pair.len() == 2)
        .ok_or_else(|| "expect.entries items must be [owner, slots]".to_string())?;
    let key = key_from_label(&pair[0])?;
    let slots = pair[1]
        .as_u64()
        .and_then(|slots| u32::try_from(slots).ok())
        .ok_or_else(|| "slot count must be a u32".to_string())?;
    Ok((key, slots))
}

fn key_from_label(label: &Value) -> Result<BettorKey, String> {
    let label = label
        .as_str()
        .ok_or_else(|| "owner labels must be strings or null".to_string())?;
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > KEY_LEN {
        return Err(format!("owner label '{label}' must be 1 to {KEY_LEN} bytes"));
    }
    let mut key = [0u8; KEY_LEN];
    key[..bytes.len()].copy_from_slice(bytes);
    Ok(BettorKey(key))
}

fn fields_from(
    value: &Value,
    name: &str,
    index: usize,
    step_id: &Option<String>,
) -> Result<[u8; 6], String> {
    let items = value
        .get(name)
        .and_then(Value::as_array)
        .filter(|items| items.len() == 6)
        .ok_or_else(|| step_err(index, step_id, &format!("{name} must be six integers")))?;
    let mut out = [0u8; 6];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| step_err(index, step_id, &format!("{name} entries must be u8")))?;
    }
    Ok(out)
}

fn input<'a>(step: &'a Value, index: usize, step_id: &Option<String>) -> Result<&'a Value, String> {
    step.get("input")
        .ok_or_else(|| step_err(index, step_id, "missing input"))
}

fn expect<'a>(step: &'a Value, index: usize, step_id: &Option<String>) -> Result<&'a Value, String> {
    step.get("expect")
        .ok_or_else(|| step_err(index, step_id, "missing expect"))
}

fn validate_expect_error(
    expect: &Value,
    result: &Result<(), Error>,
    index: usize,
    step_id: &Option<String>,
) -> Result<(), String> {
    let expect_error = expect
        .get("error")
        .ok_or_else(|| step_err(index, step_id, "missing expect.error"))?;
    let err = result
        .as_ref()
        .err()
        .ok_or_else(|| step_err(index, step_id, "expected error but operation succeeded"))?;

    let kind = expect_error
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| step_err(index, step_id, "expect.error.kind is required"))?;
    if kind != error_kind_label(err.kind()) {
        return Err(step_err(
            index,
            step_id,
            &format!(
                "expected error kind {kind}, got {}",
                error_kind_label(err.kind())
            ),
        ));
    }

    if let Some(substr) = expect_error.get("message_contains").and_then(Value::as_str) {
        let message = err.message().unwrap_or("");
        if !message.contains(substr) {
            return Err(step_err(
                index,
                step_id,
                &format!("expected message to contain '{substr}', got '{message}'"),
            ));
        }
    }
    if let Some(has_offset) = expect_error.get("has_offset").and_then(Value::as_bool) {
        if has_offset != err.offset().is_some() {
            return Err(step_err(index, step_id, "offset presence mismatch"));
        }
    }
    Ok(())
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Internal => "Internal",
        ErrorKind::Usage => "Usage",
        ErrorKind::NoData => "NoData",
        ErrorKind::Overflow => "Overflow",
        ErrorKind::Corrupt => "Corrupt",
        ErrorKind::Remote => "Remote",
        ErrorKind::Identity => "Identity",
    }
}

fn step_err(index: usize, step_id: &Option<String>, message: &str) -> String {
    let mut out = format!("step {index}");
    if let Some(id) = step_id {
        out.push_str(&format!(" ({id})"));
    }
    out.push_str(": ");
    out.push_str(message);
    out
}
