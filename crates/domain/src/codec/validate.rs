//! Type-specific rules applied after a payload has been packed.

use serde_json::{Map, Value};

pub type Validator = fn(&Map<String, Value>) -> Result<(), String>;

pub fn accept(_: &Map<String, Value>) -> Result<(), String> {
    Ok(())
}

/// TXT and SPF carry one or more character-strings.
pub fn at_least_one_string(fields: &Map<String, Value>) -> Result<(), String> {
    match fields.get("text").and_then(Value::as_array) {
        Some(strings) if !strings.is_empty() => Ok(()),
        _ => Err("at least one character-string is required".to_string()),
    }
}

pub fn caa_tag(fields: &Map<String, Value>) -> Result<(), String> {
    let tag = str_field(fields, "tag");
    if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(format!("invalid CAA tag {tag:?}"));
    }
    Ok(())
}

/// SvcParamKeys must appear in strictly increasing order (RFC 9460 §2.2).
pub fn svc_params_ascending(fields: &Map<String, Value>) -> Result<(), String> {
    let keys: Vec<u64> = fields
        .get("params")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| p.get("key").and_then(Value::as_u64))
                .collect()
        })
        .unwrap_or_default();

    if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err("service parameter keys must be strictly ascending".to_string());
    }
    Ok(())
}

pub fn digest_present(fields: &Map<String, Value>) -> Result<(), String> {
    non_empty(fields, "digest")
}

pub fn fingerprint_present(fields: &Map<String, Value>) -> Result<(), String> {
    non_empty(fields, "fingerprint")
}

pub fn certificate_data_present(fields: &Map<String, Value>) -> Result<(), String> {
    non_empty(fields, "data")
}

pub fn loc_version(fields: &Map<String, Value>) -> Result<(), String> {
    match fields.get("version").and_then(Value::as_u64) {
        Some(0) => Ok(()),
        other => Err(format!("unsupported LOC version {other:?}")),
    }
}

/// DNSKEY and CDNSKEY always use protocol 3 (RFC 4034 §2.1.2).
pub fn dnskey_protocol(fields: &Map<String, Value>) -> Result<(), String> {
    match fields.get("protocol").and_then(Value::as_u64) {
        Some(3) => Ok(()),
        other => Err(format!("protocol must be 3, got {other:?}")),
    }
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn non_empty(fields: &Map<String, Value>, key: &str) -> Result<(), String> {
    if str_field(fields, key).is_empty() {
        return Err(format!("`{key}` must not be empty"));
    }
    Ok(())
}
