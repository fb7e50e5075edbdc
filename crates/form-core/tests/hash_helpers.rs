use form_core::hashing::{hash_str, hash_value, to_canonical_json};
use serde_json::json;

#[test]
fn hash_value_produces_hex_64() {
    let v = json!({"b":2, "a":1});
    let h = hash_value(&v);
    // blake3 hex length is 64
    assert_eq!(h.len(), 64);
    // deterministic: same value with different key order yields same hash
    let v2 = json!({"a":1, "b":2});
    let h2 = hash_value(&v2);
    assert_eq!(h, h2);
}

#[test]
fn canonical_json_sorts_keys_recursively() {
    let v = json!({"z": {"b": 1, "a": [1, {"y": 2, "x": 3}]}, "a": null});
    let canon = to_canonical_json(&v);
    assert_eq!(canon, r#"{"a":null,"z":{"a":[1,{"x":3,"y":2}],"b":1}}"#);
    // hashing the canonical string directly matches hash_value
    assert_eq!(hash_str(&canon), hash_value(&v));
}
