use crate::claim::value::normalize_value;
use ethers::types::U256;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Selector of `withdraw(uint256,uint32,bytes,bytes32[])`, the portal's
/// claim entrypoint. A candidate carrying it is chosen outright.
pub const WITHDRAW_SELECTOR: &str = "0x8612372a";

/// Synonyms for the transaction destination, in priority order.
const DESTINATION_KEYS: &[&str] = &[
    "to",
    "target",
    "contract",
    "contractAddress",
    "txTo",
    "destination",
    "spender",
];

/// Synonyms for the call payload, in priority order.
const CALLDATA_KEYS: &[&str] = &[
    "data",
    "calldata",
    "callData",
    "input",
    "txData",
    "encodedData",
    "payload",
];

/// Synonyms for the native value, in priority order.
const VALUE_KEYS: &[&str] = &["value", "txValue", "fee", "nativeValue", "ethValue"];

/// A transaction-shaped triple discovered inside an eligibility record.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCandidate {
    pub to: String,
    pub data: String,
    pub value: U256,
    pub source_path: String,
}

/// Scan an opaque eligibility record for the claim transaction.
///
/// Walks every object node once (guarded by node identity), resolves the
/// destination/payload/value roles through the synonym tables, and selects
/// deterministically: a withdraw-selector match wins outright, otherwise
/// candidates rank by nonzero value, then payload length, then discovery
/// order.
pub fn extract_claim_tx(record: &Value) -> Option<TransactionCandidate> {
    let mut candidates = Vec::new();
    let mut seen: HashSet<*const Value> = HashSet::new();
    walk(record, "$", &mut candidates, &mut seen);
    select(candidates)
}

fn walk(
    node: &Value,
    path: &str,
    candidates: &mut Vec<TransactionCandidate>,
    seen: &mut HashSet<*const Value>,
) {
    if !seen.insert(node as *const Value) {
        return;
    }

    match node {
        Value::Object(map) => {
            if let Some(candidate) = candidate_from(map, path) {
                candidates.push(candidate);
            }

            // some portals return the tx object split across sibling keys
            if let Some(tx) = map.get("tx").and_then(Value::as_object) {
                if let Some(candidate) = candidate_from(tx, &format!("{}.tx", path)) {
                    candidates.push(candidate);
                }
            }

            for (key, child) in map {
                if child.is_object() || child.is_array() {
                    walk(child, &format!("{}.{}", path, key), candidates, seen);
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                if child.is_object() || child.is_array() {
                    walk(child, &format!("{}.{}", path, index), candidates, seen);
                }
            }
        }
        _ => {}
    }
}

fn candidate_from(map: &Map<String, Value>, path: &str) -> Option<TransactionCandidate> {
    let to = resolve(map, DESTINATION_KEYS)?;
    let data = resolve(map, CALLDATA_KEYS)?;

    let to = to.as_str().filter(|s| looks_like_address(s))?;
    let data = data.as_str().filter(|s| looks_like_calldata(s))?;

    Some(TransactionCandidate {
        to: to.to_string(),
        data: data.to_string(),
        value: normalize_value(resolve_value(map)),
        source_path: path.to_string(),
    })
}

/// First synonym whose value is truthy (skips null, false, 0 and "").
fn resolve<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|v| is_truthy(v)))
}

/// First synonym that is present and non-null (zero still counts).
fn resolve_value<'a>(map: &'a Map<String, Value>) -> Option<&'a Value> {
    VALUE_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !v.is_null())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Account identifier shape: `0x` followed by exactly 40 hex digits.
fn looks_like_address(raw: &str) -> bool {
    raw.len() == 42
        && raw.starts_with("0x")
        && raw[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Call-data shape: `0x` followed by at least a method selector of hex.
fn looks_like_calldata(raw: &str) -> bool {
    raw.len() >= 10
        && raw.starts_with("0x")
        && raw[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

fn select(mut candidates: Vec<TransactionCandidate>) -> Option<TransactionCandidate> {
    if let Some(position) = candidates
        .iter()
        .position(|c| c.data[..10].eq_ignore_ascii_case(WITHDRAW_SELECTOR))
    {
        return Some(candidates.swap_remove(position));
    }

    // stable sort keeps discovery order among equals
    candidates.sort_by(|a, b| {
        let a_funded = !a.value.is_zero();
        let b_funded = !b.value.is_zero();
        b_funded
            .cmp(&a_funded)
            .then(b.data.len().cmp(&a.data.len()))
    });

    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn addr(fill: char) -> String {
        format!("0x{}", fill.to_string().repeat(40))
    }

    fn calldata(selector: &str, words: usize) -> String {
        format!("{}{}", selector, "0".repeat(64 * words))
    }

    #[test]
    fn test_spec_fixture_selects_withdraw_via_tx_sibling() {
        let record = json!({
            "submission": {
                "tx": {
                    "to": addr('a'),
                    "data": calldata("0x8612372a", 1),
                    "value": "0.0005"
                }
            }
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.to, addr('a'));
        assert_eq!(candidate.value, U256::from(500_000_000_000_000u64));
        assert_eq!(candidate.source_path, "$.submission.tx");
    }

    #[test]
    fn test_selector_beats_value_and_length() {
        let record = json!({
            "rich": {
                "to": addr('b'),
                "data": calldata("0xdeadbeef", 8),
                "value": "123456789"
            },
            "withdraw": {
                "to": addr('c'),
                "data": "0x8612372A00",
                "value": "0"
            }
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.to, addr('c'));
    }

    #[test]
    fn test_nonzero_value_beats_longer_payload() {
        let record = json!({
            "a": { "to": addr('a'), "data": calldata("0x11111111", 10), "value": "0" },
            "b": { "to": addr('b'), "data": calldata("0x22222222", 1), "value": "1" }
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.to, addr('b'));
    }

    #[test]
    fn test_longer_payload_breaks_value_tie() {
        let record = json!({
            "a": { "to": addr('a'), "data": calldata("0x11111111", 1), "value": "7" },
            "b": { "to": addr('b'), "data": calldata("0x22222222", 3), "value": "7" }
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.to, addr('b'));
    }

    #[test]
    fn test_synonym_priority_skips_falsy() {
        let record = json!({
            "to": "",
            "contract": addr('d'),
            "calldata": calldata("0x33333333", 1)
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.to, addr('d'));
        assert_eq!(candidate.source_path, "$");
    }

    #[test]
    fn test_invalid_shapes_yield_none() {
        let record = json!({
            "short_address": { "to": "0xabc", "data": calldata("0x44444444", 1) },
            "short_data": { "to": addr('e'), "data": "0x4444" },
            "not_hex": { "to": addr('f'), "data": "0xzzzzzzzz" },
            "unrelated": { "name": "espresso", "isEligible": true }
        });

        assert!(extract_claim_tx(&record).is_none());
    }

    #[test]
    fn test_missing_value_defaults_to_zero() {
        let record = json!({ "to": addr('a'), "data": calldata("0x55555555", 1) });
        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.value, U256::zero());
    }

    #[test]
    fn test_deeply_nested_record_terminates() {
        let mut record = json!({ "to": addr('a'), "data": calldata("0x66666666", 1) });
        for _ in 0..500 {
            record = json!({ "wrapper": record });
        }

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.to, addr('a'));
    }

    #[test]
    fn test_equal_subtrees_are_distinct_nodes() {
        // value-equal nodes are still visited individually; identity, not
        // equality, is what guards the walk
        let leaf = json!({ "to": addr('a'), "data": calldata("0x77777777", 1), "value": "1" });
        let record = json!({ "first": leaf, "second": leaf });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.source_path, "$.first");
    }

    #[test]
    fn test_array_paths_are_indexed() {
        let record = json!({
            "accounts": [
                { "type": "WALLET" },
                { "to": addr('b'), "data": calldata("0x88888888", 1), "value": "5" }
            ]
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.source_path, "$.accounts.1");
    }

    #[test]
    fn test_value_synonyms_accept_fee() {
        let record = json!({
            "to": addr('a'),
            "data": calldata("0x99999999", 1),
            "fee": "0x3e8"
        });

        let candidate = extract_claim_tx(&record).unwrap();
        assert_eq!(candidate.value, U256::from(1000u64));
    }

    #[test]
    fn test_empty_record_yields_none() {
        assert!(extract_claim_tx(&json!({})).is_none());
        assert!(extract_claim_tx(&json!(null)).is_none());
        assert!(extract_claim_tx(&json!([1, 2, 3])).is_none());
    }
}
