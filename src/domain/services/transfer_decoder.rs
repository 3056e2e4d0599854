//! Extracts normalized transfer events from raw transaction JSON
//!
//! Only programmable transactions are inspected, and of their command list
//! only the two transfer-shaped commands (`TransferObjects`, `TransferSui`)
//! produce events. Everything malformed is skipped without aborting the
//! surrounding checkpoint loop.

use serde_json::Value;

use crate::domain::models::{
    is_valid_vid, normalize_address, RecipientRef, TransferEdge, TransferKind,
};

/// Result of decoding one transaction
#[derive(Debug, Default)]
pub struct DecodeOutcome {
    /// One event per accepted transfer command
    pub events: Vec<TransferEdge>,
    /// Transfer commands whose recipient could not be resolved
    pub unresolved_recipients: usize,
}

/// Extract zero or more transfer events from a decoded transaction block.
///
/// Skips the whole transaction when it has no resolvable sender or is not
/// a programmable transaction. Within the command list, a command whose
/// recipient cannot be resolved (counted in `unresolved_recipients`) or
/// resolves to the sender itself is skipped; other commands in the same
/// transaction still proceed.
pub fn extract_transfers(digest: &str, tx: &Value, timestamp_ms: i64) -> DecodeOutcome {
    let mut outcome = DecodeOutcome::default();

    let data = &tx["transaction"]["data"];
    let sender_raw = match data.get("sender").and_then(Value::as_str) {
        Some(sender) => sender,
        None => return outcome,
    };
    let sender = normalize_address(sender_raw);

    let program = &data["transaction"];
    if program.get("kind").and_then(Value::as_str) != Some("ProgrammableTransaction") {
        return outcome;
    }

    let empty = Vec::new();
    let inputs = program
        .get("inputs")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let commands = program
        .get("transactions")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let gas_used = read_gas_used(tx);
    let success = tx["effects"]["status"]["status"].as_str() == Some("success");

    for command in commands {
        let (kind, recipient_arg) = match recognize_command(command) {
            Some(found) => found,
            None => continue,
        };

        let recipient = RecipientRef::parse(recipient_arg)
            .and_then(|recipient_ref| recipient_ref.resolve(inputs))
            .filter(|addr| is_valid_vid(addr));

        let recipient = match recipient {
            Some(addr) => addr,
            None => {
                outcome.unresolved_recipients += 1;
                continue;
            }
        };

        // Self-transfers never create an edge or a wallet update
        if recipient == sender {
            continue;
        }

        outcome.events.push(TransferEdge {
            src: sender.clone(),
            dst: recipient,
            amount: 0.0,
            timestamp_ms,
            tx_hash: digest.to_string(),
            gas_used,
            success,
            kind,
        });
    }

    outcome
}

/// Recognize the two transfer command shapes and locate their recipient
/// argument: `TransferObjects` carries it as the second tuple element,
/// `TransferSui` as the last array element.
fn recognize_command(command: &Value) -> Option<(TransferKind, &Value)> {
    if let Some(args) = command.get("TransferObjects").and_then(Value::as_array) {
        return args.get(1).map(|arg| (TransferKind::TransferObjects, arg));
    }
    if let Some(args) = command.get("TransferSui").and_then(Value::as_array) {
        return args.last().map(|arg| (TransferKind::TransferSui, arg));
    }
    None
}

/// Gas is reported as `effects.gasUsed.computationCost`, usually a decimal
/// string but occasionally a bare number
fn read_gas_used(tx: &Value) -> u64 {
    let cost = &tx["effects"]["gasUsed"]["computationCost"];
    cost.as_u64()
        .or_else(|| cost.as_str().and_then(|s| s.parse::<u64>().ok()))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn programmable_tx(sender: &str, commands: Value, inputs: Value) -> Value {
        json!({
            "transaction": {
                "data": {
                    "sender": sender,
                    "transaction": {
                        "kind": "ProgrammableTransaction",
                        "inputs": inputs,
                        "transactions": commands,
                    }
                }
            },
            "effects": {
                "gasUsed": { "computationCost": "10" },
                "status": { "status": "success" }
            }
        })
    }

    #[test]
    fn test_transfer_sui_with_literal_recipient() {
        let tx = programmable_tx(
            "0x1",
            json!([{ "TransferSui": [{ "Input": 0 }, { "AddressOwner": "0x2" }] }]),
            json!([]),
        );
        let outcome = extract_transfers("digest-1", &tx, 1_000);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.unresolved_recipients, 0);

        let event = &outcome.events[0];
        assert_eq!(event.kind, TransferKind::TransferSui);
        assert_eq!(event.gas_used, 10);
        assert!(event.success);
        assert!(event.src.ends_with('1'));
        assert!(event.dst.ends_with('2'));
    }

    #[test]
    fn test_transfer_objects_with_input_recipient() {
        let tx = programmable_tx(
            "0x1",
            json!([{ "TransferObjects": [[{ "Result": 0 }], { "Input": 0 }] }]),
            json!([{ "type": "pure", "value": "0x2" }]),
        );
        let outcome = extract_transfers("digest-2", &tx, 1_000);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].kind, TransferKind::TransferObjects);
    }

    #[test]
    fn test_self_transfer_is_discarded_silently() {
        let tx = programmable_tx(
            "0x1",
            json!([{ "TransferSui": [{ "AddressOwner": "0x1" }] }]),
            json!([]),
        );
        let outcome = extract_transfers("digest-3", &tx, 1_000);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.unresolved_recipients, 0);
    }

    #[test]
    fn test_unresolved_recipient_is_counted() {
        let tx = programmable_tx(
            "0x1",
            json!([{ "TransferSui": [{ "Input": 7 }] }]),
            json!([]),
        );
        let outcome = extract_transfers("digest-4", &tx, 1_000);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.unresolved_recipients, 1);
    }

    #[test]
    fn test_one_bad_command_does_not_stop_the_rest() {
        let tx = programmable_tx(
            "0x1",
            json!([
                { "TransferSui": [{ "Input": 7 }] },
                { "SplitCoins": ["GasCoin", []] },
                { "TransferSui": [{ "AddressOwner": "0x2" }] },
            ]),
            json!([]),
        );
        let outcome = extract_transfers("digest-5", &tx, 1_000);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.unresolved_recipients, 1);
    }

    #[test]
    fn test_missing_sender_skips_transaction() {
        let tx = json!({ "transaction": { "data": {} } });
        let outcome = extract_transfers("digest-6", &tx, 1_000);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_non_programmable_kind_skips_transaction() {
        let tx = json!({
            "transaction": {
                "data": {
                    "sender": "0x1",
                    "transaction": { "kind": "ChangeEpoch" }
                }
            }
        });
        let outcome = extract_transfers("digest-7", &tx, 1_000);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_failed_transaction_still_emits_edge() {
        let mut tx = programmable_tx(
            "0x1",
            json!([{ "TransferSui": [{ "AddressOwner": "0x2" }] }]),
            json!([]),
        );
        tx["effects"]["status"]["status"] = json!("failure");
        let outcome = extract_transfers("digest-8", &tx, 1_000);
        assert_eq!(outcome.events.len(), 1);
        assert!(!outcome.events[0].success);
    }
}
