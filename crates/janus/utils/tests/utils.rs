use std::time::Duration;

use alloy_primitives::{b256, Address, TxKind, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use assert_matches::assert_matches;
use janus_utils::{
    build_transaction, has_all_keys, sleep_ms, to_map, verify_signature, FieldPresence,
    OnetimeKeyEntry, TransactionBuilder, TransactionError, TxnBuilderConfig, Verification,
    VerificationReport,
};
use serde_json::{json, Value};
use tokio::time::Instant;

const ALICE: &str = "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F";
const BOB: &str = "0x3535353535353535353535353535353535353535";

fn alice() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&b256!(
        "4646464646464646464646464646464646464646464646464646464646464646"
    ))
    .unwrap()
}

#[test_log::test]
fn signed_message_verifies_to_its_signer() {
    let signer = alice();
    let message = "I am alice, here is my onetime key";
    let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
    let signature = format!("0x{}", hex::encode(signature.as_bytes()));

    let verification = verify_signature(message, &signature);

    assert_eq!(verification, Verification::Valid { signer: ALICE.parse().unwrap() });
    assert_eq!(
        VerificationReport::from(verification),
        VerificationReport {
            is_valid: true,
            signer_address: Some(signer.address().to_checksum(None)),
            error: None
        }
    );
}

#[test_log::test]
fn malformed_signature_is_reported_not_raised() {
    for signature in ["", "0x", "0x1234", "zz", &format!("0x{}", "ab".repeat(64))] {
        let verification = verify_signature("hello", signature);

        assert!(!verification.is_valid(), "{signature} should not verify");
        assert_eq!(verification.signer_address(), None);
        assert!(verification.error().is_some());
    }
}

#[test]
fn null_descriptor_builds_nothing() {
    assert!(build_transaction(&Value::Null).unwrap().is_none());
}

#[test]
fn minimal_transaction_only_sets_gas_price() {
    let encoded = build_transaction(&json!({ "from": ALICE, "to": BOB })).unwrap().unwrap();

    assert_eq!(
        serde_json::to_value(encoded.raw()).unwrap(),
        json!({ "from": ALICE, "to": BOB, "gasPrice": "0x00" })
    );
    assert_eq!(encoded.tx().to, TxKind::Call(BOB.parse().unwrap()));
    assert_eq!(encoded.tx().value, U256::ZERO);
}

#[test]
fn odd_descriptors_still_build() {
    let encoded = build_transaction(&json!(true)).unwrap().unwrap();
    assert_eq!(serde_json::to_value(encoded.raw()).unwrap(), json!({ "gasPrice": "0x00" }));
    assert_eq!(encoded.tx().to, TxKind::Create);

    let descriptor: Value =
        serde_json::from_str(&format!(r#"{{ "from": 42, "to": "{BOB}", "gas": 21e3 }}"#)).unwrap();
    let encoded = build_transaction(&descriptor).unwrap().unwrap();
    assert_eq!(encoded.raw().from, Some(json!(42)));
    assert_eq!(encoded.tx().gas_limit, 21000);
}

#[test]
fn explicit_gas_limit_wins_over_gas() {
    let descriptor = json!({ "from": ALICE, "to": BOB, "gas": 21000, "gasLimit": 30000 });

    let encoded = build_transaction(&descriptor).unwrap().unwrap();

    assert_eq!(encoded.raw().gas_limit.unwrap().to_string(), "0x7530");
    assert_eq!(encoded.tx().gas_limit, 30000);
}

#[test]
fn short_addresses_fail_in_the_encoder() {
    let err = build_transaction(&json!({ "from": "0xA", "to": "0xB" })).unwrap_err();
    assert_matches!(err, TransactionError::InvalidAddress { field: "to", .. });
}

#[test_log::test]
fn built_transaction_signs_to_canonical_bytes() {
    let descriptor = json!({
        "from": ALICE,
        "to": BOB,
        "nonce": 9,
        "value": "1000000000000000000",
        "gas": "21000",
        "gasPrice": "0x04a817c800",
        "chainId": 1,
    });

    let encoded = build_transaction(&descriptor).unwrap().unwrap();
    let signed = encoded.sign(&alice()).unwrap();

    assert_eq!(
        signed.raw_hex(),
        concat!(
            "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0",
            "b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590",
            "620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        )
    );
}

#[test]
fn defined_presence_keeps_zero_nonce() {
    let descriptor = json!({ "to": BOB, "nonce": 0 });

    let legacy = build_transaction(&descriptor).unwrap().unwrap();
    assert_eq!(legacy.raw().nonce, None);

    let builder = TransactionBuilder::new(TxnBuilderConfig { presence: FieldPresence::Defined });
    let defined = builder.build(&descriptor).unwrap().unwrap();
    assert_eq!(defined.raw().nonce.unwrap().to_string(), "0x00");
    assert_eq!(defined.tx().nonce, 0);
}

#[test]
fn record_becomes_ordered_map() {
    let map = to_map(&json!({ "a": 1, "b": 2 })).unwrap();

    let entries: Vec<_> = map.into_iter().collect();
    assert_eq!(entries, [("a".to_string(), json!(1)), ("b".to_string(), json!(2))]);
}

#[test]
fn key_map_completeness() {
    let complete: Vec<Option<OnetimeKeyEntry<Address>>> = vec![
        Some(OnetimeKeyEntry::new("p1", Some(Address::repeat_byte(1)))),
        None,
        Some(OnetimeKeyEntry::new("p2", Some(Address::repeat_byte(2)))),
    ];
    assert!(has_all_keys(&complete));

    let missing: Vec<Option<OnetimeKeyEntry<Address>>> =
        vec![Some(OnetimeKeyEntry::new("p1", None))];
    assert!(!has_all_keys(&missing));

    let empty: Vec<Option<OnetimeKeyEntry<Address>>> = Vec::new();
    assert!(has_all_keys(&empty));
}

#[tokio::test]
async fn sleep_does_not_block_other_tasks() {
    let start = Instant::now();

    let ticker = tokio::spawn(async move {
        let mut ticks = 0;
        while start.elapsed() < Duration::from_millis(40) {
            ticks += 1;
            tokio::task::yield_now().await;
        }
        ticks
    });

    sleep_ms(50).await;

    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(ticker.await.unwrap() > 0);
}
