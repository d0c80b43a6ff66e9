//! Loosely-typed transaction input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A transaction as handed over by callers: every field is optional and kept as raw JSON until
/// the builder decides how to read it.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Alias of `gas_limit`, which takes precedence when both are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
}

impl TransactionDescriptor {
    /// Reads a descriptor out of a JSON object. Unknown keys are ignored, and any other JSON value
    /// has no fields at all.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).cloned();

        Self {
            from: field("from"),
            to: field("to"),
            nonce: field("nonce"),
            value: field("value"),
            gas: field("gas"),
            gas_limit: field("gasLimit"),
            gas_price: field("gasPrice"),
            data: field("data"),
            chain_id: field("chainId"),
        }
    }
}
