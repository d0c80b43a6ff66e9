pub mod encoded;
pub mod error;

mod descriptor;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

pub use self::descriptor::TransactionDescriptor;
use crate::quantity::kind_of;
use crate::{
    hexlify, is_truthy, EncodedTransaction, HexQuantity, RawTransaction, TransactionError,
    LOG_TARGET,
};

/// How the builder decides that an optional descriptor field was provided.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPresence {
    /// A field is provided when its value is truthy. `0`, `""` and `false` are skipped like
    /// missing fields, which is what existing callers rely on.
    #[default]
    Truthy,
    /// A field is provided whenever it is set to something other than `null`.
    Defined,
}

impl FieldPresence {
    pub fn is_present(&self, value: &Value) -> bool {
        match self {
            FieldPresence::Truthy => is_truthy(value),
            FieldPresence::Defined => !value.is_null(),
        }
    }
}

/// The configuration of a [`TransactionBuilder`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnBuilderConfig {
    #[serde(default)]
    pub presence: FieldPresence,
}

impl TxnBuilderConfig {
    /// Load the config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let buf = std::fs::read(path)
            .with_context(|| format!("Failed to read builder config {}", path.display()))?;
        serde_json::from_slice(&buf)
            .with_context(|| format!("Failed to parse builder config {}", path.display()))
    }

}

/// Builds [`EncodedTransaction`]s out of loosely-typed descriptors.
#[derive(Debug, Default, Clone)]
pub struct TransactionBuilder {
    config: TxnBuilderConfig,
}

impl TransactionBuilder {
    pub fn new(config: TxnBuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TxnBuilderConfig {
        &self.config
    }

    /// Builds and encodes the transaction described by `descriptor`.
    ///
    /// Returns `Ok(None)` when the descriptor itself is falsy (`null`, `false`, `0` or `""`). A
    /// truthy descriptor that is not an object has no fields and builds a contract creation with
    /// only `gasPrice` set. Errors raised while encoding the collected fields are returned as is.
    pub fn build(
        &self,
        descriptor: &Value,
    ) -> Result<Option<EncodedTransaction>, TransactionError> {
        if !is_truthy(descriptor) {
            trace!(target: LOG_TARGET, "No transaction descriptor, nothing to build.");
            return Ok(None);
        }

        let descriptor = TransactionDescriptor::from_value(descriptor);
        let raw = self.collect(&descriptor)?;
        trace!(target: LOG_TARGET, ?raw, "Collected raw transaction.");

        EncodedTransaction::new(raw).map(Some)
    }

    /// Normalizes the descriptor fields into a [`RawTransaction`], hex encoding every quantity.
    pub fn collect(
        &self,
        descriptor: &TransactionDescriptor,
    ) -> Result<RawTransaction, TransactionError> {
        let mut raw = RawTransaction {
            from: descriptor.from.clone().filter(|from| !from.is_null()),
            to: text_field("to", descriptor.to.as_ref())?,
            ..Default::default()
        };

        if let Some(nonce) = self.present(&descriptor.nonce) {
            raw.nonce = Some(quantity("nonce", nonce)?);
        }
        if let Some(value) = self.present(&descriptor.value) {
            raw.value = Some(quantity("value", value)?);
        }
        if let Some(gas) = self.present(&descriptor.gas) {
            raw.gas_limit = Some(quantity("gas", gas)?);
        }
        // Checked after `gas` so an explicit limit always wins.
        if let Some(gas_limit) = self.present(&descriptor.gas_limit) {
            raw.gas_limit = Some(quantity("gasLimit", gas_limit)?);
        }
        raw.gas_price = match self.present(&descriptor.gas_price) {
            Some(gas_price) => quantity("gasPrice", gas_price)?,
            None => HexQuantity::ZERO,
        };
        if let Some(data) = self.present(&descriptor.data) {
            raw.data = text_field("data", Some(data))?;
        }
        if let Some(chain_id) = self.present(&descriptor.chain_id) {
            raw.chain_id = Some(quantity("chainId", chain_id)?);
        }

        Ok(raw)
    }

    fn present<'a>(&self, value: &'a Option<Value>) -> Option<&'a Value> {
        value.as_ref().filter(|v| self.config.presence.is_present(v))
    }
}

/// Builds a transaction with the default [`TxnBuilderConfig`].
pub fn build_transaction(
    descriptor: &Value,
) -> Result<Option<EncodedTransaction>, TransactionError> {
    TransactionBuilder::default().build(descriptor)
}

fn quantity(field: &'static str, value: &Value) -> Result<HexQuantity, TransactionError> {
    hexlify(value).map_err(|source| TransactionError::InvalidQuantity { field, source })
}

fn text_field(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<String>, TransactionError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(TransactionError::InvalidFieldType { field, kind: kind_of(other) }),
    }
}
