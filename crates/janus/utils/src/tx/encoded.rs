//! The canonical transaction record and its legacy RLP encoding.

use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::TxSignerSync;
#[allow(deprecated)]
use alloy_primitives::Signature;
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::{is_truthy, HexQuantity, TransactionError, LOG_TARGET};

/// A transaction with every quantity normalized to hex.
///
/// `from` is kept exactly as provided, whatever its JSON type, and only read when signing. `to` is
/// kept as provided too. `gas_price` is always set and defaults to `0x00`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<HexQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<HexQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<HexQuantity>,
    #[serde(default)]
    pub gas_price: HexQuantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<HexQuantity>,
}

/// A [`RawTransaction`] together with its legacy (type 0) encoding.
///
/// Missing quantities are encoded as zero and a missing or empty `to` as a contract creation.
/// `data` is hex-decoded when it starts with `0x` and taken as its UTF-8 bytes otherwise. When a
/// chain id is set the transaction is signed following EIP-155.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTransaction {
    raw: RawTransaction,
    tx: TxLegacy,
}

impl EncodedTransaction {
    /// Encodes `raw`, validating that every field fits its legacy transaction slot.
    pub fn new(raw: RawTransaction) -> Result<Self, TransactionError> {
        let to = match raw.to.as_deref().map(str::trim) {
            None | Some("") => TxKind::Create,
            Some(to) => TxKind::Call(parse_address("to", to)?),
        };

        let input = match raw.data.as_deref() {
            None | Some("") => Bytes::new(),
            Some(data) => match data.strip_prefix("0x") {
                Some(digits) => Bytes::from(hex::decode(digits)?),
                None => Bytes::copy_from_slice(data.as_bytes()),
            },
        };

        let tx = TxLegacy {
            chain_id: raw.chain_id.map(|id| fit_u64("chainId", id)).transpose()?,
            nonce: raw.nonce.map_or(Ok(0), |nonce| fit_u64("nonce", nonce))?,
            gas_price: fit_u128("gasPrice", raw.gas_price)?,
            gas_limit: raw.gas_limit.map_or(Ok(0), |limit| fit_u64("gasLimit", limit))?.into(),
            to,
            value: raw.value.map_or(U256::ZERO, |value| value.value()),
            input,
        };

        Ok(Self { raw, tx })
    }

    pub fn raw(&self) -> &RawTransaction {
        &self.raw
    }

    pub fn tx(&self) -> &TxLegacy {
        &self.tx
    }

    pub fn into_tx(self) -> TxLegacy {
        self.tx
    }

    /// The sender given in the descriptor, if it is a valid address.
    pub fn sender(&self) -> Option<Address> {
        self.raw.from.as_ref()?.as_str()?.trim().parse().ok()
    }

    /// The hash a signer has to sign for this transaction.
    pub fn signature_hash(&self) -> B256 {
        self.tx.signature_hash()
    }

    /// The RLP payload whose keccak256 is the [signature hash](Self::signature_hash).
    pub fn encoded_for_signing(&self) -> Vec<u8> {
        self.tx.encoded_for_signing()
    }

    /// Signs the transaction with `signer`.
    ///
    /// When the descriptor named a `from` address, it has to be the signer's address.
    #[allow(deprecated)]
    pub fn sign<S>(&self, signer: &S) -> Result<SignedTransaction, TransactionError>
    where
        S: TxSignerSync<Signature> + ?Sized,
    {
        if let Some(from) = self.raw.from.as_ref().filter(|from| is_truthy(from)) {
            let expected = match from {
                Value::String(from) => parse_address("from", from.trim())?,
                other => {
                    let value = other.to_string();
                    return Err(TransactionError::InvalidAddress { field: "from", value });
                }
            };
            let actual = signer.address();
            if expected != actual {
                return Err(TransactionError::SenderMismatch { expected, actual });
            }
        }

        let mut tx = self.tx.clone();
        let signature = signer.sign_transaction_sync(&mut tx)?;
        let envelope = TxEnvelope::from(tx.into_signed(signature));

        trace!(target: LOG_TARGET, hash = %envelope.tx_hash(), "Signed transaction.");

        Ok(SignedTransaction { envelope })
    }
}

/// A signed legacy transaction, ready to be broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    envelope: TxEnvelope,
}

impl SignedTransaction {
    pub fn hash(&self) -> B256 {
        *self.envelope.tx_hash()
    }

    pub fn envelope(&self) -> &TxEnvelope {
        &self.envelope
    }

    /// The EIP-2718 encoding, which for legacy transactions is the plain RLP list.
    pub fn raw(&self) -> Vec<u8> {
        self.envelope.encoded_2718()
    }

    /// [`Self::raw`] as `0x` prefixed hex, the form `eth_sendRawTransaction` expects.
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(self.raw()))
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, TransactionError> {
    value.parse().map_err(|_| TransactionError::InvalidAddress { field, value: value.to_string() })
}

fn fit_u64(field: &'static str, quantity: HexQuantity) -> Result<u64, TransactionError> {
    if quantity.value() > U256::from(u64::MAX) {
        return Err(out_of_range(field, quantity, "u64"));
    }
    Ok(quantity.value().to())
}

fn fit_u128(field: &'static str, quantity: HexQuantity) -> Result<u128, TransactionError> {
    if quantity.value() > U256::from(u128::MAX) {
        return Err(out_of_range(field, quantity, "u128"));
    }
    Ok(quantity.value().to())
}

fn out_of_range(
    field: &'static str,
    quantity: HexQuantity,
    max: &'static str,
) -> TransactionError {
    TransactionError::FieldOutOfRange { field, value: quantity.to_string(), max }
}
