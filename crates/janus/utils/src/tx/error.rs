use alloy_primitives::Address;
use thiserror::Error;

use crate::QuantityError;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Field `{field}` must be a string, got {kind}")]
    InvalidFieldType { field: &'static str, kind: &'static str },
    #[error("Invalid `{field}` quantity: {source}")]
    InvalidQuantity {
        field: &'static str,
        #[source]
        source: QuantityError,
    },
    #[error("Invalid `{field}` address: {value}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("Invalid transaction data: {0}")]
    InvalidData(#[from] hex::FromHexError),
    #[error("Field `{field}` value {value} exceeds {max}")]
    FieldOutOfRange { field: &'static str, value: String, max: &'static str },
    #[error(transparent)]
    Signing(#[from] alloy_signer::Error),
    #[error("Transaction is from {expected} but the signer is {actual}")]
    SenderMismatch { expected: Address, actual: Address },
}
