//! Personal message signature verification.

#[allow(deprecated)]
use alloy_primitives::Signature;
use alloy_primitives::{Address, SignatureError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::LOG_TARGET;

/// Length of a `r || s || v` encoded signature.
const SIGNATURE_LENGTH: usize = 65;

#[derive(Debug, thiserror::Error)]
pub enum SignatureVerificationError {
    #[error("Invalid signature hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("Recovered an empty signer address")]
    EmptyAddress,
}

/// The outcome of verifying a message signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The signature recovered to `signer`.
    Valid { signer: Address },
    /// The signature could not be recovered.
    Invalid { reason: String },
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid { .. })
    }

    pub fn signer_address(&self) -> Option<Address> {
        match self {
            Verification::Valid { signer } => Some(*signer),
            Verification::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Verification::Valid { .. } => None,
            Verification::Invalid { reason } => Some(reason),
        }
    }
}

/// JSON view of a [`Verification`], as exchanged with the rest of the system.
///
/// The signer address is rendered with its EIP-55 checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Verification> for VerificationReport {
    fn from(verification: Verification) -> Self {
        match verification {
            Verification::Valid { signer } => Self {
                is_valid: true,
                signer_address: Some(signer.to_checksum(None)),
                error: None,
            },
            Verification::Invalid { reason } => {
                Self { is_valid: false, signer_address: None, error: Some(reason) }
            }
        }
    }
}

/// Recovers the address that signed `message`.
///
/// The message is hashed with the EIP-191 personal message prefix
/// (`"\x19Ethereum Signed Message:\n" + len(message)`) before recovery, so signatures produced by
/// `personal_sign` and wallet `signMessage` calls are accepted.
///
/// # Arguments
///
/// * `message` - the exact bytes that were signed.
/// * `signature` - a 65 bytes `r || s || v` signature encoded as hex, with or without the `0x`
///   prefix. `v` can be given as `0`/`1`, `27`/`28` or as an EIP-155 value.
#[allow(deprecated)]
pub fn recover_signer(
    message: impl AsRef<[u8]>,
    signature: &str,
) -> Result<Address, SignatureVerificationError> {
    let digits = signature.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    let bytes = hex::decode(digits)?;

    if bytes.len() != SIGNATURE_LENGTH {
        return Err(SignatureVerificationError::InvalidLength(bytes.len()));
    }

    let signature = Signature::try_from(bytes.as_slice())?;
    let signer = signature.recover_address_from_msg(message.as_ref())?;

    if signer == Address::ZERO {
        return Err(SignatureVerificationError::EmptyAddress);
    }

    Ok(signer)
}

/// Verifies that `signature` is a valid signature of `message`.
///
/// Failures never escape this function: they are reported as [`Verification::Invalid`] with the
/// failure detail as reason.
pub fn verify_signature(message: impl AsRef<[u8]>, signature: &str) -> Verification {
    match recover_signer(message, signature) {
        Ok(signer) => {
            trace!(target: LOG_TARGET, %signer, "Recovered message signer.");
            Verification::Valid { signer }
        }
        Err(error) => {
            debug!(target: LOG_TARGET, %error, "Message signature verification failed.");
            Verification::Invalid { reason: error.to_string() }
        }
    }
}
