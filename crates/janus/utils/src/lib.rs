#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! Stateless helpers shared by the Janus services.
//!
//! Every function in this crate is a single-call utility without shared state:
//!
//! * [`verify_signature`] recovers the signer of an Ethereum personal message.
//! * [`build_transaction`] turns a loosely-typed JSON descriptor into an [`EncodedTransaction`].
//! * [`to_map`] converts a JSON object into an ordered map.
//! * [`has_all_keys`] checks that every party of a key map has published its onetime key.
//! * [`sleep`] suspends the calling task for a while.

pub mod keys;
pub mod quantity;
pub mod record;
pub mod signature;
pub mod time;
mod tx;

pub use keys::{has_all_keys, parties_missing_keys, OnetimeKeyEntry};
pub use quantity::{hexlify, is_truthy, HexQuantity, QuantityError};
pub use record::{record_to_map, to_map, RecordError};
pub use signature::{
    recover_signer, verify_signature, SignatureVerificationError, Verification, VerificationReport,
};
pub use time::{sleep, sleep_ms};
pub use tx::encoded::*;
pub use tx::error::TransactionError;
pub use tx::*;

pub(crate) const LOG_TARGET: &str = "janus::utils";
