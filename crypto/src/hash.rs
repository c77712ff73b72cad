//! Blake2b hashing and request identifier derivation.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use quorum_types::{AccountId, RequestId};

type Blake2b256 = Blake2b<U32>;

/// Domain separation tag for request identifiers.
const REQUEST_ID_DOMAIN: &[u8] = b"quorum-request";

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Derive the identifier of a freshly created request.
///
/// `nonce` is the ledger's allocation counter and never repeats, so two
/// requests never share an identifier even with identical kind and proposer.
/// The proposer is length-prefixed so `(kind, proposer)` pairs cannot collide
/// by shifting bytes between the two fields.
pub fn derive_request_id(nonce: u64, kind_tag: &str, proposer: &AccountId) -> RequestId {
    let proposer_len = (proposer.as_bytes().len() as u64).to_le_bytes();
    RequestId::new(blake2b_256_multi(&[
        REQUEST_ID_DOMAIN,
        &nonce.to_le_bytes(),
        kind_tag.as_bytes(),
        &proposer_len,
        proposer.as_bytes(),
    ]))
}
