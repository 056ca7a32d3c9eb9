//! Binary key layouts for the LMDB databases.

use agora_types::{Address, ProposalId};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Length of a vote-record key: 8-byte proposal id plus a 32-byte voter digest.
pub const VOTE_KEY_LEN: usize = 8 + 32;

/// Key of a vote record: the proposal id (big-endian) followed by the
/// Blake2b-256 digest of the voter's address.
///
/// Fixed width keeps every key under LMDB's key size limit however long the
/// address is. All votes on one proposal share the 8-byte prefix.
pub fn vote_key(id: ProposalId, voter: &Address) -> [u8; VOTE_KEY_LEN] {
    vote_key_from_bytes(id, voter.as_str().as_bytes())
}

pub(crate) fn vote_key_from_bytes(id: ProposalId, voter: &[u8]) -> [u8; VOTE_KEY_LEN] {
    let mut key = [0u8; VOTE_KEY_LEN];
    key[..8].copy_from_slice(&id.to_be_bytes());
    key[8..].copy_from_slice(&Blake2b256::digest(voter));
    key
}
