//! LMDB environment setup.

use std::path::Path;

use agora_types::ProposalId;
use heed::byteorder::BigEndian;
use heed::types::{Bytes, Unit, U64};
use heed::{Database, Env, EnvOpenOptions, RwTxn};

use crate::keys::vote_key_from_bytes;
use crate::LmdbError;

/// The schema version that the current code writes.
///
/// - 1: vote keys are `id_be || voter_utf8`.
/// - 2: vote keys are `id_be || blake2b_256(voter)`.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    /// Proposal id (big-endian) -> encoded proposal.
    pub(crate) proposals_db: Database<U64<BigEndian>, Bytes>,
    /// `id_be || voter` -> ().
    pub(crate) votes_db: Database<Bytes, Unit>,
    /// Proposal id (big-endian) -> (), the active index.
    pub(crate) active_db: Database<U64<BigEndian>, Unit>,
    /// Named scalars: schema version, proposal count.
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this
        // process and the memory map is never accessed outside heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let proposals_db = env.create_database(&mut wtxn, Some("proposals"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let active_db = env.create_database(&mut wtxn, Some("active"))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;

        let found = match meta_db.get(&wtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => decode_u32(bytes)?,
            None => 0,
        };
        if found > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::SchemaTooNew {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if found < CURRENT_SCHEMA_VERSION {
            for version in found..CURRENT_SCHEMA_VERSION {
                tracing::info!(from = version, to = version + 1, "running migration");
                run_migration(&mut wtxn, votes_db, version)?;
            }
            meta_db.put(
                &mut wtxn,
                SCHEMA_VERSION_KEY,
                &CURRENT_SCHEMA_VERSION.to_le_bytes(),
            )?;
            tracing::info!(version = CURRENT_SCHEMA_VERSION, "database schema is up to date");
        }
        // Migrations and the version bump commit together or not at all.
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env,
            proposals_db,
            votes_db,
            active_db,
            meta_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Stored schema version.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => decode_u32(bytes),
            None => Ok(0),
        }
    }

    /// Flush and close the environment, blocking until LMDB released it.
    pub fn close(self) {
        let LmdbEnvironment { env, .. } = self;
        env.prepare_for_closing().wait();
    }
}

/// Upgrade the stored data from schema `from` to `from + 1`.
fn run_migration(
    wtxn: &mut RwTxn<'_>,
    votes_db: Database<Bytes, Unit>,
    from: u32,
) -> Result<(), LmdbError> {
    match from {
        // Fresh database.
        0 => Ok(()),
        1 => rekey_votes(wtxn, votes_db),
        other => Err(LmdbError::Heed(format!(
            "unknown migration: {} -> {}",
            other,
            other + 1
        ))),
    }
}

/// Replace `id_be || voter_utf8` vote keys with fixed-width hashed keys.
fn rekey_votes(wtxn: &mut RwTxn<'_>, votes_db: Database<Bytes, Unit>) -> Result<(), LmdbError> {
    let mut old_keys = Vec::new();
    for entry in votes_db.iter(wtxn)? {
        let (key, ()) = entry?;
        old_keys.push(key.to_vec());
    }
    votes_db.clear(wtxn)?;
    for key in &old_keys {
        if key.len() < 8 {
            return Err(LmdbError::Serialization(format!(
                "vote key of {} bytes has no proposal id",
                key.len()
            )));
        }
        let mut id = [0u8; 8];
        id.copy_from_slice(&key[..8]);
        let new_key = vote_key_from_bytes(ProposalId::from_be_bytes(id), &key[8..]);
        votes_db.put(wtxn, &new_key[..], &())?;
    }
    tracing::info!(votes = old_keys.len(), "re-keyed vote records");
    Ok(())
}

pub(crate) fn decode_u32(bytes: &[u8]) -> Result<u32, LmdbError> {
    let arr: [u8; 4] = bytes.try_into().map_err(|_| {
        LmdbError::Serialization(format!("expected 4 bytes, found {}", bytes.len()))
    })?;
    Ok(u32::from_le_bytes(arr))
}

pub(crate) fn decode_u64(bytes: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| {
        LmdbError::Serialization(format!("expected 8 bytes, found {}", bytes.len()))
    })?;
    Ok(u64::from_le_bytes(arr))
}
