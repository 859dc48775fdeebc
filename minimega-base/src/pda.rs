//! Program-derived address utilities

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use crate::error::{EncodeError, EncodeResult};
use crate::programs::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::pubkey::Pubkey;

pub const MAX_SEED_LEN: usize = 32;
pub const MAX_SEEDS: usize = 16;
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

pub const MARKETPLACE_SEED: &[u8] = b"marketplace";
pub const COLLECTION_SEED: &[u8] = b"collection";
pub const ITEM_TYPE_SEED: &[u8] = b"type";
pub const PRESALE_CONFIG_SEED: &[u8] = b"presale_config";
pub const DONATION_CONFIG_SEED: &[u8] = b"donation_config";
pub const PRESALE_SEED: &[u8] = b"presale";
pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

fn check_seeds(seeds: &[&[u8]]) -> EncodeResult<()> {
    // one slot is reserved for the bump
    if seeds.len() >= MAX_SEEDS {
        return Err(EncodeError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS - 1,
        });
    }
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(EncodeError::SeedTooLong { len: seed.len() });
    }
    Ok(())
}

fn hash_candidate(seeds: &[&[u8]], bump: Option<u8>, program_id: &Pubkey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    if let Some(bump) = bump {
        hasher.update([bump]);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

/// Derive the address for `seeds` with an explicit bump already appended
///
/// Returns `None` when the hash lands on the ed25519 curve, which would make
/// the address signable by a private key.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> EncodeResult<Option<Pubkey>> {
    if seeds.len() > MAX_SEEDS {
        return Err(EncodeError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(EncodeError::SeedTooLong { len: seed.len() });
    }
    let candidate = hash_candidate(seeds, None, program_id);
    Ok((!is_on_curve(&candidate)).then(|| Pubkey::new(candidate)))
}

/// Find the first off-curve address for `seeds`, searching bumps from 255 down
///
/// # Returns
/// The derived address and the bump that produced it
///
/// # Errors
/// Returns an error if a seed is longer than 32 bytes, there are too many
/// seeds, or no bump yields an off-curve point
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    check_seeds(seeds)?;
    for bump in (0..=u8::MAX).rev() {
        let candidate = hash_candidate(seeds, Some(bump), program_id);
        if !is_on_curve(&candidate) {
            return Ok((Pubkey::new(candidate), bump));
        }
    }
    Err(EncodeError::NoViableBump)
}

pub fn marketplace_address(program_id: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(&[MARKETPLACE_SEED], program_id)
}

pub fn collection_address(program_id: &Pubkey, name: &str) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(&[COLLECTION_SEED, name.as_bytes()], program_id)
}

pub fn item_type_address(
    program_id: &Pubkey,
    collection: &Pubkey,
    name: &str,
) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(
        &[ITEM_TYPE_SEED, collection.as_ref(), name.as_bytes()],
        program_id,
    )
}

pub fn presale_config_address(program_id: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(&[PRESALE_CONFIG_SEED], program_id)
}

pub fn donation_config_address(program_id: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(&[DONATION_CONFIG_SEED], program_id)
}

/// Treasury account that receives presale proceeds
pub fn presale_address(program_id: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(&[PRESALE_SEED], program_id)
}

/// Token metadata account for `mint`
pub fn metadata_address(mint: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(
        &[METADATA_SEED, TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

pub fn master_edition_address(mint: &Pubkey) -> EncodeResult<(Pubkey, u8)> {
    find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Associated token account holding `mint` for `owner`
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> EncodeResult<Pubkey> {
    find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}
