//! The single place where we generate random material for our own use.

use crate::crypto::SecureRandom;
use crate::error::GetRandomFailed;

/// Make an array of size `N` containing random material.
pub(crate) fn random_array<const N: usize>(
    secure_random: &dyn SecureRandom,
) -> Result<[u8; N], GetRandomFailed> {
    let mut v = [0; N];
    secure_random.fill(&mut v)?;
    Ok(v)
}
