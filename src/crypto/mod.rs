//! Narrow interfaces over the cryptographic primitives the handshake
//! needs, so the state machine stays independent of any one
//! implementation and tests can substitute deterministic randomness.

use zeroize::Zeroize;

use crate::error::GetRandomFailed;

pub mod dh;
pub mod hash;
pub mod hmac;
pub(crate) mod prf;
pub mod rsa;

/// A source of cryptographically secure randomness.
///
/// The sole mutable external collaborator of the handshake: given the
/// same inputs and the same bytes from this trait, a handshake is
/// byte-identical.
pub trait SecureRandom: Send + Sync {
    /// Fill the given buffer with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), GetRandomFailed>;
}

/// The operating system's random source.
#[derive(Debug)]
pub struct SystemRandom;

impl SecureRandom for SystemRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GetRandomFailed> {
        use rand::RngCore;

        rand::rngs::OsRng
            .try_fill_bytes(buf)
            .map_err(|_| GetRandomFailed)
    }
}

/// The result of a completed key exchange: the raw premaster secret.
///
/// Cleared on drop; callers should let it go out of scope as soon as the
/// master secret has been derived.
pub struct SharedSecret {
    buf: Vec<u8>,
}

impl SharedSecret {
    pub fn secret_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl From<Vec<u8>> for SharedSecret {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf }
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}
