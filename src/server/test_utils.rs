use std::sync::{Mutex, OnceLock};

use rsa::RsaPrivateKey;

use crate::crypto::rsa::RsaSigningKey;
use crate::crypto::SecureRandom;
use crate::error::GetRandomFailed;

/// A deterministic "random" source: a wrapping byte counter.  Handshakes
/// driven with this are reproducible byte for byte.
pub(crate) struct SequenceRandom {
    next: Mutex<u8>,
}

impl SequenceRandom {
    pub(crate) fn leaked() -> &'static Self {
        Box::leak(Box::new(Self {
            next: Mutex::new(0),
        }))
    }
}

impl SecureRandom for SequenceRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GetRandomFailed> {
        let mut next = self.next.lock().unwrap();
        for b in buf.iter_mut() {
            *b = *next;
            *next = next.wrapping_add(1);
        }
        Ok(())
    }
}

static TEST_KEY: OnceLock<RsaPrivateKey> = OnceLock::new();

/// A 2048-bit RSA key generated once per test process.
pub(crate) fn test_raw_rsa_key() -> &'static RsaPrivateKey {
    TEST_KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).expect("generate test key")
    })
}

pub(crate) fn test_rsa_key() -> RsaSigningKey {
    RsaSigningKey::from(test_raw_rsa_key().clone())
}
