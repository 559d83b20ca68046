use pki_types::PrivateKeyDer;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey};

use crate::enums::HashAlgorithm;
use crate::error::Error;

/// An RSA private key usable for both the RSA key exchange (PKCS#1 v1.5
/// decryption of the premaster secret) and ServerKeyExchange signing.
pub struct RsaSigningKey {
    key: RsaPrivateKey,
}

impl RsaSigningKey {
    /// Load a key from PKCS#8 or PKCS#1 DER.
    pub fn new(der: &PrivateKeyDer<'_>) -> Result<Self, Error> {
        let key = match der {
            PrivateKeyDer::Pkcs8(der) => RsaPrivateKey::from_pkcs8_der(der.secret_pkcs8_der())
                .map_err(|_| Error::Crypto("invalid pkcs8 rsa key")),
            PrivateKeyDer::Pkcs1(der) => RsaPrivateKey::from_pkcs1_der(der.secret_pkcs1_der())
                .map_err(|_| Error::Crypto("invalid pkcs1 rsa key")),
            _ => Err(Error::Crypto("unsupported private key encoding")),
        }?;

        Ok(Self { key })
    }

    /// Attempt PKCS#1 v1.5 decryption of an encrypted premaster secret.
    ///
    /// All failure modes collapse into `None`; the caller is responsible
    /// for the Bleichenbacher countermeasure and must not let the outcome
    /// influence anything the peer can observe.
    pub fn decrypt_pms(&self, ciphertext: &[u8]) -> Option<Vec<u8>> {
        self.key
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .ok()
    }

    /// Sign `digests` with PKCS#1 v1.5 and no DigestInfo prefix.
    ///
    /// This is the TLS 1.0/1.1 form, over the raw 36-byte
    /// MD5(x) || SHA1(x) concatenation.
    pub fn sign_concatenated(&self, digests: &[u8]) -> Result<Vec<u8>, Error> {
        self.key
            .sign(Pkcs1v15Sign::new_unprefixed(), digests)
            .map_err(|_| Error::Crypto("rsa signing failed"))
    }

    /// Sign a single `digest` with PKCS#1 v1.5, wrapped in the DigestInfo
    /// structure naming `hash`.  This is the TLS 1.2 form.
    pub fn sign_prehashed(&self, hash: HashAlgorithm, digest: &[u8]) -> Result<Vec<u8>, Error> {
        let padding = match hash {
            HashAlgorithm::SHA1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
            HashAlgorithm::SHA256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
            HashAlgorithm::SHA384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
            HashAlgorithm::SHA512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
            _ => return Err(Error::Crypto("unsupported signature hash")),
        };

        self.key
            .sign(padding, digest)
            .map_err(|_| Error::Crypto("rsa signing failed"))
    }
}

impl From<RsaPrivateKey> for RsaSigningKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self { key }
    }
}

impl core::fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RsaSigningKey").finish_non_exhaustive()
    }
}
