use md5::Digest;

pub use crate::enums::HashAlgorithm;

/// Describes a single hash function.
pub trait Hash: Send + Sync {
    /// Which hash function this is, eg, `HashAlgorithm::SHA256`.
    fn algorithm(&self) -> HashAlgorithm;

    /// The length in bytes of this hash function's output.
    fn output_len(&self) -> usize;

    /// Return the output of this hash function with input `data`.
    fn compute(&self, data: &[u8]) -> Output;
}

/// Maximum supported hash output size: supports up to SHA512.
pub(crate) const HASH_MAX_OUTPUT: usize = 64;

/// A hash output, stored as a value.
pub struct Output {
    buf: [u8; HASH_MAX_OUTPUT],
    used: usize,
}

impl Output {
    /// Build a `hash::Output` from a slice of no more than `HASH_MAX_OUTPUT` bytes.
    pub fn new(bytes: &[u8]) -> Self {
        let mut output = Self {
            buf: [0u8; HASH_MAX_OUTPUT],
            used: bytes.len(),
        };
        output.buf[..bytes.len()].copy_from_slice(bytes);
        output
    }
}

impl AsRef<[u8]> for Output {
    fn as_ref(&self) -> &[u8] {
        &self.buf[..self.used]
    }
}

macro_rules! rustcrypto_hash {
    ($name:ident, $pub_static:ident, $digest:ty, $alg:expr, $len:expr) => {
        /// The type backing the matching static; use that instead.
        #[doc(hidden)]
        pub struct $name;

        /// An instance of this hash function.
        pub static $pub_static: $name = $name;

        impl Hash for $name {
            fn algorithm(&self) -> HashAlgorithm {
                $alg
            }

            fn output_len(&self) -> usize {
                $len
            }

            fn compute(&self, data: &[u8]) -> Output {
                Output::new(&<$digest>::digest(data))
            }
        }
    };
}

rustcrypto_hash!(Md5Hash, MD5, md5::Md5, HashAlgorithm::MD5, 16);
rustcrypto_hash!(Sha1Hash, SHA1, sha1::Sha1, HashAlgorithm::SHA1, 20);
rustcrypto_hash!(Sha256Hash, SHA256, sha2::Sha256, HashAlgorithm::SHA256, 32);
rustcrypto_hash!(Sha384Hash, SHA384, sha2::Sha384, HashAlgorithm::SHA384, 48);
rustcrypto_hash!(Sha512Hash, SHA512, sha2::Sha512, HashAlgorithm::SHA512, 64);

/// Look up the implementation of a negotiable signature hash.
pub(crate) fn from_algorithm(alg: HashAlgorithm) -> Option<&'static dyn Hash> {
    match alg {
        HashAlgorithm::SHA1 => Some(&SHA1),
        HashAlgorithm::SHA256 => Some(&SHA256),
        HashAlgorithm::SHA384 => Some(&SHA384),
        HashAlgorithm::SHA512 => Some(&SHA512),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_match_known_values() {
        // digests of the empty string
        assert_eq!(
            MD5.compute(b"").as_ref(),
            &[
                0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80, 0x09, 0x98, 0xec,
                0xf8, 0x42, 0x7e
            ]
        );
        assert_eq!(
            SHA1.compute(b"").as_ref(),
            &[
                0xda, 0x39, 0xa3, 0xee, 0x5e, 0x6b, 0x4b, 0x0d, 0x32, 0x55, 0xbf, 0xef, 0x95,
                0x60, 0x18, 0x90, 0xaf, 0xd8, 0x07, 0x09
            ]
        );
        assert_eq!(
            SHA256.compute(b"").as_ref(),
            &[
                0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99,
                0x6f, 0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95,
                0x99, 0x1b, 0x78, 0x52, 0xb8, 0x55
            ]
        );
    }

    #[test]
    fn output_lengths() {
        let cases: [(&dyn Hash, usize); 5] = [
            (&MD5, 16),
            (&SHA1, 20),
            (&SHA256, 32),
            (&SHA384, 48),
            (&SHA512, 64),
        ];
        for (hash, len) in cases {
            assert_eq!(hash.output_len(), len);
            assert_eq!(hash.compute(b"x").as_ref().len(), len);
        }
    }
}
