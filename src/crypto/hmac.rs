use hmac::{Hmac as HmacCtx, Mac};

/// A concrete HMAC implementation, reified with a hash function.
///
/// There is one object implementing this trait for HMAC-MD5, another for
/// HMAC-SHA1, etc.
pub trait Hmac: Send + Sync {
    /// Prepare to use `key` as a HMAC key.
    fn with_key(&self, key: &[u8]) -> Box<dyn Key>;

    /// Give the length of the underlying hash function.
    fn hash_output_len(&self) -> usize;
}

/// Maximum supported HMAC tag size: supports up to SHA512.
pub(crate) const HMAC_MAX_TAG: usize = 64;

/// A HMAC tag, stored as a value.
#[derive(Clone)]
pub struct Tag {
    buf: [u8; HMAC_MAX_TAG],
    used: usize,
}

impl Tag {
    /// Build a tag by copying a byte slice.
    ///
    /// The slice can be up to `HMAC_MAX_TAG` bytes in length.
    pub fn new(bytes: &[u8]) -> Self {
        let mut tag = Self {
            buf: [0u8; HMAC_MAX_TAG],
            used: bytes.len(),
        };
        tag.buf[..bytes.len()].copy_from_slice(bytes);
        tag
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.buf[..self.used]
    }
}

/// A HMAC key that is ready for use.
///
/// The algorithm used is implicit in the `Hmac` object that produced the key.
pub trait Key: Send + Sync {
    /// Calculates a tag over `data` -- a slice of byte slices.
    fn sign(&self, data: &[&[u8]]) -> Tag;

    /// Returns the length of the tag returned by a computation using
    /// this key.
    fn tag_len(&self) -> usize;
}

macro_rules! rustcrypto_hmac {
    ($name:ident, $key_name:ident, $pub_static:ident, $digest:ty, $len:expr) => {
        /// The type backing the matching static; use that instead.
        #[doc(hidden)]
        pub struct $name;

        /// An instance of HMAC with this hash function.
        pub static $pub_static: $name = $name;

        impl Hmac for $name {
            fn with_key(&self, key: &[u8]) -> Box<dyn Key> {
                // HMAC is defined for keys of any length
                Box::new($key_name(
                    HmacCtx::<$digest>::new_from_slice(key).expect("hmac key"),
                ))
            }

            fn hash_output_len(&self) -> usize {
                $len
            }
        }

        struct $key_name(HmacCtx<$digest>);

        impl Key for $key_name {
            fn sign(&self, data: &[&[u8]]) -> Tag {
                let mut ctx = self.0.clone();
                for d in data {
                    ctx.update(d);
                }
                Tag::new(&ctx.finalize().into_bytes())
            }

            fn tag_len(&self) -> usize {
                $len
            }
        }
    };
}

rustcrypto_hmac!(HmacMd5, HmacMd5Key, HMAC_MD5, md5::Md5, 16);
rustcrypto_hmac!(HmacSha1, HmacSha1Key, HMAC_SHA1, sha1::Sha1, 20);
rustcrypto_hmac!(HmacSha256, HmacSha256Key, HMAC_SHA256, sha2::Sha256, 32);
rustcrypto_hmac!(HmacSha384, HmacSha384Key, HMAC_SHA384, sha2::Sha384, 48);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc2202_hmac_sha1_vector() {
        // RFC2202 test case 2
        let key = b"Jefe";
        let data = b"what do ya want for nothing?";
        let tag = HMAC_SHA1.with_key(key).sign(&[data]);
        assert_eq!(
            tag.as_ref(),
            &[
                0xef, 0xfc, 0xdf, 0x6a, 0xe5, 0xeb, 0x2f, 0xa2, 0xd2, 0x74, 0x16, 0xd5, 0xf1,
                0x84, 0xdf, 0x9c, 0x25, 0x9a, 0x7c, 0x79
            ]
        );
    }

    #[test]
    fn sign_is_concatenation() {
        let key = HMAC_SHA256.with_key(b"key");
        let joined = key.sign(&[b"hello ", b"world"]);
        let whole = key.sign(&[b"hello world"]);
        assert_eq!(joined.as_ref(), whole.as_ref());
        assert_eq!(key.tag_len(), 32);
        assert_eq!(HMAC_MD5.hash_output_len(), 16);
        assert_eq!(HMAC_SHA384.hash_output_len(), 48);
    }
}
