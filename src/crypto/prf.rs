//! The TLS pseudo-random functions.
//!
//! TLS 1.2 (RFC5246 section 5) uses a single P_hash keyed with the whole
//! secret; the hash is bound to the negotiated cipher suite.  TLS 1.0 and
//! 1.1 (RFC2246 section 5) split the secret between P_MD5 and P_SHA1 and
//! XOR the two streams.

use zeroize::Zeroize;

use super::hmac;

pub(crate) fn prf(out: &mut [u8], hmac: &dyn hmac::Hmac, secret: &[u8], label: &[u8], seed: &[u8]) {
    let hmac_key = hmac.with_key(secret);

    // A(1)
    let mut current_a = hmac_key.sign(&[label, seed]);

    let chunk_size = hmac_key.tag_len();
    for chunk in out.chunks_mut(chunk_size) {
        // P_hash[i] = HMAC_hash(secret, A(i) + seed)
        let p_term = hmac_key.sign(&[current_a.as_ref(), label, seed]);
        chunk.copy_from_slice(&p_term.as_ref()[..chunk.len()]);

        // A(i+1) = HMAC_hash(secret, A(i))
        current_a = hmac_key.sign(&[current_a.as_ref()]);
    }
}

/// The TLS 1.0/1.1 PRF: `P_MD5(S1, ...) XOR P_SHA1(S2, ...)`.
///
/// S1 and S2 are the two halves of the secret; when the length is odd
/// the middle byte belongs to both.
pub(crate) fn prf_legacy(out: &mut [u8], secret: &[u8], label: &[u8], seed: &[u8]) {
    let half = (secret.len() + 1) / 2;
    let s1 = &secret[..half];
    let s2 = &secret[secret.len() - half..];

    let mut sha1_out = vec![0u8; out.len()];
    prf(out, &hmac::HMAC_MD5, s1, label, seed);
    prf(&mut sha1_out, &hmac::HMAC_SHA1, s2, label, seed);

    for (md5_byte, sha1_byte) in out.iter_mut().zip(sha1_out.iter()) {
        *md5_byte ^= sha1_byte;
    }

    sha1_out.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hmac::HMAC_SHA256;

    // Known answer test from
    // https://mailarchive.ietf.org/arch/msg/tls/fzVCzk-z3FShgGJ6DOXqM1ydxms/
    #[test]
    fn check_sha256() {
        let secret = b"\x9b\xbe\x43\x6b\xa9\x40\xf0\x17\xb1\x76\x52\x84\x9a\x71\xdb\x35";
        let seed = b"\xa0\xba\x9f\x93\x6c\xda\x31\x18\x27\xa6\xf7\x96\xff\xd5\x19\x8c";
        let label = b"test label";
        let expect: &[u8] = &[
            0xe3, 0xf2, 0x29, 0xba, 0x72, 0x7b, 0xe1, 0x7b, 0x8d, 0x12, 0x26, 0x20, 0x55, 0x7c,
            0xd4, 0x53, 0xc2, 0xaa, 0xb2, 0x1d, 0x07, 0xc3, 0xd4, 0x95, 0x32, 0x9b, 0x52, 0xd4,
            0xe6, 0x1e, 0xdb, 0x5a, 0x6b, 0x30, 0x17, 0x91, 0xe9, 0x0d, 0x35, 0xc9, 0xc9, 0xa4,
            0x6b, 0x4e, 0x14, 0xba, 0xf9, 0xaf, 0x0f, 0xa0, 0x22, 0xf7, 0x07, 0x7d, 0xef, 0x17,
            0xab, 0xfd, 0x37, 0x97, 0xc0, 0x56, 0x4b, 0xab, 0x4f, 0xbc, 0x91, 0x66, 0x6e, 0x9d,
            0xef, 0x9b, 0x97, 0xfc, 0xb6, 0x27, 0x26, 0xc5, 0x7d, 0xd2, 0xef, 0x0a, 0x3c, 0x53,
            0x7f, 0x3a, 0x90, 0xb1, 0x7b, 0x32, 0xb9, 0x49, 0xf9, 0x18, 0x7c, 0xa1, 0x5a, 0xe6,
            0xd2, 0x9f,
        ];
        let mut output = [0u8; 100];

        prf(&mut output, &HMAC_SHA256, secret, label, seed);
        assert_eq!(expect, &output[..]);
    }

    #[test]
    fn legacy_prf_is_xor_of_both_streams() {
        let secret = [0x0bu8; 20];
        let mut split_output = [0u8; 32];
        prf_legacy(&mut split_output, &secret, b"test", &[0x42; 8]);

        // cross-check against the two P_hash streams computed separately
        let mut md5_stream = [0u8; 32];
        let mut sha1_stream = [0u8; 32];
        prf(&mut md5_stream, &crate::crypto::hmac::HMAC_MD5, &secret[..10], b"test", &[0x42; 8]);
        prf(
            &mut sha1_stream,
            &crate::crypto::hmac::HMAC_SHA1,
            &secret[10..],
            b"test",
            &[0x42; 8],
        );
        for i in 0..32 {
            assert_eq!(split_output[i], md5_stream[i] ^ sha1_stream[i]);
        }
    }

    #[test]
    fn odd_length_secret_shares_middle_byte() {
        let secret = [0x11u8; 5];
        let mut out = [0u8; 16];
        prf_legacy(&mut out, &secret, b"x", b"y");

        let mut md5_stream = [0u8; 16];
        let mut sha1_stream = [0u8; 16];
        prf(&mut md5_stream, &crate::crypto::hmac::HMAC_MD5, &secret[..3], b"x", b"y");
        prf(&mut sha1_stream, &crate::crypto::hmac::HMAC_SHA1, &secret[2..], b"x", b"y");
        for i in 0..16 {
            assert_eq!(out[i], md5_stream[i] ^ sha1_stream[i]);
        }
    }
}
