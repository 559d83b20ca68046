use core::fmt;

use crate::crypto::hash::{self, Hash};
use crate::crypto::hmac::{self, Hmac};
use crate::enums::{CipherSuite, KeyExchangeAlgorithm, ProtocolVersion};

/// A cipher suite supported by this server.
///
/// The record-protection algorithms themselves live in the record layer;
/// what the handshake needs is the suite's key exchange kind, the shape
/// of its key material, and the PRF hash bound to it for TLS 1.2.
pub struct SupportedCipherSuite {
    /// The IANA id of this suite.
    pub suite: CipherSuite,

    /// How keys are agreed.
    pub kx: KeyExchangeAlgorithm,

    /// The hash the TLS 1.2 PRF and Finished computation use.
    pub prf_hash: &'static dyn Hash,

    /// The HMAC the TLS 1.2 PRF uses (the same hash, keyed).
    pub(crate) prf_hmac: &'static dyn Hmac,

    /// Length of each record-MAC key.
    pub mac_key_len: usize,

    /// Length of each bulk-encryption key.
    pub enc_key_len: usize,

    /// CBC block/IV size.  Materialized in the key block only for
    /// TLS 1.0; later versions carry an explicit IV per record.
    pub iv_len: usize,

    /// The lowest protocol version this suite may be used with.
    pub min_version: ProtocolVersion,
}

impl SupportedCipherSuite {
    pub fn usable_for_version(&self, version: ProtocolVersion) -> bool {
        self.min_version.is_up_to(version)
    }

    /// Whether negotiating this suite requires a configured certificate.
    pub fn requires_server_certificate(&self) -> bool {
        self.kx.requires_server_certificate()
    }
}

impl PartialEq for SupportedCipherSuite {
    fn eq(&self, other: &Self) -> bool {
        self.suite == other.suite
    }
}

impl fmt::Debug for SupportedCipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupportedCipherSuite")
            .field("suite", &self.suite)
            .finish()
    }
}

/// The `TLS_RSA_WITH_AES_128_CBC_SHA` cipher suite.
pub static TLS_RSA_WITH_AES_128_CBC_SHA: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
    kx: KeyExchangeAlgorithm::RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 20,
    enc_key_len: 16,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_0,
};

/// The `TLS_DHE_RSA_WITH_AES_128_CBC_SHA` cipher suite.
pub static TLS_DHE_RSA_WITH_AES_128_CBC_SHA: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
    kx: KeyExchangeAlgorithm::DHE_RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 20,
    enc_key_len: 16,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_0,
};

/// The `TLS_RSA_WITH_AES_256_CBC_SHA` cipher suite.
pub static TLS_RSA_WITH_AES_256_CBC_SHA: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA,
    kx: KeyExchangeAlgorithm::RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 20,
    enc_key_len: 32,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_0,
};

/// The `TLS_DHE_RSA_WITH_AES_256_CBC_SHA` cipher suite.
pub static TLS_DHE_RSA_WITH_AES_256_CBC_SHA: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_DHE_RSA_WITH_AES_256_CBC_SHA,
    kx: KeyExchangeAlgorithm::DHE_RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 20,
    enc_key_len: 32,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_0,
};

/// The `TLS_RSA_WITH_AES_128_CBC_SHA256` cipher suite.
pub static TLS_RSA_WITH_AES_128_CBC_SHA256: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256,
    kx: KeyExchangeAlgorithm::RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 32,
    enc_key_len: 16,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_2,
};

/// The `TLS_RSA_WITH_AES_256_CBC_SHA256` cipher suite.
pub static TLS_RSA_WITH_AES_256_CBC_SHA256: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA256,
    kx: KeyExchangeAlgorithm::RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 32,
    enc_key_len: 32,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_2,
};

/// The `TLS_DHE_RSA_WITH_AES_128_CBC_SHA256` cipher suite.
pub static TLS_DHE_RSA_WITH_AES_128_CBC_SHA256: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
    kx: KeyExchangeAlgorithm::DHE_RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 32,
    enc_key_len: 16,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_2,
};

/// The `TLS_DHE_RSA_WITH_AES_256_CBC_SHA256` cipher suite.
pub static TLS_DHE_RSA_WITH_AES_256_CBC_SHA256: SupportedCipherSuite = SupportedCipherSuite {
    suite: CipherSuite::TLS_DHE_RSA_WITH_AES_256_CBC_SHA256,
    kx: KeyExchangeAlgorithm::DHE_RSA,
    prf_hash: &hash::SHA256,
    prf_hmac: &hmac::HMAC_SHA256,
    mac_key_len: 32,
    enc_key_len: 32,
    iv_len: 16,
    min_version: ProtocolVersion::TLSv1_2,
};

/// Every suite this crate supports, in default preference order.
pub static ALL_CIPHER_SUITES: &[&SupportedCipherSuite] = &[
    &TLS_DHE_RSA_WITH_AES_256_CBC_SHA256,
    &TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
    &TLS_DHE_RSA_WITH_AES_256_CBC_SHA,
    &TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
    &TLS_RSA_WITH_AES_256_CBC_SHA256,
    &TLS_RSA_WITH_AES_128_CBC_SHA256,
    &TLS_RSA_WITH_AES_256_CBC_SHA,
    &TLS_RSA_WITH_AES_128_CBC_SHA,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_suites_are_tls12_only() {
        assert!(!TLS_RSA_WITH_AES_128_CBC_SHA256.usable_for_version(ProtocolVersion::TLSv1_1));
        assert!(TLS_RSA_WITH_AES_128_CBC_SHA256.usable_for_version(ProtocolVersion::TLSv1_2));
        assert!(TLS_DHE_RSA_WITH_AES_128_CBC_SHA.usable_for_version(ProtocolVersion::TLSv1_0));
    }

    #[test]
    fn table_is_consistent() {
        for suite in ALL_CIPHER_SUITES {
            assert!(suite.requires_server_certificate());
            assert_eq!(suite.iv_len, 16);
            assert!(matches!(suite.mac_key_len, 20 | 32));
            assert!(matches!(suite.enc_key_len, 16 | 32));
        }
    }
}
