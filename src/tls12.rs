use core::fmt;

use zeroize::Zeroize;

use crate::crypto::prf;
use crate::enums::ProtocolVersion;
use crate::error::{Error, InvalidMessage};
use crate::msgs::codec::{Codec, Reader};
use crate::suites::SupportedCipherSuite;

/// The client and server randoms of one handshake.
#[derive(Clone, Copy)]
pub(crate) struct ConnectionRandoms {
    pub(crate) client: [u8; 32],
    pub(crate) server: [u8; 32],
}

impl ConnectionRandoms {
    pub(crate) fn new(client: [u8; 32], server: [u8; 32]) -> Self {
        Self { client, server }
    }
}

/// One direction's record-protection keys, handed to the record layer at
/// the ChangeCipherSpec barrier.
///
/// For TLS 1.0 `iv` carries the implicit CBC IV from the key block; from
/// TLS 1.1 records carry explicit IVs and `iv` is empty.
pub struct CipherContext {
    pub suite: &'static SupportedCipherSuite,
    pub version: ProtocolVersion,
    pub mac_key: Vec<u8>,
    pub enc_key: Vec<u8>,
    pub iv: Vec<u8>,
}

impl fmt::Debug for CipherContext {
    // key material stays out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherContext")
            .field("suite", &self.suite.suite)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Drop for CipherContext {
    fn drop(&mut self) {
        self.mac_key.zeroize();
        self.enc_key.zeroize();
        self.iv.zeroize();
    }
}

/// Per-connection keying material: the master secret and everything
/// derived from it.
pub(crate) struct ConnectionSecrets {
    pub(crate) randoms: ConnectionRandoms,
    suite: &'static SupportedCipherSuite,
    version: ProtocolVersion,
    master_secret: [u8; 48],
}

impl ConnectionSecrets {
    /// Derive the master secret from a completed key exchange.
    ///
    /// `pms` is consumed here: the premaster secret has no further use
    /// once the master secret exists.
    pub(crate) fn from_premaster(
        mut pms: Vec<u8>,
        version: ProtocolVersion,
        suite: &'static SupportedCipherSuite,
        randoms: ConnectionRandoms,
    ) -> Self {
        let mut ret = Self {
            randoms,
            suite,
            version,
            master_secret: [0u8; 48],
        };

        let seed = join_randoms(&ret.randoms.client, &ret.randoms.server);
        prf_for_version(
            version,
            suite,
            &mut ret.master_secret,
            &pms,
            b"master secret",
            &seed,
        );

        pms.zeroize();
        ret
    }

    fn prf_secret(&self, out: &mut [u8], label: &[u8], seed: &[u8]) {
        prf_for_version(
            self.version,
            self.suite,
            out,
            &self.master_secret,
            label,
            seed,
        );
    }

    /// Make the key block and chop it into the read/write contexts.
    ///
    /// Returns `(server_write, client_read)`: what this server encrypts
    /// with, and what it decrypts the client's records with.
    pub(crate) fn make_cipher_pair(&self) -> (CipherContext, CipherContext) {
        let mut key_block = self.make_key_block();

        let (client_mac, rest) = key_block.split_at(self.suite.mac_key_len);
        let (server_mac, rest) = rest.split_at(self.suite.mac_key_len);
        let (client_key, rest) = rest.split_at(self.suite.enc_key_len);
        let (server_key, rest) = rest.split_at(self.suite.enc_key_len);
        let (client_iv, rest) = rest.split_at(self.implicit_iv_len());
        let (server_iv, _) = rest.split_at(self.implicit_iv_len());

        let server_write = CipherContext {
            suite: self.suite,
            version: self.version,
            mac_key: server_mac.to_vec(),
            enc_key: server_key.to_vec(),
            iv: server_iv.to_vec(),
        };
        let client_read = CipherContext {
            suite: self.suite,
            version: self.version,
            mac_key: client_mac.to_vec(),
            enc_key: client_key.to_vec(),
            iv: client_iv.to_vec(),
        };

        key_block.zeroize();
        (server_write, client_read)
    }

    fn make_key_block(&self) -> Vec<u8> {
        let len = (self.suite.mac_key_len + self.suite.enc_key_len + self.implicit_iv_len()) * 2;
        let mut out = vec![0u8; len];

        // NOTE: opposite random order to the master secret computation.
        let randoms = join_randoms(&self.randoms.server, &self.randoms.client);
        self.prf_secret(&mut out, b"key expansion", &randoms);

        out
    }

    fn implicit_iv_len(&self) -> usize {
        // from TLS1.1 the CBC IV is explicit in each record
        match self.version {
            ProtocolVersion::TLSv1_0 => self.suite.iv_len,
            _ => 0,
        }
    }

    fn make_verify_data(&self, handshake_hash: &[u8], label: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; 12];
        self.prf_secret(&mut out, label, handshake_hash);
        out
    }

    pub(crate) fn client_verify_data(&self, handshake_hash: &[u8]) -> Vec<u8> {
        self.make_verify_data(handshake_hash, b"client finished")
    }

    pub(crate) fn server_verify_data(&self, handshake_hash: &[u8]) -> Vec<u8> {
        self.make_verify_data(handshake_hash, b"server finished")
    }

    pub(crate) fn suite(&self) -> &'static SupportedCipherSuite {
        self.suite
    }

    pub(crate) fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub(crate) fn master_secret(&self) -> &[u8] {
        &self.master_secret[..]
    }
}

impl Drop for ConnectionSecrets {
    fn drop(&mut self) {
        self.master_secret.zeroize();
    }
}

fn prf_for_version(
    version: ProtocolVersion,
    suite: &SupportedCipherSuite,
    out: &mut [u8],
    secret: &[u8],
    label: &[u8],
    seed: &[u8],
) {
    match version {
        ProtocolVersion::TLSv1_2 => prf::prf(out, suite.prf_hmac, secret, label, seed),
        _ => prf::prf_legacy(out, secret, label, seed),
    }
}

fn join_randoms(first: &[u8; 32], second: &[u8; 32]) -> [u8; 64] {
    let mut randoms = [0u8; 64];
    randoms[..32].copy_from_slice(first);
    randoms[32..].copy_from_slice(second);
    randoms
}

/// Decode a ClientKeyExchange body, requiring it to be fully consumed.
pub(crate) fn decode_kx_params<T: Codec>(kx_params: &[u8]) -> Result<T, Error> {
    let mut rd = Reader::init(kx_params);
    let kx_params = T::read(&mut rd)?;
    match rd.any_left() {
        false => Ok(kx_params),
        true => Err(InvalidMessage::InvalidDhParams.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::base::PayloadU16;
    use crate::suites::{TLS_DHE_RSA_WITH_AES_128_CBC_SHA, TLS_DHE_RSA_WITH_AES_128_CBC_SHA256};

    fn secrets(version: ProtocolVersion) -> ConnectionSecrets {
        let suite = match version {
            ProtocolVersion::TLSv1_2 => &TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
            _ => &TLS_DHE_RSA_WITH_AES_128_CBC_SHA,
        };
        ConnectionSecrets::from_premaster(
            vec![0x11; 48],
            version,
            suite,
            ConnectionRandoms::new([1; 32], [2; 32]),
        )
    }

    #[test]
    fn master_secret_is_48_octets_and_deterministic() {
        for version in [
            ProtocolVersion::TLSv1_0,
            ProtocolVersion::TLSv1_1,
            ProtocolVersion::TLSv1_2,
        ] {
            let a = secrets(version);
            let b = secrets(version);
            assert_eq!(a.master_secret().len(), 48);
            assert_eq!(a.master_secret(), b.master_secret());
        }

        // the legacy and 1.2 PRFs must disagree
        assert_ne!(
            secrets(ProtocolVersion::TLSv1_1).master_secret(),
            secrets(ProtocolVersion::TLSv1_2).master_secret()
        );
    }

    #[test]
    fn key_block_shapes() {
        // TLS1.0: MAC, key and implicit IV per direction
        let (server_write, client_read) = secrets(ProtocolVersion::TLSv1_0).make_cipher_pair();
        assert_eq!(server_write.mac_key.len(), 20);
        assert_eq!(server_write.enc_key.len(), 16);
        assert_eq!(server_write.iv.len(), 16);
        assert_ne!(server_write.enc_key, client_read.enc_key);

        // TLS1.2: explicit per-record IVs, nothing in the key block
        let (server_write, client_read) = secrets(ProtocolVersion::TLSv1_2).make_cipher_pair();
        assert_eq!(server_write.mac_key.len(), 32);
        assert!(server_write.iv.is_empty());
        assert!(client_read.iv.is_empty());
    }

    #[test]
    fn verify_data_is_12_octets_and_label_separated() {
        let secrets = secrets(ProtocolVersion::TLSv1_2);
        let hash = [0xabu8; 32];
        let client = secrets.client_verify_data(&hash);
        let server = secrets.server_verify_data(&hash);
        assert_eq!(client.len(), 12);
        assert_eq!(server.len(), 12);
        assert_ne!(client, server);
    }

    #[test]
    fn kx_decode_rejects_trailing_bytes() {
        let mut bytes = PayloadU16::new(vec![5; 4]).get_encoding();
        assert!(decode_kx_params::<PayloadU16>(&bytes).is_ok());
        bytes.push(0);
        assert!(decode_kx_params::<PayloadU16>(&bytes).is_err());
    }
}
