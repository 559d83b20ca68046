use core::fmt;
use std::sync::Arc;

use pki_types::{CertificateDer, DnsName};
use zeroize::Zeroize;

use crate::common_state::{CommonState, Context, Output, State};
use crate::crypto::rsa::RsaSigningKey;
use crate::crypto::{SecureRandom, SystemRandom};
use crate::enums::{HashAlgorithm, ProtocolVersion};
use crate::error::Error;
use crate::msgs::ccs::ChangeCipherSpecPayload;
use crate::msgs::codec::Codec;
use crate::msgs::fragment::HandshakeFragment;
use crate::msgs::message::Message;
use crate::suites::{self, SupportedCipherSuite};

mod hs;
mod tls12;

#[cfg(test)]
pub(crate) mod test_utils;

/// A certificate chain (leaf first) and the matching RSA private key.
pub struct CertifiedKey {
    pub chain: Vec<CertificateDer<'static>>,
    pub key: RsaSigningKey,
}

impl CertifiedKey {
    pub fn new(chain: Vec<CertificateDer<'static>>, key: RsaSigningKey) -> Self {
        Self { chain, key }
    }
}

/// Server-side policy, fixed for the lifetime of the connections sharing
/// it.
pub struct ServerConfig {
    /// The protocol versions this server accepts.  Negotiation picks the
    /// highest member not above the client's offer.
    pub versions: Vec<ProtocolVersion>,

    /// Supported cipher suites.  The client's preference order decides
    /// between suites both sides support.
    pub cipher_suites: Vec<&'static SupportedCipherSuite>,

    /// Hash preference order for TLS 1.2 ServerKeyExchange signatures,
    /// most preferred first.
    pub signature_hashes: Vec<HashAlgorithm>,

    /// This server's certificate and key.  Every supported suite needs
    /// one; without it no suite is negotiable.
    pub credentials: Option<CertifiedKey>,

    /// Refuse initial ClientHellos that signal no secure-renegotiation
    /// support (RFC5746 section 4.3).
    pub require_secure_reneg: bool,

    /// Accept renegotiation from an established session.
    pub allow_renegotiation: bool,

    /// Source of randomness for this server's hellos and key exchanges.
    pub random: &'static dyn SecureRandom,
}

impl ServerConfig {
    /// A config with every supported version and suite enabled.
    pub fn new(credentials: Option<CertifiedKey>) -> Self {
        Self {
            versions: vec![
                ProtocolVersion::TLSv1_0,
                ProtocolVersion::TLSv1_1,
                ProtocolVersion::TLSv1_2,
            ],
            cipher_suites: suites::ALL_CIPHER_SUITES.to_vec(),
            signature_hashes: vec![
                HashAlgorithm::SHA256,
                HashAlgorithm::SHA384,
                HashAlgorithm::SHA512,
                HashAlgorithm::SHA1,
            ],
            credentials,
            require_secure_reneg: true,
            allow_renegotiation: true,
            random: &SystemRandom,
        }
    }
}

/// The verify_data pair a completed handshake leaves behind, binding any
/// renegotiation to it (RFC5746).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renegotiation {
    pub client_verify_data: Vec<u8>,
    pub server_verify_data: Vec<u8>,
}

/// The parameters of one handshake: created when its ClientHello is
/// accepted, filled in as the handshake progresses, and kept as the
/// session's epoch once Finished verification completes.
pub struct Epoch {
    pub protocol_version: ProtocolVersion,
    pub suite: &'static SupportedCipherSuite,
    pub server_name: Option<DnsName<'static>>,
    pub own_certificates: Vec<CertificateDer<'static>>,
    pub(crate) master_secret: [u8; 48],
    pub reneg: Option<Renegotiation>,
}

impl Epoch {
    pub(crate) fn new(
        protocol_version: ProtocolVersion,
        suite: &'static SupportedCipherSuite,
        server_name: Option<DnsName<'static>>,
        own_certificates: Vec<CertificateDer<'static>>,
    ) -> Self {
        Self {
            protocol_version,
            suite,
            server_name,
            own_certificates,
            master_secret: [0u8; 48],
            reneg: None,
        }
    }
}

impl fmt::Debug for Epoch {
    // the master secret stays out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Epoch")
            .field("protocol_version", &self.protocol_version)
            .field("suite", &self.suite.suite)
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

impl Drop for Epoch {
    fn drop(&mut self) {
        self.master_secret.zeroize();
    }
}

/// One server-side connection's handshake machine.
///
/// The record layer feeds decrypted payload bytes in through
/// [`handle_handshake`] and [`handle_change_cipher_spec`]; each call
/// returns the ordered directives to act on.  Any error is fatal: the
/// connection refuses further input, and [`AlertDescription::from`]
/// names the alert to send before closing.
///
/// [`handle_handshake`]: Self::handle_handshake
/// [`handle_change_cipher_spec`]: Self::handle_change_cipher_spec
/// [`AlertDescription::from`]: crate::AlertDescription
pub struct ServerConnection {
    common: CommonState,
    fragment: HandshakeFragment,
    state: Result<Box<dyn State>, Error>,
}

impl ServerConnection {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            common: CommonState::new(),
            fragment: HandshakeFragment::new(),
            state: Ok(Box::new(hs::ExpectClientHello::new(config, None))),
        }
    }

    /// Process bytes received on the handshake channel.
    ///
    /// The bytes may carry any number of whole or partial handshake
    /// messages; complete messages are handled in order and a trailing
    /// fragment is retained for the next call.
    pub fn handle_handshake(&mut self, bytes: &[u8]) -> Result<Vec<Output>, Error> {
        self.check_no_fatal_error()?;

        if let Err(err) = self.fragment.extend(bytes) {
            return Err(self.fail(err.into()));
        }

        loop {
            let raw = match self.fragment.pop_message() {
                Ok(Some(raw)) => raw,
                Ok(None) => break,
                Err(err) => return Err(self.fail(err.into())),
            };

            let m = match Message::handshake(raw) {
                Ok(m) => m,
                Err(err) => return Err(self.fail(err.into())),
            };

            self.common.aligned = self.fragment.is_empty();
            self.dispatch(m)?;
        }

        Ok(self.common.take_sends())
    }

    /// Process a ChangeCipherSpec delivered by the record layer.
    pub fn handle_change_cipher_spec(&mut self, bytes: &[u8]) -> Result<Vec<Output>, Error> {
        self.check_no_fatal_error()?;

        let ccs = match ChangeCipherSpecPayload::read_bytes(bytes) {
            Ok(ccs) => ccs,
            Err(err) => return Err(self.fail(err.into())),
        };

        self.common.aligned = self.fragment.is_empty();
        self.dispatch(Message::ChangeCipherSpec(ccs))?;
        Ok(self.common.take_sends())
    }

    /// The established session's parameters, once a handshake has
    /// completed.
    pub fn epoch(&self) -> Option<&Epoch> {
        self.state
            .as_ref()
            .ok()
            .and_then(|state| state.epoch())
    }

    fn dispatch(&mut self, m: Message) -> Result<(), Error> {
        let taken = core::mem::replace(&mut self.state, Err(Error::Crypto("state unavailable")));
        let state = match taken {
            Ok(state) => state,
            Err(err) => return Err(err),
        };

        let mut cx = Context {
            common: &mut self.common,
        };
        match state.handle(&mut cx, m) {
            Ok(next) => {
                self.state = Ok(next);
                Ok(())
            }
            Err(err) => {
                self.state = Err(err.clone());
                Err(err)
            }
        }
    }

    fn check_no_fatal_error(&self) -> Result<(), Error> {
        match &self.state {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.state = Err(err.clone());
        err
    }
}
