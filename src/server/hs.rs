use std::sync::Arc;

use log::{debug, trace};
use subtle::ConstantTimeEq;

use super::{tls12, CertifiedKey, Epoch, ServerConfig};
use crate::common_state::{Context, HandshakeFlight, State};
use crate::crypto::dh::{ActiveDhKeyExchange, MODP_GROUP2};
use crate::crypto::hash;
use crate::crypto::hash::Hash;
use crate::enums::{Compression, HandshakeType, KeyExchangeAlgorithm, ProtocolVersion};
use crate::error::{Error, PeerIncompatible, PeerMisbehaved};
use crate::hash_hs::HandshakeTranscript;
use crate::msgs::base::{PayloadU8, PayloadU16};
use crate::msgs::codec::Codec;
use crate::msgs::handshake::{
    CertificateChain, ClientHelloPayload, HandshakeMessagePayload, HandshakePayload, Random,
    ServerDhParams, ServerExtensions, ServerHelloPayload, ServerKeyExchange,
    ServerKeyExchangePayload, SessionId, SignatureAndHashAlgorithm,
};
use crate::msgs::message::Message;
use crate::suites::SupportedCipherSuite;
use crate::tls12::ConnectionRandoms;
use crate::verify::{self, DigitallySignedStruct};

pub(super) type NextState = Box<dyn State>;
pub(super) type NextStateOrError = Result<NextState, Error>;

/// What a completed handshake leaves for the next one to bind to.
pub(crate) struct PreviousSession {
    pub(crate) protocol_version: ProtocolVersion,
    pub(crate) client_verify_data: Vec<u8>,
    pub(crate) server_verify_data: Vec<u8>,
}

pub(crate) struct ExpectClientHello {
    config: Arc<ServerConfig>,
    /// `Some` when this hello renegotiates an established session.
    previous: Option<PreviousSession>,
}

impl ExpectClientHello {
    pub(crate) fn new(config: Arc<ServerConfig>, previous: Option<PreviousSession>) -> Self {
        Self { config, previous }
    }

    fn with_client_hello(
        self,
        cx: &mut Context<'_>,
        client_hello: &ClientHelloPayload,
        m: &Message,
    ) -> NextStateOrError {
        trace!("we got a clienthello {client_hello:?}");

        if !client_hello
            .compression_methods
            .contains(&Compression::Null)
        {
            return Err(PeerIncompatible::NullCompressionRequired.into());
        }

        let version = self.negotiate_version(client_hello)?;
        self.check_renegotiation_binding(client_hello, version)?;
        let suite = self.negotiate_suite(client_hello, version)?;
        debug!("decided upon suite {suite:?} for {version:?}");

        let credentials = self
            .config
            .credentials
            .as_ref()
            .ok_or(Error::Crypto("no server credentials configured"))?;

        let server_random = Random::new(self.config.random)?;
        let randoms = ConnectionRandoms::new(client_hello.random.0, server_random.0);

        let epoch = Epoch::new(
            version,
            suite,
            client_hello.sni_hostname().cloned(),
            credentials.chain.clone(),
        );

        // The transcript restarts at every ClientHello, including a
        // renegotiating one.
        let mut transcript = HandshakeTranscript::new();
        transcript.add_message(m);

        let mut flight = HandshakeFlight::new(&mut transcript);
        self.emit_server_hello(&mut flight, client_hello, version, server_random, suite);
        emit_certificate(&mut flight, credentials);
        let server_kx = match suite.kx {
            KeyExchangeAlgorithm::DHE_RSA => Some(self.emit_server_kx(
                &mut flight,
                version,
                credentials,
                client_hello.extensions.signature_algorithms.as_deref(),
                &randoms,
            )?),
            KeyExchangeAlgorithm::RSA => None,
        };
        emit_server_hello_done(&mut flight);
        flight.finish(cx.common);

        Ok(Box::new(tls12::ExpectClientKeyExchange {
            config: self.config,
            epoch,
            randoms,
            client_version: client_hello.client_version,
            server_kx,
            transcript,
        }))
    }

    /// The highest version we accept that the client offered.
    fn negotiate_version(&self, client_hello: &ClientHelloPayload) -> Result<ProtocolVersion, Error> {
        self.config
            .versions
            .iter()
            .copied()
            .filter(|v| v.is_up_to(client_hello.client_version))
            .max_by_key(|v| u16::from(*v))
            .ok_or_else(|| PeerIncompatible::NoProtocolVersionsInCommon.into())
    }

    /// RFC5746 admission: what the hello must carry depends on whether
    /// this is an initial handshake or a renegotiation.
    fn check_renegotiation_binding(
        &self,
        client_hello: &ClientHelloPayload,
        version: ProtocolVersion,
    ) -> Result<(), Error> {
        let their = client_hello
            .extensions
            .renegotiation_info
            .as_ref();

        match &self.previous {
            None => {
                if let Some(their) = their {
                    // on an initial handshake the extension may only be empty
                    if !their.as_ref().is_empty() {
                        return Err(PeerMisbehaved::InitialRenegotiationInfoNotEmpty.into());
                    }
                    return Ok(());
                }

                if client_hello.offers_scsv() || !self.config.require_secure_reneg {
                    Ok(())
                } else {
                    Err(PeerIncompatible::SecureRenegotiationRequired.into())
                }
            }
            Some(previous) => {
                if version != previous.protocol_version {
                    return Err(PeerMisbehaved::RenegotiationVariedVersion.into());
                }

                let their = their.ok_or(PeerMisbehaved::RenegotiationMissingBinding)?;
                match ConstantTimeEq::ct_eq(their.as_ref(), &previous.client_verify_data[..])
                    .into()
                {
                    true => Ok(()),
                    false => Err(PeerMisbehaved::RenegotiationBindingMismatch.into()),
                }
            }
        }
    }

    /// The first client-offered suite we also support wins: client order
    /// takes precedence.
    fn negotiate_suite(
        &self,
        client_hello: &ClientHelloPayload,
        version: ProtocolVersion,
    ) -> Result<&'static SupportedCipherSuite, Error> {
        client_hello
            .cipher_suites
            .iter()
            .find_map(|client_suite| {
                self.config
                    .cipher_suites
                    .iter()
                    .find(|ours| {
                        ours.suite == *client_suite
                            && ours.usable_for_version(version)
                            && (!ours.requires_server_certificate()
                                || self.config.credentials.is_some())
                    })
                    .copied()
            })
            .ok_or_else(|| PeerIncompatible::NoCipherSuitesInCommon.into())
    }

    fn emit_server_hello(
        &self,
        flight: &mut HandshakeFlight<'_>,
        client_hello: &ClientHelloPayload,
        version: ProtocolVersion,
        server_random: Random,
        suite: &'static SupportedCipherSuite,
    ) {
        // On renegotiation the extension binds to the previous epoch's
        // Finished pair; initially it is empty.
        let renegotiation_info = match &self.previous {
            None => PayloadU8::empty(),
            Some(previous) => {
                let mut bound = previous.client_verify_data.clone();
                bound.extend_from_slice(&previous.server_verify_data);
                PayloadU8::new(bound)
            }
        };

        let sh = HandshakeMessagePayload {
            typ: HandshakeType::ServerHello,
            payload: HandshakePayload::ServerHello(ServerHelloPayload {
                legacy_version: version,
                random: server_random,
                session_id: SessionId::empty(),
                cipher_suite: suite.suite,
                compression_method: Compression::Null,
                extensions: ServerExtensions {
                    renegotiation_info: Some(renegotiation_info),
                    server_name_ack: client_hello
                        .extensions
                        .server_name
                        .as_ref()
                        .map(|_| ()),
                },
            }),
        };
        trace!("sending server hello {sh:?}");
        flight.add(sh);
    }

    fn emit_server_kx(
        &self,
        flight: &mut HandshakeFlight<'_>,
        version: ProtocolVersion,
        credentials: &CertifiedKey,
        offered_sigalgs: Option<&[SignatureAndHashAlgorithm]>,
        randoms: &ConnectionRandoms,
    ) -> Result<ActiveDhKeyExchange, Error> {
        let kx = ActiveDhKeyExchange::start(&MODP_GROUP2, self.config.random)?;
        let params = ServerDhParams {
            dh_p: PayloadU16::new(kx.group().p.to_vec()),
            dh_g: PayloadU16::new(kx.group().g.to_vec()),
            dh_ys: PayloadU16::new(kx.pub_key().to_vec()),
        };

        // the signature covers both randoms and the group parameters
        let mut msg = Vec::new();
        msg.extend(randoms.client);
        msg.extend(randoms.server);
        params.encode(&mut msg);

        let dss = match version {
            ProtocolVersion::TLSv1_2 => {
                let algorithm =
                    verify::choose_signature_hash(offered_sigalgs, &self.config.signature_hashes)
                        .ok_or(PeerIncompatible::NoSignatureHashesInCommon)?;
                let hash_impl = hash::from_algorithm(algorithm.hash)
                    .ok_or(Error::Crypto("unsupported signature hash"))?;
                let sig = credentials
                    .key
                    .sign_prehashed(algorithm.hash, hash_impl.compute(&msg).as_ref())?;
                DigitallySignedStruct::new(Some(algorithm), sig)
            }
            _ => {
                let mut digests = hash::MD5.compute(&msg).as_ref().to_vec();
                digests.extend_from_slice(hash::SHA1.compute(&msg).as_ref());
                let sig = credentials.key.sign_concatenated(&digests)?;
                DigitallySignedStruct::new(None, sig)
            }
        };

        flight.add(HandshakeMessagePayload {
            typ: HandshakeType::ServerKeyExchange,
            payload: HandshakePayload::ServerKeyExchange(ServerKeyExchangePayload::from(
                ServerKeyExchange { params, dss },
            )),
        });
        Ok(kx)
    }
}

impl State for ExpectClientHello {
    fn handle(self: Box<Self>, cx: &mut Context<'_>, m: Message) -> NextStateOrError {
        let client_hello =
            require_handshake_msg!(m, HandshakeType::ClientHello, HandshakePayload::ClientHello)?;
        self.with_client_hello(cx, client_hello, &m)
    }
}

fn emit_certificate(flight: &mut HandshakeFlight<'_>, credentials: &CertifiedKey) {
    flight.add(HandshakeMessagePayload {
        typ: HandshakeType::Certificate,
        payload: HandshakePayload::Certificate(CertificateChain(credentials.chain.clone())),
    });
}

fn emit_server_hello_done(flight: &mut HandshakeFlight<'_>) {
    flight.add(HandshakeMessagePayload {
        typ: HandshakeType::ServerHelloDone,
        payload: HandshakePayload::ServerHelloDone,
    });
}
