use std::sync::Arc;

use log::{debug, trace};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use super::hs::{self, NextStateOrError, PreviousSession};
use super::{Epoch, Renegotiation, ServerConfig};
use crate::check::inappropriate_message;
use crate::common_state::{Context, State};
use crate::crypto::dh::ActiveDhKeyExchange;
use crate::crypto::rsa::RsaSigningKey;
use crate::crypto::SecureRandom;
use crate::enums::{ContentType, HandshakeType, ProtocolVersion};
use crate::error::{Error, PeerMisbehaved};
use crate::hash_hs::HandshakeTranscript;
use crate::msgs::base::{Payload, PayloadU16};
use crate::msgs::ccs::ChangeCipherSpecPayload;
use crate::msgs::handshake::{ClientDhParams, HandshakeMessagePayload, HandshakePayload};
use crate::msgs::message::Message;
use crate::rand::random_array;
use crate::tls12::{decode_kx_params, CipherContext, ConnectionRandoms, ConnectionSecrets};

/// Waits for the client's key exchange and derives the session keys
/// from it.
pub(super) struct ExpectClientKeyExchange {
    pub(super) config: Arc<ServerConfig>,
    pub(super) epoch: Epoch,
    pub(super) randoms: ConnectionRandoms,
    /// The version from the ClientHello itself, possibly above the
    /// negotiated one; the RSA premaster secret is pinned to it.
    pub(super) client_version: ProtocolVersion,
    /// `Some` iff the negotiated suite is DHE_RSA.
    pub(super) server_kx: Option<ActiveDhKeyExchange>,
    pub(super) transcript: HandshakeTranscript,
}

impl State for ExpectClientKeyExchange {
    fn handle(mut self: Box<Self>, _cx: &mut Context<'_>, m: Message) -> NextStateOrError {
        let client_kx = require_handshake_msg!(
            m,
            HandshakeType::ClientKeyExchange,
            HandshakePayload::ClientKeyExchange
        )?;

        let pms = match self.server_kx.take() {
            Some(server_kx) => {
                let peer_kx: ClientDhParams = decode_kx_params(client_kx.as_ref())?;
                let shared = server_kx.complete(peer_kx.public.as_ref())?;
                shared.secret_bytes().to_vec()
            }
            None => {
                let encrypted_pms: PayloadU16 = decode_kx_params(client_kx.as_ref())?;
                let key = &self
                    .config
                    .credentials
                    .as_ref()
                    .ok_or(Error::Crypto("no server credentials configured"))?
                    .key;
                complete_rsa_pms(
                    key,
                    encrypted_pms.as_ref(),
                    self.client_version,
                    self.config.random,
                )?
            }
        };

        self.transcript.add_message(&m);

        let secrets = ConnectionSecrets::from_premaster(
            pms,
            self.epoch.protocol_version,
            self.epoch.suite,
            self.randoms,
        );
        self.epoch
            .master_secret
            .copy_from_slice(secrets.master_secret());
        let (server_write, client_read) = secrets.make_cipher_pair();

        Ok(Box::new(ExpectCcs {
            config: self.config,
            epoch: self.epoch,
            secrets,
            server_write,
            client_read,
            transcript: self.transcript,
        }))
    }
}

/// The RSA premaster secret flow with the Bleichenbacher countermeasure.
///
/// Whatever happens, the result is 48 octets starting with the version
/// from the ClientHello: a failed decryption and a version-rolled back
/// plaintext both silently become a random premaster secret, leaving a
/// forger nothing to distinguish until Finished fails.
fn complete_rsa_pms(
    key: &RsaSigningKey,
    ciphertext: &[u8],
    client_version: ProtocolVersion,
    random: &dyn SecureRandom,
) -> Result<Vec<u8>, Error> {
    let version = u16::from(client_version).to_be_bytes();

    let mut fallback = [0u8; 48];
    fallback[..2].copy_from_slice(&version);
    fallback[2..].copy_from_slice(&random_array::<46>(random)?);

    let mut pms = fallback;
    if let Some(mut plaintext) = key.decrypt_pms(ciphertext) {
        if plaintext.len() == 48 {
            let version_ok = plaintext[0].ct_eq(&version[0]) & plaintext[1].ct_eq(&version[1]);
            for (out, (theirs, ours)) in pms
                .iter_mut()
                .zip(plaintext.iter().zip(fallback.iter()))
            {
                *out = u8::conditional_select(ours, theirs, version_ok);
            }
        }
        plaintext.zeroize();
    }

    Ok(pms.to_vec())
}

/// Waits for the client's ChangeCipherSpec, holding both directions'
/// derived cipher contexts until the barrier releases them to the
/// record layer.
struct ExpectCcs {
    config: Arc<ServerConfig>,
    epoch: Epoch,
    secrets: ConnectionSecrets,
    server_write: CipherContext,
    client_read: CipherContext,
    transcript: HandshakeTranscript,
}

impl State for ExpectCcs {
    fn handle(self: Box<Self>, cx: &mut Context<'_>, m: Message) -> NextStateOrError {
        match m {
            Message::ChangeCipherSpec(..) => {}
            m => return Err(inappropriate_message(&m, &[ContentType::ChangeCipherSpec])),
        }

        // CCS may not arrive interleaved with a fragmented handshake
        // message.
        cx.common.check_aligned_handshake()?;
        trace!("client CCS received, switching to negotiated keys");

        cx.common
            .send_msg(Message::ChangeCipherSpec(ChangeCipherSpecPayload));
        cx.common.start_encrypting(self.server_write);
        cx.common.start_decrypting(self.client_read);

        Ok(Box::new(ExpectFinished {
            config: self.config,
            epoch: self.epoch,
            secrets: self.secrets,
            transcript: self.transcript,
        }))
    }
}

/// Waits for the client's Finished, then mirrors it.
struct ExpectFinished {
    config: Arc<ServerConfig>,
    epoch: Epoch,
    secrets: ConnectionSecrets,
    transcript: HandshakeTranscript,
}

impl State for ExpectFinished {
    fn handle(mut self: Box<Self>, cx: &mut Context<'_>, m: Message) -> NextStateOrError {
        let finished =
            require_handshake_msg!(m, HandshakeType::Finished, HandshakePayload::Finished)?;

        cx.common.check_aligned_handshake()?;

        // over the log up to but excluding this Finished
        let handshake_hash = self
            .transcript
            .current_hash(self.epoch.protocol_version, self.epoch.suite);
        let expect_verify_data = self.secrets.client_verify_data(&handshake_hash);

        let verified: bool =
            ConstantTimeEq::ct_eq(&expect_verify_data[..], finished.as_ref()).into();
        if !verified {
            return Err(PeerMisbehaved::IncorrectFinished.into());
        }

        // ours covers the log extended by the client's Finished
        self.transcript.add_message(&m);
        let handshake_hash = self
            .transcript
            .current_hash(self.epoch.protocol_version, self.epoch.suite);
        let server_verify_data = self.secrets.server_verify_data(&handshake_hash);

        cx.common
            .send_msg(Message::build_handshake(HandshakeMessagePayload {
                typ: HandshakeType::Finished,
                payload: HandshakePayload::Finished(Payload::new(server_verify_data.clone())),
            }));

        self.epoch.reneg = Some(Renegotiation {
            client_verify_data: expect_verify_data,
            server_verify_data,
        });

        debug!("handshake complete: {:?}", self.epoch);
        Ok(Box::new(ExpectTraffic {
            config: self.config,
            epoch: self.epoch,
        }))
    }
}

/// The established session.  The only message this layer still handles
/// is a ClientHello asking to renegotiate.
struct ExpectTraffic {
    config: Arc<ServerConfig>,
    epoch: Epoch,
}

impl State for ExpectTraffic {
    fn handle(self: Box<Self>, cx: &mut Context<'_>, m: Message) -> NextStateOrError {
        match &m {
            Message::Handshake {
                parsed:
                    HandshakeMessagePayload {
                        payload: HandshakePayload::ClientHello(..),
                        ..
                    },
                ..
            } => {}
            m => {
                return Err(crate::check::inappropriate_handshake_message(
                    m,
                    &[ContentType::Handshake],
                    &[HandshakeType::ClientHello],
                ));
            }
        }

        if !self.config.allow_renegotiation {
            return Err(PeerMisbehaved::RenegotiationDenied.into());
        }

        let reneg = self
            .epoch
            .reneg
            .as_ref()
            .ok_or(Error::Crypto("established session has no verify data"))?;

        debug!("accepting renegotiation");
        let next = hs::ExpectClientHello::new(
            self.config.clone(),
            Some(PreviousSession {
                protocol_version: self.epoch.protocol_version,
                client_verify_data: reneg.client_verify_data.clone(),
                server_verify_data: reneg.server_verify_data.clone(),
            }),
        );
        Box::new(next).handle(cx, m)
    }

    fn epoch(&self) -> Option<&Epoch> {
        Some(&self.epoch)
    }
}
