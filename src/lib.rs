//! # palisade
//!
//! palisade is a server-side TLS 1.0/1.1/1.2 handshake state machine.
//! It implements the full negotiation — version and cipher selection,
//! certificate presentation, RSA and DHE_RSA key exchange, master-secret
//! derivation and bidirectional Finished verification — together with
//! RFC5746 secure renegotiation, as a pure state machine.
//!
//! ### palisade does not take care of records or sockets
//!
//! The record layer (framing, MAC, encryption, replay protection) and the
//! byte stream below it are external collaborators.  Feed decrypted
//! handshake payloads into [`server::ServerConnection::handle_handshake`]
//! and ChangeCipherSpec payloads into
//! [`server::ServerConnection::handle_change_cipher_spec`]; each call returns the
//! ordered [`Output`] directives: payloads to send, and the points at
//! which the outbound and inbound cipher contexts change.  Ordering is
//! significant — a [`Output::ChangeEncrypt`] applies to every record
//! after it, and a [`Output::ChangeDecrypt`] must be applied before the
//! next inbound record.
//!
//! ### Errors are fatal
//!
//! Every [`Error`] ends the handshake; [`AlertDescription::from`] names
//! the alert to send before tearing the connection down.  The connection
//! refuses all further input after a failure.
//!
//! ### Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use palisade::server::{CertifiedKey, ServerConfig, ServerConnection};
//!
//! # fn load_credentials() -> CertifiedKey { unimplemented!() }
//! # fn run() -> Result<(), palisade::Error> {
//! let config = ServerConfig::new(Some(load_credentials()));
//! let mut conn = ServerConnection::new(Arc::new(config));
//!
//! // bytes from the record layer:
//! let client_hello_bytes: Vec<u8> = Vec::new();
//! for output in conn.handle_handshake(&client_hello_bytes)? {
//!     // send records, swap cipher contexts, in order
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub, clippy::use_self)]
#![allow(clippy::new_without_default)]

// Requires Rust 1.75 or later.

#[macro_use]
mod msgs;

#[macro_use]
mod check;

mod common_state;
/// Cryptographic primitive interfaces and implementations.
pub mod crypto;
mod enums;
mod error;
mod hash_hs;
mod rand;
/// The server-side handshake driver.
pub mod server;
mod suites;
mod tls12;
mod verify;

pub use crate::common_state::Output;
pub use crate::enums::{
    AlertDescription, AlertLevel, CipherSuite, Compression, ContentType, ExtensionType,
    HandshakeType, HashAlgorithm, KeyExchangeAlgorithm, ProtocolVersion, ServerNameType,
    SignatureAlgorithm,
};
pub use crate::error::{Error, GetRandomFailed, InvalidMessage, PeerIncompatible, PeerMisbehaved};
pub use crate::suites::{SupportedCipherSuite, ALL_CIPHER_SUITES};
pub use crate::tls12::CipherContext;
pub use crate::verify::DigitallySignedStruct;

/// Message and extension encodings, exposed for integration tests and
/// for callers that drive the wire format directly.
pub mod internal {
    pub use crate::msgs::*;
}

/// All defined cipher suites, re-exported individually.
pub mod cipher_suite {
    pub use crate::suites::{
        TLS_DHE_RSA_WITH_AES_128_CBC_SHA, TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
        TLS_DHE_RSA_WITH_AES_256_CBC_SHA, TLS_DHE_RSA_WITH_AES_256_CBC_SHA256,
        TLS_RSA_WITH_AES_128_CBC_SHA, TLS_RSA_WITH_AES_128_CBC_SHA256,
        TLS_RSA_WITH_AES_256_CBC_SHA, TLS_RSA_WITH_AES_256_CBC_SHA256,
    };
}
