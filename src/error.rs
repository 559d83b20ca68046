use core::fmt;

use crate::enums::{AlertDescription, ContentType, HandshakeType};

/// palisade reports protocol errors using this type.
///
/// Every error is fatal for the handshake it occurs in: the state machine
/// never retries and never partially advances.  [`AlertDescription::from`]
/// gives the alert the connection owner should send before tearing the
/// connection down.
#[non_exhaustive]
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// We received a TLS message that isn't valid right now.
    /// `expect_types` lists the message types we can expect right now.
    /// `got_type` is the type we found.  This error is typically
    /// caused by a buggy TLS stack (the peer or this one), a broken
    /// network, or an attack.
    InappropriateMessage {
        /// Which types we expected
        expect_types: Vec<ContentType>,
        /// What type we received
        got_type: ContentType,
    },

    /// We received a TLS handshake message that isn't valid right now.
    /// `expect_types` lists the handshake message types we can expect
    /// right now.  `got_type` is the type we found.
    InappropriateHandshakeMessage {
        /// Which handshake type we expected
        expect_types: Vec<HandshakeType>,
        /// What handshake type we received
        got_type: HandshakeType,
    },

    /// The peer sent us a TLS message with invalid contents.
    InvalidMessage(InvalidMessage),

    /// The peer deviated from the standard TLS protocol.
    /// The parameter gives a hint where.
    PeerMisbehaved(PeerMisbehaved),

    /// The peer doesn't support a protocol version/feature we require.
    /// The parameter gives a hint as to what version/feature it is.
    PeerIncompatible(PeerIncompatible),

    /// We failed to acquire random bytes from the system.
    FailedToGetRandomBytes,

    /// A cryptographic operation failed on our side.
    ///
    /// This is a local problem (for example a malformed private key), not
    /// a peer problem.
    Crypto(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InappropriateMessage {
                expect_types,
                got_type,
            } => write!(
                f,
                "received unexpected message: got {got_type:?} when expecting {expect_types:?}"
            ),
            Self::InappropriateHandshakeMessage {
                expect_types,
                got_type,
            } => write!(
                f,
                "received unexpected handshake message: got {got_type:?} when expecting {expect_types:?}"
            ),
            Self::InvalidMessage(why) => write!(f, "invalid peer message: {why:?}"),
            Self::PeerMisbehaved(why) => write!(f, "peer misbehaved: {why:?}"),
            Self::PeerIncompatible(why) => write!(f, "peer incompatible: {why:?}"),
            Self::FailedToGetRandomBytes => write!(f, "failed to get random bytes"),
            Self::Crypto(why) => write!(f, "cryptographic failure: {why}"),
        }
    }
}

impl std::error::Error for Error {}

/// A corrupt TLS message payload that resulted in an error.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InvalidMessage {
    /// The peer sent us a syntactically incorrect ChangeCipherSpec payload.
    InvalidCcs,
    /// A peer's DH share could not be decoded.
    InvalidDhParams,
    /// A peer's server name could not be decoded.
    InvalidServerName,
    /// A TLS message payload was larger than allowed by the specification.
    MessageTooLarge,
    /// Message is shorter than the expected length.
    MessageTooShort,
    /// Missing data for the named handshake payload value.
    MissingData(&'static str),
    /// Trailing data found for the named handshake payload value.
    TrailingData(&'static str),
    /// A peer sent a message where a given extension type was repeated.
    DuplicateExtension(u16),
    /// A peer sent an empty list of items, but a non-empty list is required.
    ///
    /// The argument names the context.
    IllegalEmptyList(&'static str),
}

impl From<InvalidMessage> for Error {
    fn from(e: InvalidMessage) -> Self {
        Self::InvalidMessage(e)
    }
}

/// The set of cases where we failed to make a connection because we thought
/// the peer was misbehaving.
///
/// This is `non_exhaustive`: we might add or stop using items here in minor
/// versions.  We also don't document what they mean.  Generally a user of
/// this crate shouldn't vary its behaviour on these error codes, and there is
/// nothing it can do to improve matters.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PeerMisbehaved {
    IncorrectFinished,
    InitialRenegotiationInfoNotEmpty,
    InvalidDhShare,
    KeyEpochWithPendingFragment,
    RenegotiationBindingMismatch,
    RenegotiationDenied,
    RenegotiationMissingBinding,
    RenegotiationVariedVersion,
}

impl From<PeerMisbehaved> for Error {
    fn from(e: PeerMisbehaved) -> Self {
        Self::PeerMisbehaved(e)
    }
}

/// The set of cases where we failed to make a connection because a peer
/// doesn't support a TLS version/feature we require.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PeerIncompatible {
    NoCipherSuitesInCommon,
    NoProtocolVersionsInCommon,
    NoSignatureHashesInCommon,
    NullCompressionRequired,
    SecureRenegotiationRequired,
}

impl From<PeerIncompatible> for Error {
    fn from(e: PeerIncompatible) -> Self {
        Self::PeerIncompatible(e)
    }
}

/// Random material generation failed.
#[derive(Debug)]
pub struct GetRandomFailed;

impl From<GetRandomFailed> for Error {
    fn from(_: GetRandomFailed) -> Self {
        Self::FailedToGetRandomBytes
    }
}

impl From<&Error> for AlertDescription {
    fn from(e: &Error) -> Self {
        match e {
            // Raw content-type confusion: a ChangeCipherSpec outside its
            // window, or handshake bytes where none can be.
            Error::InappropriateMessage { .. } => Self::UnexpectedMessage,

            // A handshake message the current state has no transition for.
            Error::InappropriateHandshakeMessage { .. } => Self::HandshakeFailure,

            // Unparseable bytes on the handshake channel.
            Error::InvalidMessage(_) => Self::UnexpectedMessage,

            Error::PeerMisbehaved(why) => match why {
                PeerMisbehaved::InvalidDhShare => Self::InsufficientSecurity,
                PeerMisbehaved::KeyEpochWithPendingFragment => Self::UnexpectedMessage,
                _ => Self::HandshakeFailure,
            },

            Error::PeerIncompatible(why) => match why {
                PeerIncompatible::NoProtocolVersionsInCommon => Self::ProtocolVersion,
                _ => Self::HandshakeFailure,
            },

            Error::FailedToGetRandomBytes | Error::Crypto(_) => Self::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_mapping_covers_specified_codes() {
        assert_eq!(
            AlertDescription::from(&Error::from(PeerIncompatible::NoProtocolVersionsInCommon)),
            AlertDescription::ProtocolVersion
        );
        assert_eq!(
            AlertDescription::from(&Error::from(PeerIncompatible::NoCipherSuitesInCommon)),
            AlertDescription::HandshakeFailure
        );
        assert_eq!(
            AlertDescription::from(&Error::from(PeerMisbehaved::InvalidDhShare)),
            AlertDescription::InsufficientSecurity
        );
        assert_eq!(
            AlertDescription::from(&Error::from(PeerMisbehaved::KeyEpochWithPendingFragment)),
            AlertDescription::UnexpectedMessage
        );
        assert_eq!(
            AlertDescription::from(&Error::from(InvalidMessage::MessageTooShort)),
            AlertDescription::UnexpectedMessage
        );
        assert_eq!(
            AlertDescription::from(&Error::InappropriateMessage {
                expect_types: vec![ContentType::ChangeCipherSpec],
                got_type: ContentType::Handshake,
            }),
            AlertDescription::UnexpectedMessage
        );
        assert_eq!(
            AlertDescription::from(&Error::InappropriateHandshakeMessage {
                expect_types: vec![HandshakeType::ClientKeyExchange],
                got_type: HandshakeType::ClientHello,
            }),
            AlertDescription::HandshakeFailure
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            format!("{}", Error::from(PeerMisbehaved::IncorrectFinished)),
            "peer misbehaved: IncorrectFinished"
        );
    }
}
