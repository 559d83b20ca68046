use log::warn;

use crate::enums::{ContentType, HandshakeType};
use crate::error::Error;
use crate::msgs::message::Message;

/// For a Message $m and a HandshakePayload enum member $payload_type,
/// return Ok(&payload) if $m is both a handshake message and one that
/// has the given $payload_type.  If not, return Err(Error) quoting
/// $handshake_type as the expected handshake type.
macro_rules! require_handshake_msg(
  ( $m:expr, $handshake_type:path, $payload_type:path ) => (
    match &$m {
        crate::msgs::message::Message::Handshake {
            parsed: crate::msgs::handshake::HandshakeMessagePayload {
                payload: $payload_type(hm),
                ..
            },
            ..
        } => Ok(hm),
        m => Err($crate::check::inappropriate_handshake_message(
            m,
            &[$crate::enums::ContentType::Handshake],
            &[$handshake_type]))
    }
  )
);

pub(crate) fn inappropriate_message(m: &Message, content_types: &[ContentType]) -> Error {
    warn!(
        "received a {:?} message while expecting {content_types:?}",
        m.content_type(),
    );
    Error::InappropriateMessage {
        expect_types: content_types.to_vec(),
        got_type: m.content_type(),
    }
}

pub(crate) fn inappropriate_handshake_message(
    m: &Message,
    content_types: &[ContentType],
    handshake_types: &[HandshakeType],
) -> Error {
    match m {
        Message::Handshake { parsed, .. } => {
            warn!(
                "received a {:?} handshake message while expecting {handshake_types:?}",
                parsed.typ,
            );
            Error::InappropriateHandshakeMessage {
                expect_types: handshake_types.to_vec(),
                got_type: parsed.typ,
            }
        }
        m => inappropriate_message(m, content_types),
    }
}
