use crate::enums::ContentType;
use crate::error::InvalidMessage;
use crate::msgs::base::Payload;
use crate::msgs::ccs::ChangeCipherSpecPayload;
use crate::msgs::codec::Codec;
use crate::msgs::handshake::HandshakeMessagePayload;

/// A decoded message delivered to the handshake state machine.
///
/// Handshake messages keep their original encoding alongside the parsed
/// form: the transcript is defined over exactly the bytes received.
/// Alerts never appear here; they are sent by the connection owner, not
/// the handshake machine.
#[derive(Debug)]
pub enum Message {
    Handshake {
        parsed: HandshakeMessagePayload,
        encoded: Payload,
    },
    ChangeCipherSpec(ChangeCipherSpecPayload),
}

impl Message {
    /// Parse a single handshake message, retaining its wire encoding.
    pub fn handshake(encoded: Vec<u8>) -> Result<Self, InvalidMessage> {
        let parsed = HandshakeMessagePayload::read_bytes(&encoded)?;
        Ok(Self::Handshake {
            parsed,
            encoded: Payload::new(encoded),
        })
    }

    /// Build an outbound handshake message from its typed form.
    pub fn build_handshake(parsed: HandshakeMessagePayload) -> Self {
        let encoded = Payload::new(parsed.get_encoding());
        Self::Handshake { parsed, encoded }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Handshake { .. } => ContentType::Handshake,
            Self::ChangeCipherSpec(_) => ContentType::ChangeCipherSpec,
        }
    }
}
