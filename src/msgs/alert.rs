use crate::enums::{AlertDescription, AlertLevel};
use crate::error::InvalidMessage;
use crate::msgs::codec::{Codec, Reader};

/// The two-octet alert body.
///
/// The handshake machine itself never sends alerts; the connection
/// owner encodes the alert a fatal [`Error`] maps to with this before
/// tearing the connection down.
///
/// [`Error`]: crate::Error
#[derive(Debug)]
pub struct AlertMessagePayload {
    pub level: AlertLevel,
    pub description: AlertDescription,
}

impl Codec for AlertMessagePayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.level.encode(bytes);
        self.description.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let level = AlertLevel::read(r)?;
        let description = AlertDescription::read(r)?;

        r.expect_empty("AlertMessagePayload")
            .map(|_| Self { level, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_encoding() {
        let alert = AlertMessagePayload {
            level: AlertLevel::Fatal,
            description: AlertDescription::HandshakeFailure,
        };
        assert_eq!(alert.get_encoding(), vec![0x02, 0x28]);
    }
}
