use crate::error::InvalidMessage;
use crate::msgs::codec::{Codec, Reader};

#[derive(Debug)]
pub struct ChangeCipherSpecPayload;

impl Codec for ChangeCipherSpecPayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        1u8.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let typ = u8::read(r)?;
        if typ != 1 {
            return Err(InvalidMessage::InvalidCcs);
        }

        r.expect_empty("ChangeCipherSpecPayload")
            .map(|_| Self {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_single_octet() {
        assert_eq!(ChangeCipherSpecPayload.get_encoding(), vec![0x01]);
    }

    #[test]
    fn rejects_wrong_value_and_trailing_bytes() {
        assert!(ChangeCipherSpecPayload::read_bytes(&[0x01]).is_ok());
        assert!(ChangeCipherSpecPayload::read_bytes(&[0x02]).is_err());
        assert!(ChangeCipherSpecPayload::read_bytes(&[0x01, 0x00]).is_err());
    }
}
