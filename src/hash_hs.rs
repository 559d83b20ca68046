use crate::enums::ProtocolVersion;
use crate::msgs::message::Message;
use crate::suites::SupportedCipherSuite;
use crate::crypto::hash;
use crate::crypto::hash::Hash;

/// The ordered bytes of every handshake message exchanged so far in the
/// current handshake, in wire order.
///
/// This stays a byte buffer for the whole handshake rather than becoming a
/// running hash context: TLS 1.0/1.1 Finished needs both MD5 and SHA-1
/// over the same log, and the TLS 1.2 hash is not pinned until the cipher
/// suite is.  ChangeCipherSpec is not a handshake message and never
/// appears here.
#[derive(Clone, Default)]
pub(crate) struct HandshakeTranscript {
    buffer: Vec<u8>,
}

impl HandshakeTranscript {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Buffer a received or sent handshake message.
    pub(crate) fn add_message(&mut self, m: &Message) {
        if let Message::Handshake { encoded, .. } = m {
            self.add_raw(encoded.as_ref());
        }
    }

    /// Buffer an already-encoded handshake message.
    pub(crate) fn add_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// The digest the Finished verify_data is computed over: MD5 || SHA1
    /// of the log before TLS 1.2, the suite's PRF hash from TLS 1.2.
    pub(crate) fn current_hash(
        &self,
        version: ProtocolVersion,
        suite: &SupportedCipherSuite,
    ) -> Vec<u8> {
        match version {
            ProtocolVersion::TLSv1_2 => suite
                .prf_hash
                .compute(&self.buffer)
                .as_ref()
                .to_vec(),
            _ => {
                let mut out = hash::MD5.compute(&self.buffer).as_ref().to_vec();
                out.extend_from_slice(hash::SHA1.compute(&self.buffer).as_ref());
                out
            }
        }
    }
}
