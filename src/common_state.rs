use crate::enums::ContentType;
use crate::error::{Error, PeerMisbehaved};
use crate::hash_hs::HandshakeTranscript;
use crate::msgs::codec::Codec;
use crate::msgs::handshake::HandshakeMessagePayload;
use crate::msgs::message::Message;
use crate::tls12::CipherContext;

/// A directive produced by the handshake machine, in delivery order.
///
/// `Record` payloads must be framed and protected by the record layer
/// with whichever outbound context is current at that point in the list:
/// a `ChangeEncrypt` takes effect for every record after it.
/// `ChangeDecrypt` must be applied before the next inbound record is
/// decrypted.
#[derive(Debug)]
pub enum Output {
    /// A payload to send in a record of this content type.
    Record(ContentType, Vec<u8>),
    /// Swap the outbound cipher context.
    ChangeEncrypt(CipherContext),
    /// Swap the inbound cipher context.
    ChangeDecrypt(CipherContext),
}

/// State shared by every handshake state: the queue of outgoing
/// directives and what the connection knows about inbound framing.
pub(crate) struct CommonState {
    sends: Vec<Output>,

    /// Whether the handshake reassembly buffer was empty when the
    /// message being handled was dispatched.
    pub(crate) aligned: bool,
}

impl CommonState {
    pub(crate) fn new() -> Self {
        Self {
            sends: Vec::new(),
            aligned: true,
        }
    }

    /// Queue one outgoing message.
    pub(crate) fn send_msg(&mut self, m: Message) {
        let (typ, body) = match m {
            Message::Handshake { encoded, .. } => (ContentType::Handshake, encoded.0),
            Message::ChangeCipherSpec(ccs) => (ContentType::ChangeCipherSpec, ccs.get_encoding()),
        };
        self.sends.push(Output::Record(typ, body));
    }

    /// Queue an outbound cipher-context swap.  Records queued after this
    /// point are protected with `ctx`.
    pub(crate) fn start_encrypting(&mut self, ctx: CipherContext) {
        self.sends.push(Output::ChangeEncrypt(ctx));
    }

    /// Direct the caller to swap the inbound cipher context.
    pub(crate) fn start_decrypting(&mut self, ctx: CipherContext) {
        self.sends.push(Output::ChangeDecrypt(ctx));
    }

    /// A handshake boundary is being crossed: any buffered partial
    /// handshake message means the peer pushed bytes past it.
    pub(crate) fn check_aligned_handshake(&self) -> Result<(), Error> {
        match self.aligned {
            true => Ok(()),
            false => Err(PeerMisbehaved::KeyEpochWithPendingFragment.into()),
        }
    }

    pub(crate) fn take_sends(&mut self) -> Vec<Output> {
        core::mem::take(&mut self.sends)
    }
}

/// Context given to a state's `handle` call.
pub(crate) struct Context<'a> {
    pub(crate) common: &'a mut CommonState,
}

/// A handshake state.  Consuming `self` on every transition makes an
/// out-of-date state unrepresentable.
pub(crate) trait State: Send + Sync {
    fn handle(self: Box<Self>, cx: &mut Context<'_>, m: Message) -> Result<Box<dyn State>, Error>;

    /// The established session's parameters, for states that have them.
    fn epoch(&self) -> Option<&crate::server::Epoch> {
        None
    }
}

/// One server flight, encoded back-to-back into a single handshake
/// record and appended to the transcript message by message.
pub(crate) struct HandshakeFlight<'a> {
    transcript: &'a mut HandshakeTranscript,
    body: Vec<u8>,
}

impl<'a> HandshakeFlight<'a> {
    pub(crate) fn new(transcript: &'a mut HandshakeTranscript) -> Self {
        Self {
            transcript,
            body: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, hs: HandshakeMessagePayload) {
        let start = self.body.len();
        hs.encode(&mut self.body);
        self.transcript.add_raw(&self.body[start..]);
    }

    pub(crate) fn finish(self, common: &mut CommonState) {
        common
            .sends
            .push(Output::Record(ContentType::Handshake, self.body));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::HandshakeType;
    use crate::msgs::handshake::HandshakePayload;

    #[test]
    fn flight_concatenates_messages_into_one_record() {
        let mut transcript = HandshakeTranscript::new();
        let mut common = CommonState::new();

        let mut flight = HandshakeFlight::new(&mut transcript);
        flight.add(HandshakeMessagePayload {
            typ: HandshakeType::ServerHelloDone,
            payload: HandshakePayload::ServerHelloDone,
        });
        flight.add(HandshakeMessagePayload {
            typ: HandshakeType::ServerHelloDone,
            payload: HandshakePayload::ServerHelloDone,
        });
        flight.finish(&mut common);

        let sends = common.take_sends();
        assert_eq!(sends.len(), 1);
        let Output::Record(ContentType::Handshake, body) = &sends[0] else {
            panic!("expected one handshake record");
        };
        assert_eq!(body.as_slice(), b"\x0e\x00\x00\x00\x0e\x00\x00\x00");
        assert!(common.take_sends().is_empty());
    }

    #[test]
    fn unaligned_boundary_is_fatal() {
        let mut common = CommonState::new();
        assert!(common.check_aligned_handshake().is_ok());
        common.aligned = false;
        assert!(matches!(
            common.check_aligned_handshake(),
            Err(Error::PeerMisbehaved(
                PeerMisbehaved::KeyEpochWithPendingFragment
            ))
        ));
    }
}
