use core::fmt;
use std::collections::BTreeSet;

use pki_types::{CertificateDer, DnsName};

use crate::crypto::SecureRandom;
use crate::enums::{
    CipherSuite, Compression, ExtensionType, HandshakeType, HashAlgorithm, ProtocolVersion,
    ServerNameType, SignatureAlgorithm,
};
use crate::error::{GetRandomFailed, InvalidMessage};
use crate::msgs::base::{Payload, PayloadU8, PayloadU16};
use crate::msgs::codec::{Codec, LengthPrefixedBuffer, ListLength, Reader, TlsListElement, u24};
use crate::verify::DigitallySignedStruct;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Random(pub [u8; 32]);

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::base::hex(f, &self.0)
    }
}

impl Codec for Random {
    fn encode(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.0);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let Some(bytes) = r.take(32) else {
            return Err(InvalidMessage::MissingData("Random"));
        };

        let mut opaque = [0; 32];
        opaque.clone_from_slice(bytes);
        Ok(Self(opaque))
    }
}

impl Random {
    pub fn new(secure_random: &dyn SecureRandom) -> Result<Self, GetRandomFailed> {
        let mut data = [0u8; 32];
        secure_random.fill(&mut data)?;
        Ok(Self(data))
    }
}

impl From<[u8; 32]> for Random {
    #[inline]
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[derive(Copy, Clone)]
pub struct SessionId {
    data: [u8; 32],
    len: usize,
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::base::hex(f, &self.data[..self.len])
    }
}

impl Codec for SessionId {
    fn encode(&self, bytes: &mut Vec<u8>) {
        debug_assert!(self.len <= 32);
        bytes.push(self.len as u8);
        bytes.extend_from_slice(self.as_ref());
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let len = u8::read(r)? as usize;
        if len > 32 {
            return Err(InvalidMessage::TrailingData("SessionID"));
        }

        let Some(bytes) = r.take(len) else {
            return Err(InvalidMessage::MissingData("SessionID"));
        };

        let mut out = [0u8; 32];
        out[..len].clone_from_slice(&bytes[..len]);
        Ok(Self { data: out, len })
    }
}

impl SessionId {
    /// This server never issues session ids: resumption is not offered,
    /// and an incoming session_id is decoded but never matched against
    /// anything.
    pub fn empty() -> Self {
        Self {
            data: [0u8; 32],
            len: 0,
        }
    }
}

impl AsRef<[u8]> for SessionId {
    fn as_ref(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

/// RFC5246: `SignatureAndHashAlgorithm supported_signature_algorithms<2..2^16-2>;`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureAndHashAlgorithm {
    pub hash: HashAlgorithm,
    pub sign: SignatureAlgorithm,
}

impl SignatureAndHashAlgorithm {
    pub fn new(hash: HashAlgorithm, sign: SignatureAlgorithm) -> Self {
        Self { hash, sign }
    }

    pub(crate) fn rsa(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            sign: SignatureAlgorithm::RSA,
        }
    }
}

impl Codec for SignatureAndHashAlgorithm {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.hash.encode(bytes);
        self.sign.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        Ok(Self {
            hash: HashAlgorithm::read(r)?,
            sign: SignatureAlgorithm::read(r)?,
        })
    }
}

impl TlsListElement for SignatureAndHashAlgorithm {
    const SIZE_LEN: ListLength = ListLength::U16;
}

impl TlsListElement for CipherSuite {
    const SIZE_LEN: ListLength = ListLength::U16;
}

impl TlsListElement for Compression {
    const SIZE_LEN: ListLength = ListLength::U8;
}

/// The body of an RFC6066 `server_name` extension.
///
/// Only the `host_name` name type is defined; the first such entry wins.
#[derive(Clone, Debug, Default)]
pub struct ServerNamePayload {
    pub hostname: Option<DnsName<'static>>,
}

impl ServerNamePayload {
    pub fn single_hostname(hostname: DnsName<'static>) -> Self {
        Self {
            hostname: Some(hostname),
        }
    }
}

impl Codec for ServerNamePayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        let list = LengthPrefixedBuffer::new(ListLength::U16, bytes);
        if let Some(hostname) = &self.hostname {
            ServerNameType::HostName.encode(list.buf);
            PayloadU16::new(hostname.as_ref().as_bytes().to_vec()).encode(list.buf);
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let len = usize::from(u16::read(r)?);
        let mut sub = r.sub(len)?;

        let mut ret = Self::default();
        while sub.any_left() {
            let typ = ServerNameType::read(&mut sub)?;
            let name = PayloadU16::read(&mut sub)?;

            if typ != ServerNameType::HostName {
                continue;
            }

            let dns_name = core::str::from_utf8(name.as_ref())
                .ok()
                .and_then(|name| DnsName::try_from(name).ok())
                .ok_or(InvalidMessage::InvalidServerName)?;

            if ret.hostname.is_none() {
                ret.hostname = Some(dns_name.to_owned());
            }
        }

        Ok(ret)
    }
}

/// Extensions this server understands in a `ClientHello`.
///
/// Unknown extensions are skipped after a duplicate check; they still make
/// the hello illegal if repeated.
#[derive(Clone, Debug, Default)]
pub struct ClientExtensions {
    /// Requested server name indication (RFC6066)
    pub server_name: Option<ServerNamePayload>,

    /// Supported signature algorithms (RFC5246)
    pub signature_algorithms: Option<Vec<SignatureAndHashAlgorithm>>,

    /// Secure renegotiation binding (RFC5746)
    pub renegotiation_info: Option<PayloadU8>,
}

impl Codec for ClientExtensions {
    fn encode(&self, bytes: &mut Vec<u8>) {
        if self.server_name.is_none()
            && self.signature_algorithms.is_none()
            && self.renegotiation_info.is_none()
        {
            return;
        }

        let body = LengthPrefixedBuffer::new(ListLength::U16, bytes);
        if let Some(server_name) = &self.server_name {
            ExtensionType::ServerName.encode(body.buf);
            server_name.encode(LengthPrefixedBuffer::new(ListLength::U16, body.buf).buf);
        }
        if let Some(sigalgs) = &self.signature_algorithms {
            ExtensionType::SignatureAlgorithms.encode(body.buf);
            sigalgs.encode(LengthPrefixedBuffer::new(ListLength::U16, body.buf).buf);
        }
        if let Some(reneg) = &self.renegotiation_info {
            ExtensionType::RenegotiationInfo.encode(body.buf);
            reneg.encode(LengthPrefixedBuffer::new(ListLength::U16, body.buf).buf);
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let mut out = Self::default();

        // the extensions block can be entirely absent
        if !r.any_left() {
            return Ok(out);
        }

        let len = usize::from(u16::read(r)?);
        let mut sub = r.sub(len)?;

        let mut checker = DuplicateExtensionChecker::new();
        while sub.any_left() {
            let typ = ExtensionType::read(&mut sub)?;
            checker.check(typ)?;

            let len = usize::from(u16::read(&mut sub)?);
            let mut ext = sub.sub(len)?;

            match typ {
                ExtensionType::ServerName => {
                    out.server_name = Some(ServerNamePayload::read(&mut ext)?);
                }
                ExtensionType::SignatureAlgorithms => {
                    let algs = Vec::read(&mut ext)?;
                    if algs.is_empty() {
                        return Err(InvalidMessage::IllegalEmptyList("SignatureAlgorithms"));
                    }
                    out.signature_algorithms = Some(algs);
                }
                ExtensionType::RenegotiationInfo => {
                    out.renegotiation_info = Some(PayloadU8::read(&mut ext)?);
                }
                _ => {
                    ext.rest();
                }
            }

            ext.expect_empty("ClientExtensions")?;
        }

        Ok(out)
    }
}

/// Extensions this server may place in a `ServerHello`.
#[derive(Clone, Debug, Default)]
pub struct ServerExtensions {
    /// Secure renegotiation binding (RFC5746)
    pub renegotiation_info: Option<PayloadU8>,

    /// Acknowledgement of the client's server_name (RFC6066): an empty body.
    pub server_name_ack: Option<()>,
}

impl Codec for ServerExtensions {
    fn encode(&self, bytes: &mut Vec<u8>) {
        if self.renegotiation_info.is_none() && self.server_name_ack.is_none() {
            return;
        }

        let body = LengthPrefixedBuffer::new(ListLength::U16, bytes);
        if let Some(reneg) = &self.renegotiation_info {
            ExtensionType::RenegotiationInfo.encode(body.buf);
            reneg.encode(LengthPrefixedBuffer::new(ListLength::U16, body.buf).buf);
        }
        if self.server_name_ack.is_some() {
            ExtensionType::ServerName.encode(body.buf);
            0u16.encode(body.buf);
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let mut out = Self::default();

        if !r.any_left() {
            return Ok(out);
        }

        let len = usize::from(u16::read(r)?);
        let mut sub = r.sub(len)?;

        let mut checker = DuplicateExtensionChecker::new();
        while sub.any_left() {
            let typ = ExtensionType::read(&mut sub)?;
            checker.check(typ)?;

            let len = usize::from(u16::read(&mut sub)?);
            let mut ext = sub.sub(len)?;

            match typ {
                ExtensionType::RenegotiationInfo => {
                    out.renegotiation_info = Some(PayloadU8::read(&mut ext)?);
                }
                ExtensionType::ServerName => {
                    out.server_name_ack = Some(());
                }
                _ => {
                    ext.rest();
                }
            }

            ext.expect_empty("ServerExtensions")?;
        }

        Ok(out)
    }
}

struct DuplicateExtensionChecker(BTreeSet<u16>);

impl DuplicateExtensionChecker {
    fn new() -> Self {
        Self(BTreeSet::new())
    }

    fn check(&mut self, typ: ExtensionType) -> Result<(), InvalidMessage> {
        let u = u16::from(typ);
        match self.0.insert(u) {
            true => Ok(()),
            false => Err(InvalidMessage::DuplicateExtension(u)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientHelloPayload {
    pub client_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<Compression>,
    pub extensions: ClientExtensions,
}

impl ClientHelloPayload {
    /// The RFC5746 signalling suite, standing in for an empty
    /// renegotiation_info extension.
    pub fn offers_scsv(&self) -> bool {
        self.cipher_suites
            .contains(&CipherSuite::TLS_EMPTY_RENEGOTIATION_INFO_SCSV)
    }

    pub fn sni_hostname(&self) -> Option<&DnsName<'static>> {
        self.extensions
            .server_name
            .as_ref()
            .and_then(|sni| sni.hostname.as_ref())
    }
}

impl Codec for ClientHelloPayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.client_version.encode(bytes);
        self.random.encode(bytes);
        self.session_id.encode(bytes);
        self.cipher_suites.encode(bytes);
        self.compression_methods.encode(bytes);
        self.extensions.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let ret = Self {
            client_version: ProtocolVersion::read(r)?,
            random: Random::read(r)?,
            session_id: SessionId::read(r)?,
            cipher_suites: Vec::read(r)?,
            compression_methods: Vec::read(r)?,
            extensions: ClientExtensions::read(r)?,
        };

        if ret.cipher_suites.is_empty() {
            return Err(InvalidMessage::IllegalEmptyList("CipherSuites"));
        }

        match r.any_left() {
            true => Err(InvalidMessage::TrailingData("ClientHelloPayload")),
            false => Ok(ret),
        }
    }
}

#[derive(Debug)]
pub struct ServerHelloPayload {
    pub legacy_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suite: CipherSuite,
    pub compression_method: Compression,
    pub extensions: ServerExtensions,
}

impl Codec for ServerHelloPayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.legacy_version.encode(bytes);
        self.random.encode(bytes);
        self.session_id.encode(bytes);
        self.cipher_suite.encode(bytes);
        self.compression_method.encode(bytes);
        self.extensions.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        Ok(Self {
            legacy_version: ProtocolVersion::read(r)?,
            random: Random::read(r)?,
            session_id: SessionId::read(r)?,
            cipher_suite: CipherSuite::read(r)?,
            compression_method: Compression::read(r)?,
            extensions: ServerExtensions::read(r)?,
        })
    }
}

/// RFC5246: `ASN.1Cert certificate_list<0..2^24-1>;`, leaf first.
#[derive(Clone, Debug, Default)]
pub struct CertificateChain(pub Vec<CertificateDer<'static>>);

impl Codec for CertificateChain {
    fn encode(&self, bytes: &mut Vec<u8>) {
        let list = LengthPrefixedBuffer::new(ListLength::U24 { max: 0xff_ffff }, bytes);
        for cert in &self.0 {
            let nest = LengthPrefixedBuffer::new(ListLength::U24 { max: 0xff_ffff }, list.buf);
            nest.buf.extend_from_slice(cert.as_ref());
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let len = usize::from(u24::read(r)?);
        let mut sub = r.sub(len)?;

        let mut certs = Vec::new();
        while sub.any_left() {
            let cert_len = usize::from(u24::read(&mut sub)?);
            let body = sub
                .take(cert_len)
                .ok_or(InvalidMessage::MessageTooShort)?;
            certs.push(CertificateDer::from(body.to_vec()));
        }

        Ok(Self(certs))
    }
}

/// RFC5246: the `ServerDHParams` inside a DHE ServerKeyExchange.
#[derive(Clone, Debug)]
pub struct ServerDhParams {
    /// `opaque dh_p<1..2^16-1>;`
    pub dh_p: PayloadU16,
    /// `opaque dh_g<1..2^16-1>;`
    pub dh_g: PayloadU16,
    /// `opaque dh_Ys<1..2^16-1>;`
    pub dh_ys: PayloadU16,
}

impl Codec for ServerDhParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.dh_p.encode(bytes);
        self.dh_g.encode(bytes);
        self.dh_ys.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        Ok(Self {
            dh_p: PayloadU16::read(r)?,
            dh_g: PayloadU16::read(r)?,
            dh_ys: PayloadU16::read(r)?,
        })
    }
}

/// RFC5246: `opaque dh_Yc<1..2^16-1>;`
#[derive(Debug)]
pub struct ClientDhParams {
    pub public: PayloadU16,
}

impl Codec for ClientDhParams {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.public.encode(bytes);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        Ok(Self {
            public: PayloadU16::read(r)?,
        })
    }
}

#[derive(Debug)]
pub struct ServerKeyExchange {
    pub params: ServerDhParams,
    pub dss: DigitallySignedStruct,
}

impl ServerKeyExchange {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        self.params.encode(buf);
        self.dss.encode(buf);
    }
}

#[derive(Debug)]
pub enum ServerKeyExchangePayload {
    Known(ServerKeyExchange),
    Unknown(Payload),
}

impl From<ServerKeyExchange> for ServerKeyExchangePayload {
    fn from(value: ServerKeyExchange) -> Self {
        Self::Known(value)
    }
}

impl Codec for ServerKeyExchangePayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Known(x) => x.encode(bytes),
            Self::Unknown(x) => x.encode(bytes),
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        // read as Unknown, fully parse when the negotiated version is known
        Ok(Self::Unknown(Payload::read_all(r)))
    }
}

impl ServerKeyExchangePayload {
    /// The signed envelope carries an algorithm identifier only from TLS1.2.
    pub fn unwrap_given_version(&self, version: ProtocolVersion) -> Option<ServerKeyExchange> {
        if let Self::Unknown(unk) = self {
            let mut rd = Reader::init(unk.as_ref());

            let result = ServerKeyExchange {
                params: ServerDhParams::read(&mut rd).ok()?,
                dss: DigitallySignedStruct::read(&mut rd, version == ProtocolVersion::TLSv1_2)
                    .ok()?,
            };

            if !rd.any_left() {
                return Some(result);
            }
        }

        None
    }
}

#[derive(Debug)]
pub enum HandshakePayload {
    HelloRequest,
    ClientHello(ClientHelloPayload),
    ServerHello(ServerHelloPayload),
    Certificate(CertificateChain),
    ServerKeyExchange(ServerKeyExchangePayload),
    ServerHelloDone,
    ClientKeyExchange(Payload),
    Finished(Payload),
    Unknown(Payload),
}

#[derive(Debug)]
pub struct HandshakeMessagePayload {
    pub typ: HandshakeType,
    pub payload: HandshakePayload,
}

impl Codec for HandshakeMessagePayload {
    fn encode(&self, bytes: &mut Vec<u8>) {
        self.typ.encode(bytes);

        let nested = LengthPrefixedBuffer::new(ListLength::U24 { max: 0xff_ffff }, bytes);
        match &self.payload {
            HandshakePayload::HelloRequest | HandshakePayload::ServerHelloDone => {}
            HandshakePayload::ClientHello(x) => x.encode(nested.buf),
            HandshakePayload::ServerHello(x) => x.encode(nested.buf),
            HandshakePayload::Certificate(x) => x.encode(nested.buf),
            HandshakePayload::ServerKeyExchange(x) => x.encode(nested.buf),
            HandshakePayload::ClientKeyExchange(x) => x.encode(nested.buf),
            HandshakePayload::Finished(x) => x.encode(nested.buf),
            HandshakePayload::Unknown(x) => x.encode(nested.buf),
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let typ = HandshakeType::read(r)?;
        let len = usize::from(u24::read(r)?);
        let mut sub = r.sub(len)?;

        let payload = match typ {
            HandshakeType::HelloRequest if sub.left() == 0 => HandshakePayload::HelloRequest,
            HandshakeType::ClientHello => {
                HandshakePayload::ClientHello(ClientHelloPayload::read(&mut sub)?)
            }
            HandshakeType::ServerHello => {
                HandshakePayload::ServerHello(ServerHelloPayload::read(&mut sub)?)
            }
            HandshakeType::Certificate => {
                HandshakePayload::Certificate(CertificateChain::read(&mut sub)?)
            }
            HandshakeType::ServerKeyExchange => {
                HandshakePayload::ServerKeyExchange(ServerKeyExchangePayload::read(&mut sub)?)
            }
            HandshakeType::ServerHelloDone if sub.left() == 0 => HandshakePayload::ServerHelloDone,
            HandshakeType::ClientKeyExchange => {
                HandshakePayload::ClientKeyExchange(Payload::read_all(&mut sub))
            }
            HandshakeType::Finished => HandshakePayload::Finished(Payload::read_all(&mut sub)),
            _ => HandshakePayload::Unknown(Payload::read_all(&mut sub)),
        };

        sub.expect_empty("HandshakeMessagePayload")
            .map(|_| Self { typ, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hello() -> ClientHelloPayload {
        ClientHelloPayload {
            client_version: ProtocolVersion::TLSv1_2,
            random: Random::from([0x55; 32]),
            session_id: SessionId::empty(),
            cipher_suites: vec![
                CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
                CipherSuite::TLS_EMPTY_RENEGOTIATION_INFO_SCSV,
            ],
            compression_methods: vec![Compression::Null],
            extensions: ClientExtensions {
                server_name: Some(ServerNamePayload::single_hostname(
                    DnsName::try_from("example.com").unwrap().to_owned(),
                )),
                signature_algorithms: Some(vec![
                    SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA256),
                    SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA1),
                ]),
                renegotiation_info: Some(PayloadU8::empty()),
            },
        }
    }

    #[test]
    fn client_hello_round_trip() {
        let hello = HandshakeMessagePayload {
            typ: HandshakeType::ClientHello,
            payload: HandshakePayload::ClientHello(sample_hello()),
        };

        let bytes = hello.get_encoding();
        let parsed = HandshakeMessagePayload::read_bytes(&bytes).unwrap();
        assert_eq!(parsed.typ, HandshakeType::ClientHello);

        let HandshakePayload::ClientHello(ref ch) = parsed.payload else {
            panic!("wrong payload type");
        };
        assert_eq!(ch.client_version, ProtocolVersion::TLSv1_2);
        assert_eq!(ch.cipher_suites, sample_hello().cipher_suites);
        assert!(ch.offers_scsv());
        assert_eq!(
            ch.sni_hostname().map(|n| n.as_ref().to_owned()),
            Some("example.com".to_owned())
        );
        assert_eq!(
            ch.extensions.renegotiation_info,
            Some(PayloadU8::empty())
        );
        assert_eq!(parsed.get_encoding(), bytes);
    }

    #[test]
    fn client_hello_rejects_trailing_bytes() {
        let mut bytes = sample_hello().get_encoding();
        bytes.push(0x00);
        assert!(ClientHelloPayload::read_bytes(&bytes).is_err());
    }

    #[test]
    fn client_hello_rejects_duplicate_extensions() {
        let mut body = sample_hello().get_encoding();
        // splice a second copy of the final (renegotiation_info) extension
        let dupe = [0xff, 0x01, 0x00, 0x01, 0x00];
        let ext_block_len_at = 2 + 32 + 1 + 2 + 2 * 2 + 1 + 1;
        body.extend_from_slice(&dupe);
        let new_len =
            u16::from_be_bytes([body[ext_block_len_at], body[ext_block_len_at + 1]]) + 5;
        body[ext_block_len_at..ext_block_len_at + 2].copy_from_slice(&new_len.to_be_bytes());
        assert!(matches!(
            ClientHelloPayload::read_bytes(&body),
            Err(InvalidMessage::DuplicateExtension(0xff01))
        ));
    }

    #[test]
    fn server_hello_round_trip() {
        let sh = HandshakeMessagePayload {
            typ: HandshakeType::ServerHello,
            payload: HandshakePayload::ServerHello(ServerHelloPayload {
                legacy_version: ProtocolVersion::TLSv1_2,
                random: Random::from([7; 32]),
                session_id: SessionId::empty(),
                cipher_suite: CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA256,
                compression_method: Compression::Null,
                extensions: ServerExtensions {
                    renegotiation_info: Some(PayloadU8::new(vec![1, 2, 3])),
                    server_name_ack: Some(()),
                },
            }),
        };

        let bytes = sh.get_encoding();
        let parsed = HandshakeMessagePayload::read_bytes(&bytes).unwrap();
        let HandshakePayload::ServerHello(ref sh) = parsed.payload else {
            panic!("wrong payload type");
        };
        assert_eq!(sh.extensions.renegotiation_info, Some(PayloadU8::new(vec![1, 2, 3])));
        assert_eq!(sh.extensions.server_name_ack, Some(()));
        assert_eq!(parsed.get_encoding(), bytes);
    }

    #[test]
    fn certificate_chain_round_trip() {
        let chain = CertificateChain(vec![
            CertificateDer::from(vec![1, 2, 3]),
            CertificateDer::from(vec![4, 5]),
        ]);
        let bytes = chain.get_encoding();
        let parsed = CertificateChain::read_bytes(&bytes).unwrap();
        assert_eq!(parsed.0.len(), 2);
        assert_eq!(parsed.0[0].as_ref(), &[1, 2, 3]);
        assert_eq!(parsed.get_encoding(), bytes);
    }

    #[test]
    fn empty_certificate_chain_is_legal() {
        let bytes = CertificateChain::default().get_encoding();
        assert_eq!(bytes, vec![0, 0, 0]);
        assert!(CertificateChain::read_bytes(&bytes)
            .unwrap()
            .0
            .is_empty());
    }

    #[test]
    fn server_kx_decodes_with_version_context() {
        let skx = ServerKeyExchange {
            params: ServerDhParams {
                dh_p: PayloadU16::new(vec![0xff; 16]),
                dh_g: PayloadU16::new(vec![2]),
                dh_ys: PayloadU16::new(vec![0xab; 16]),
            },
            dss: DigitallySignedStruct::new(
                Some(SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA256)),
                vec![9; 64],
            ),
        };

        let mut bytes = Vec::new();
        skx.encode(&mut bytes);

        let payload = ServerKeyExchangePayload::read_bytes(&bytes).unwrap();
        let known = payload
            .unwrap_given_version(ProtocolVersion::TLSv1_2)
            .unwrap();
        assert_eq!(known.params.dh_g.as_ref(), &[2]);
        assert_eq!(
            known.dss.algorithm,
            Some(SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA256))
        );

        // without the algorithm prefix the same bytes are not a valid
        // TLS1.0 envelope
        assert!(payload
            .unwrap_given_version(ProtocolVersion::TLSv1_0)
            .is_none());
    }

    #[test]
    fn unknown_handshake_type_survives_round_trip() {
        let bytes = [0x63, 0x00, 0x00, 0x02, 0xaa, 0xbb];
        let parsed = HandshakeMessagePayload::read_bytes(&bytes).unwrap();
        assert_eq!(parsed.typ, HandshakeType::Unknown(0x63));
        assert_eq!(parsed.get_encoding(), bytes);
    }
}
