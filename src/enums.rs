#![allow(non_camel_case_types)]
#![allow(clippy::upper_case_acronyms)]

use crate::msgs::codec::{Codec, Reader};

enum_builder! {
    /// The `ProtocolVersion` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u16)]
    pub enum ProtocolVersion {
        SSLv3 => 0x0300,
        TLSv1_0 => 0x0301,
        TLSv1_1 => 0x0302,
        TLSv1_2 => 0x0303,
        TLSv1_3 => 0x0304,
    }
}

impl ProtocolVersion {
    /// Versions are totally ordered by their wire value.
    pub(crate) fn is_up_to(&self, other: Self) -> bool {
        u16::from(*self) <= u16::from(other)
    }
}

enum_builder! {
    /// The `ContentType` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum ContentType {
        ChangeCipherSpec => 0x14,
        Alert => 0x15,
        Handshake => 0x16,
        ApplicationData => 0x17,
    }
}

enum_builder! {
    /// The `HandshakeType` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum HandshakeType {
        HelloRequest => 0x00,
        ClientHello => 0x01,
        ServerHello => 0x02,
        Certificate => 0x0b,
        ServerKeyExchange => 0x0c,
        CertificateRequest => 0x0d,
        ServerHelloDone => 0x0e,
        CertificateVerify => 0x0f,
        ClientKeyExchange => 0x10,
        Finished => 0x14,
    }
}

enum_builder! {
    /// The `AlertLevel` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum AlertLevel {
        Warning => 0x01,
        Fatal => 0x02,
    }
}

enum_builder! {
    /// The `AlertDescription` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum AlertDescription {
        CloseNotify => 0x00,
        UnexpectedMessage => 0x0a,
        BadRecordMac => 0x14,
        RecordOverflow => 0x16,
        HandshakeFailure => 0x28,
        BadCertificate => 0x2a,
        IllegalParameter => 0x2f,
        DecodeError => 0x32,
        DecryptError => 0x33,
        ProtocolVersion => 0x46,
        InsufficientSecurity => 0x47,
        InternalError => 0x50,
        NoRenegotiation => 0x64,
    }
}

enum_builder! {
    /// The `Compression` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum Compression {
        Null => 0x00,
        Deflate => 0x01,
    }
}

enum_builder! {
    /// The `CipherSuite` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u16)]
    pub enum CipherSuite {
        /// The `TLS_EMPTY_RENEGOTIATION_INFO_SCSV` signalling value; not a
        /// real suite.  Defined in RFC5746.
        TLS_EMPTY_RENEGOTIATION_INFO_SCSV => 0x00ff,

        /// The `TLS_RSA_WITH_AES_128_CBC_SHA` cipher suite.  Defined in RFC5246.
        TLS_RSA_WITH_AES_128_CBC_SHA => 0x002f,

        /// The `TLS_DHE_RSA_WITH_AES_128_CBC_SHA` cipher suite.  Defined in RFC5246.
        TLS_DHE_RSA_WITH_AES_128_CBC_SHA => 0x0033,

        /// The `TLS_RSA_WITH_AES_256_CBC_SHA` cipher suite.  Defined in RFC5246.
        TLS_RSA_WITH_AES_256_CBC_SHA => 0x0035,

        /// The `TLS_DHE_RSA_WITH_AES_256_CBC_SHA` cipher suite.  Defined in RFC5246.
        TLS_DHE_RSA_WITH_AES_256_CBC_SHA => 0x0039,

        /// The `TLS_RSA_WITH_AES_128_CBC_SHA256` cipher suite.  Defined in RFC5246.
        TLS_RSA_WITH_AES_128_CBC_SHA256 => 0x003c,

        /// The `TLS_RSA_WITH_AES_256_CBC_SHA256` cipher suite.  Defined in RFC5246.
        TLS_RSA_WITH_AES_256_CBC_SHA256 => 0x003d,

        /// The `TLS_DHE_RSA_WITH_AES_128_CBC_SHA256` cipher suite.  Defined in RFC5246.
        TLS_DHE_RSA_WITH_AES_128_CBC_SHA256 => 0x0067,

        /// The `TLS_DHE_RSA_WITH_AES_256_CBC_SHA256` cipher suite.  Defined in RFC5246.
        TLS_DHE_RSA_WITH_AES_256_CBC_SHA256 => 0x006b,
    }
}

enum_builder! {
    /// The `HashAlgorithm` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum HashAlgorithm {
        NONE => 0x00,
        MD5 => 0x01,
        SHA1 => 0x02,
        SHA224 => 0x03,
        SHA256 => 0x04,
        SHA384 => 0x05,
        SHA512 => 0x06,
    }
}

enum_builder! {
    /// The `SignatureAlgorithm` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum SignatureAlgorithm {
        Anonymous => 0x00,
        RSA => 0x01,
        DSA => 0x02,
        ECDSA => 0x03,
    }
}

enum_builder! {
    /// The `ExtensionType` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u16)]
    pub enum ExtensionType {
        ServerName => 0x0000,
        StatusRequest => 0x0005,
        EllipticCurves => 0x000a,
        ECPointFormats => 0x000b,
        SignatureAlgorithms => 0x000d,
        SessionTicket => 0x0023,
        RenegotiationInfo => 0xff01,
    }
}

enum_builder! {
    /// The `ServerNameType` TLS protocol enum.  Values in this enum are taken
    /// from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum ServerNameType {
        HostName => 0x00,
    }
}

/// The kinds of key exchange this crate's cipher suites use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyExchangeAlgorithm {
    /// Key exchange by RSA-encrypted premaster secret
    RSA,
    /// Ephemeral finite-field Diffie-Hellman, RSA-signed
    DHE_RSA,
}

impl KeyExchangeAlgorithm {
    /// Whether this key exchange authenticates the server with a certificate.
    ///
    /// True for every suite this crate supports; anonymous suites are not
    /// offered.
    pub fn requires_server_certificate(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip8<T: Codec + Copy>(vals: &[T])
    where
        u8: From<T>,
    {
        for v in vals {
            let enc = v.get_encoding();
            assert_eq!(enc.len(), 1);
            assert_eq!(u8::from(T::read_bytes(&enc).unwrap()), u8::from(*v));
        }
    }

    #[test]
    fn enum_round_trips() {
        round_trip8(&[
            ContentType::ChangeCipherSpec,
            ContentType::Alert,
            ContentType::Handshake,
        ]);
        round_trip8(&[
            HandshakeType::ClientHello,
            HandshakeType::Finished,
            HandshakeType::Unknown(0x99),
        ]);
        round_trip8(&[HashAlgorithm::MD5, HashAlgorithm::SHA512]);
        round_trip8(&[SignatureAlgorithm::RSA, SignatureAlgorithm::ECDSA]);

        let scsv = CipherSuite::TLS_EMPTY_RENEGOTIATION_INFO_SCSV;
        assert_eq!(u16::from(scsv), 0x00ff);
        assert_eq!(CipherSuite::from(0x00ff), scsv);
    }

    #[test]
    fn version_ordering() {
        assert!(ProtocolVersion::TLSv1_0.is_up_to(ProtocolVersion::TLSv1_2));
        assert!(ProtocolVersion::TLSv1_2.is_up_to(ProtocolVersion::TLSv1_2));
        assert!(!ProtocolVersion::TLSv1_2.is_up_to(ProtocolVersion::TLSv1_1));
    }
}
