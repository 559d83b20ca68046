use crate::enums::{HashAlgorithm, SignatureAlgorithm};
use crate::error::InvalidMessage;
use crate::msgs::base::PayloadU16;
use crate::msgs::codec::{Codec, Reader};
use crate::msgs::handshake::SignatureAndHashAlgorithm;

/// The RFC5246 "digitally-signed" envelope.
///
/// From TLS1.2 the signature is preceded by the algorithm pair that made
/// it; earlier versions imply the algorithm from the cipher suite.
#[derive(Debug)]
pub struct DigitallySignedStruct {
    pub algorithm: Option<SignatureAndHashAlgorithm>,
    pub signature: PayloadU16,
}

impl DigitallySignedStruct {
    pub fn new(algorithm: Option<SignatureAndHashAlgorithm>, signature: Vec<u8>) -> Self {
        Self {
            algorithm,
            signature: PayloadU16::new(signature),
        }
    }

    pub fn encode(&self, bytes: &mut Vec<u8>) {
        if let Some(algorithm) = &self.algorithm {
            algorithm.encode(bytes);
        }
        self.signature.encode(bytes);
    }

    pub fn read(r: &mut Reader<'_>, has_algorithm: bool) -> Result<Self, InvalidMessage> {
        let algorithm = match has_algorithm {
            true => Some(SignatureAndHashAlgorithm::read(r)?),
            false => None,
        };

        Ok(Self {
            algorithm,
            signature: PayloadU16::read(r)?,
        })
    }
}

/// The hashes a client is presumed to accept when it sent no
/// SignatureAlgorithms extension (RFC5246 section 7.4.1.4.1).
pub(crate) static DEFAULT_RSA_SIGNATURE: SignatureAndHashAlgorithm = SignatureAndHashAlgorithm {
    hash: HashAlgorithm::SHA1,
    sign: SignatureAlgorithm::RSA,
};

/// Choose the hash for a TLS1.2 server signature.
///
/// `ours` is the server's hash preference order; the first preference the
/// client offered alongside RSA wins.
pub(crate) fn choose_signature_hash(
    offered: Option<&[SignatureAndHashAlgorithm]>,
    ours: &[HashAlgorithm],
) -> Option<SignatureAndHashAlgorithm> {
    let offered = match offered {
        Some(offered) => offered,
        None => return Some(DEFAULT_RSA_SIGNATURE),
    };

    ours.iter()
        .map(|hash| SignatureAndHashAlgorithm::rsa(*hash))
        .find(|wanted| offered.contains(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_extension_falls_back_to_sha1() {
        assert_eq!(
            choose_signature_hash(None, &[HashAlgorithm::SHA256]),
            Some(DEFAULT_RSA_SIGNATURE)
        );
    }

    #[test]
    fn server_preference_order_wins() {
        let offered = [
            SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA1),
            SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA512),
            SignatureAndHashAlgorithm::new(HashAlgorithm::SHA256, SignatureAlgorithm::ECDSA),
        ];
        let ours = [HashAlgorithm::SHA256, HashAlgorithm::SHA512, HashAlgorithm::SHA1];

        // SHA256 is only offered for ECDSA, so our next preference wins.
        assert_eq!(
            choose_signature_hash(Some(&offered), &ours),
            Some(SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA512))
        );
    }

    #[test]
    fn no_rsa_offer_is_no_match() {
        let offered = [SignatureAndHashAlgorithm::new(
            HashAlgorithm::SHA256,
            SignatureAlgorithm::DSA,
        )];
        assert_eq!(
            choose_signature_hash(Some(&offered), &[HashAlgorithm::SHA256]),
            None
        );
    }

    #[test]
    fn digitally_signed_round_trips_both_forms() {
        let tls12 = DigitallySignedStruct::new(
            Some(SignatureAndHashAlgorithm::rsa(HashAlgorithm::SHA384)),
            vec![0xaa; 32],
        );
        let mut bytes = Vec::new();
        tls12.encode(&mut bytes);
        let parsed = DigitallySignedStruct::read(&mut Reader::init(&bytes), true).unwrap();
        assert_eq!(parsed.algorithm, tls12.algorithm);
        assert_eq!(parsed.signature, tls12.signature);

        let legacy = DigitallySignedStruct::new(None, vec![0xbb; 16]);
        let mut bytes = Vec::new();
        legacy.encode(&mut bytes);
        let parsed = DigitallySignedStruct::read(&mut Reader::init(&bytes), false).unwrap();
        assert_eq!(parsed.algorithm, None);
        assert_eq!(parsed.signature.as_ref(), &[0xbb; 16][..]);
    }
}
