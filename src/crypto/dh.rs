use num_bigint_dig::BigUint;
use zeroize::Zeroize;

use super::{SecureRandom, SharedSecret};
use crate::error::{Error, GetRandomFailed, PeerMisbehaved};

/// Parameters of a finite-field Diffie-Hellman group, big-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DhGroup {
    pub p: &'static [u8],
    pub g: &'static [u8],
}

/// The 1024-bit MODP group ("Oakley group 2") from RFC2409 section 6.2.
///
/// The prime is 2^1024 - 2^960 - 1 + 2^64 * { [2^894 pi] + 129093 }.
pub static MODP_GROUP2: DhGroup = DhGroup {
    p: &[
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xc9, 0x0f, 0xda, 0xa2, 0x21, 0x68, 0xc2,
        0x34, 0xc4, 0xc6, 0x62, 0x8b, 0x80, 0xdc, 0x1c, 0xd1, 0x29, 0x02, 0x4e, 0x08, 0x8a, 0x67,
        0xcc, 0x74, 0x02, 0x0b, 0xbe, 0xa6, 0x3b, 0x13, 0x9b, 0x22, 0x51, 0x4a, 0x08, 0x79, 0x8e,
        0x34, 0x04, 0xdd, 0xef, 0x95, 0x19, 0xb3, 0xcd, 0x3a, 0x43, 0x1b, 0x30, 0x2b, 0x0a, 0x6d,
        0xf2, 0x5f, 0x14, 0x37, 0x4f, 0xe1, 0x35, 0x6d, 0x6d, 0x51, 0xc2, 0x45, 0xe4, 0x85, 0xb5,
        0x76, 0x62, 0x5e, 0x7e, 0xc6, 0xf4, 0x4c, 0x42, 0xe9, 0xa6, 0x37, 0xed, 0x6b, 0x0b, 0xff,
        0x5c, 0xb6, 0xf4, 0x06, 0xb7, 0xed, 0xee, 0x38, 0x6b, 0xfb, 0x5a, 0x89, 0x9f, 0xa5, 0xae,
        0x9f, 0x24, 0x11, 0x7c, 0x4b, 0x1f, 0xe6, 0x49, 0x28, 0x66, 0x51, 0xec, 0xe6, 0x53, 0x81,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ],
    g: &[2],
};

/// An in-progress ephemeral Diffie-Hellman exchange: our secret exponent
/// and the public share we have advertised.
pub struct ActiveDhKeyExchange {
    group: &'static DhGroup,
    secret: BigUint,
    pub_key: Vec<u8>,
}

impl ActiveDhKeyExchange {
    /// Generate an ephemeral keypair in `group`.
    pub fn start(
        group: &'static DhGroup,
        random: &dyn SecureRandom,
    ) -> Result<Self, GetRandomFailed> {
        let mut secret_bytes = vec![0u8; group.p.len()];
        random.fill(&mut secret_bytes)?;

        let p = BigUint::from_bytes_be(group.p);
        // x in [2, p-1)
        let secret =
            BigUint::from_bytes_be(&secret_bytes) % (&p - BigUint::from(3u32)) + BigUint::from(2u32);
        secret_bytes.zeroize();

        let g = BigUint::from_bytes_be(group.g);
        let pub_key = to_group_element(g.modpow(&secret, &p), group);

        Ok(Self {
            group,
            secret,
            pub_key,
        })
    }

    /// Our public share, left-padded to the group's modulus size.
    pub fn pub_key(&self) -> &[u8] {
        &self.pub_key
    }

    pub fn group(&self) -> &'static DhGroup {
        self.group
    }

    /// Complete the exchange with the peer's share.
    ///
    /// Shares outside [2, p-2], and exchanges yielding a degenerate
    /// shared secret, are rejected.
    pub fn complete(self, peer_pub_key: &[u8]) -> Result<SharedSecret, Error> {
        let p = BigUint::from_bytes_be(self.group.p);
        let y = BigUint::from_bytes_be(peer_pub_key);

        let two = BigUint::from(2u32);
        if y < two || y > &p - &two {
            return Err(PeerMisbehaved::InvalidDhShare.into());
        }

        let z = y.modpow(&self.secret, &p);
        if z <= BigUint::from(1u32) || z == &p - BigUint::from(1u32) {
            return Err(PeerMisbehaved::InvalidDhShare.into());
        }

        // RFC5246 section 8.1.2: leading zero octets of Z are stripped
        // before it is used as the premaster secret.
        Ok(SharedSecret::from(z.to_bytes_be()))
    }
}

impl Drop for ActiveDhKeyExchange {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

fn to_group_element(value: BigUint, group: &DhGroup) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut padded = vec![0u8; group.p.len() - bytes.len()];
    padded.extend_from_slice(&bytes);
    padded
}
