//! Cryptographic primitives for Quill.
//!
//! Wraps BIP-340 Schnorr signing over secp256k1 and SHA-256 hashing with
//! strong types. Public keys are x-only (32 bytes).

use rand::RngCore;
use secp256k1::{schnorr, Message, Secp256k1, SecretKey, XOnlyPublicKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::{decode_hex32, decode_lower_hex, EventId};

/// Compute the SHA-256 digest of the given data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// A 32-byte x-only secp256k1 public key (the author of an event).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        decode_hex32(s).map(Self)
    }

    /// Verify a Schnorr signature over an event id.
    pub fn verify(&self, id: &EventId, signature: &Signature) -> Result<(), CoreError> {
        let secp = Secp256k1::verification_only();
        let pubkey = XOnlyPublicKey::from_slice(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig =
            schnorr::Signature::from_slice(&signature.0).map_err(|_| CoreError::InvalidSignature)?;
        let message = Message::from_digest(id.0);

        secp.verify_schnorr(&sig, &message, &pubkey)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 64-byte BIP-340 Schnorr signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        decode_lower_hex::<64>(s).map(Self)
    }

    /// The zero signature (invalid, used as placeholder).
    pub const ZERO: Self = Self([0u8; 64]);
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A keypair for signing events.
///
/// This wraps secp256k1's Keypair. Only concrete signers hold one; the
/// event layer itself never sees secret material.
#[derive(Clone)]
pub struct Keypair {
    inner: secp256k1::Keypair,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            // Out-of-range scalars are astronomically rare; draw again.
            if let Ok(keypair) = Self::from_secret_bytes(&seed) {
                return keypair;
            }
        }
    }

    /// Create from 32 secret-key bytes.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self, CoreError> {
        let secp = Secp256k1::signing_only();
        let sk = SecretKey::from_slice(secret).map_err(|_| CoreError::InvalidSecretKey)?;
        Ok(Self {
            inner: secp256k1::Keypair::from_secret_key(&secp, &sk),
        })
    }

    /// Create from a hex-encoded secret key.
    pub fn from_secret_hex(s: &str) -> Result<Self, CoreError> {
        Self::from_secret_bytes(&decode_hex32(s)?)
    }

    /// Get the x-only public key.
    pub fn public_key(&self) -> PublicKey {
        let (xonly, _parity) = self.inner.x_only_public_key();
        PublicKey(xonly.serialize())
    }

    /// Sign an event id. Deterministic: no auxiliary randomness is mixed in.
    pub fn sign(&self, id: &EventId) -> Signature {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest(id.0);
        let sig = secp.sign_schnorr_no_aux_rand(&message, &self.inner);
        Signature(sig.serialize())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let id = EventId(sha256(b"hello world"));
        let signature = keypair.sign(&id);

        keypair
            .public_key()
            .verify(&id, &signature)
            .expect("valid signature should verify");

        let tampered = EventId(sha256(b"hello worlD"));
        assert!(keypair.public_key().verify(&tampered, &signature).is_err());
    }

    #[test]
    fn test_known_public_key() {
        // BIP-340 test vector 0.
        let mut secret = [0u8; 32];
        secret[31] = 3;
        let keypair = Keypair::from_secret_bytes(&secret).unwrap();
        assert_eq!(
            keypair.public_key().to_hex(),
            "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
    }

    #[test]
    fn test_keypair_deterministic_from_secret() {
        let kp1 = Keypair::from_secret_bytes(&seed(0x42)).unwrap();
        let kp2 = Keypair::from_secret_bytes(&seed(0x42)).unwrap();
        assert_eq!(kp1.public_key(), kp2.public_key());

        let id = EventId(sha256(b"same"));
        assert_eq!(kp1.sign(&id), kp2.sign(&id));
    }

    #[test]
    fn test_zero_secret_rejected() {
        assert!(matches!(
            Keypair::from_secret_bytes(&[0u8; 32]),
            Err(CoreError::InvalidSecretKey)
        ));
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let pk = Keypair::generate().public_key();
        let recovered = PublicKey::from_hex(&pk.to_hex()).unwrap();
        assert_eq!(pk, recovered);
    }
}
