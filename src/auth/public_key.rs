// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authority public key decoding.
//!
//! The authority publishes its RSA public key as base64-encoded DER
//! (`SubjectPublicKeyInfo`, the `pkcs8-public-der` layout). This module unwraps
//! that envelope into the raw modulus/exponent pair ring verifies against.

use std::fmt;

use base64ct::{Base64, Encoding};
use ring::signature::{self, RsaParameters, RsaPublicKeyComponents};
use spki::der::{asn1::UintRef, Decode, Reader, SliceReader};
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};

use super::error::AuthError;

/// Signature scheme fixed by the authority's protocol: RSASSA-PKCS1-v1_5 with
/// SHA-1 over 2048 to 8192 bit keys.
pub static SIGNATURE_SCHEME: &RsaParameters =
    &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY;

/// `rsaEncryption` (PKCS #1).
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

const MIN_MODULUS_BITS: usize = 2048;
const MAX_MODULUS_BITS: usize = 8192;

/// Decoded authority verification key. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    modulus: Vec<u8>,
    exponent: Vec<u8>,
}

impl SigningKey {
    /// Decode the payload served by the public key endpoint.
    ///
    /// ASCII whitespace anywhere in the payload is ignored, so trailing
    /// newlines and line-wrapped bodies both decode.
    pub fn from_base64_der(payload: &str) -> Result<Self, AuthError> {
        let compact: String = payload.split_ascii_whitespace().collect();
        if compact.is_empty() {
            return Err(AuthError::KeyDecode("empty payload".to_string()));
        }

        let der = Base64::decode_vec(&compact)
            .map_err(|e| AuthError::KeyDecode(format!("invalid base64: {e}")))?;

        Self::from_der(&der)
    }

    /// Decode a DER `SubjectPublicKeyInfo` holding an RSA key.
    pub fn from_der(der: &[u8]) -> Result<Self, AuthError> {
        let spki = SubjectPublicKeyInfoRef::try_from(der)
            .map_err(|e| AuthError::KeyDecode(format!("invalid SubjectPublicKeyInfo: {e}")))?;

        if spki.algorithm.oid != RSA_ENCRYPTION {
            return Err(AuthError::KeyDecode(format!(
                "unsupported key algorithm {}",
                spki.algorithm.oid
            )));
        }

        let rsa_key = spki.subject_public_key.as_bytes().ok_or_else(|| {
            AuthError::KeyDecode("public key bit string is not octet aligned".to_string())
        })?;

        let (modulus, exponent) = parse_rsa_public_key(rsa_key)
            .map_err(|e| AuthError::KeyDecode(format!("invalid RSAPublicKey: {e}")))?;

        let key = Self { modulus, exponent };
        let bits = key.modulus_bits();
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) {
            return Err(AuthError::KeyDecode(format!(
                "RSA modulus of {bits} bits is outside {MIN_MODULUS_BITS}..={MAX_MODULUS_BITS}"
            )));
        }

        Ok(key)
    }

    /// Size of the RSA modulus in bits.
    pub fn modulus_bits(&self) -> usize {
        match self.modulus.first() {
            Some(top) => (self.modulus.len() - 1) * 8 + (8 - top.leading_zeros() as usize),
            None => 0,
        }
    }

    /// Check `signature` against `message` under [`SIGNATURE_SCHEME`].
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        RsaPublicKeyComponents {
            n: self.modulus.as_slice(),
            e: self.exponent.as_slice(),
        }
        .verify(SIGNATURE_SCHEME, message, signature)
        .is_ok()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// Parse PKCS #1 `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`.
fn parse_rsa_public_key(der: &[u8]) -> spki::der::Result<(Vec<u8>, Vec<u8>)> {
    let mut reader = SliceReader::new(der)?;
    let components = reader.sequence(|seq| {
        let modulus = UintRef::decode(seq)?;
        let exponent = UintRef::decode(seq)?;
        Ok((modulus.as_bytes().to_vec(), exponent.as_bytes().to_vec()))
    })?;
    reader.finish(components)
}
