//! Fixed key material for the trusted/untrusted chain fixtures.
//!
//! The keys are PKCS#8 PEM files compiled into the binary so the chain fixtures
//! always carry the same public keys, no matter how often they are regenerated.

use openssl::pkey::{Id, PKey, Private};

use crate::error::{FixtureError, Result};

const END_ENTITY_KEY: &str = include_str!("end_entity.pem");
const TRUSTED_CA_KEY: &str = include_str!("trusted_ca.pem");
const UNTRUSTED_CA_KEY: &str = include_str!("untrusted_ca.pem");

/// Key of the "localhost" certificate shared by both chains
pub fn end_entity_key() -> Result<PKey<Private>> {
    decode_rsa_private_key("end-entity", END_ENTITY_KEY.as_bytes())
}

/// Key of the CA that the consuming tests trust
pub fn trusted_ca_key() -> Result<PKey<Private>> {
    decode_rsa_private_key("trusted CA", TRUSTED_CA_KEY.as_bytes())
}

/// Key of the CA that no consumer trusts
pub fn untrusted_ca_key() -> Result<PKey<Private>> {
    decode_rsa_private_key("untrusted CA", UNTRUSTED_CA_KEY.as_bytes())
}

/// Decodes a PEM private key and insists on RSA.
///
/// `label` only shows up in the error message.
pub fn decode_rsa_private_key(label: &str, pem: &[u8]) -> Result<PKey<Private>> {
    let pkey = PKey::private_key_from_pem(pem)
        .map_err(|e| FixtureError::InvalidKey(format!("{label}: {e}")))?;
    if pkey.id() != Id::RSA {
        return Err(FixtureError::InvalidKey(format!(
            "{label}: expected an RSA key, found {:?}",
            pkey.id()
        )));
    }
    Ok(pkey)
}
