//! Trusted and untrusted two-certificate chains for "localhost".
//!
//! Both chains are built from embedded keys and share the end-entity key and
//! subject. They only differ in the key of the issuing CA, which lets a consumer
//! test trust-anchor validation in isolation.

use std::path::Path;

use openssl::x509::X509;
use tracing::info;

use crate::authority::{Authority, Entity, Subject};
use crate::error::Result;
use crate::keys;
use crate::pem::{PemBlock, write_der, write_to_pem};

/// Subject of both CA certificates
pub const CA_NAME: &str = "Android CTS trusted CA";
/// Subject and DNS name of the end-entity certificate
pub const END_ENTITY_NAME: &str = "localhost";

pub const KEY_FILE: &str = "test_key.pkcs8";
pub const VALID_CHAIN_FILE: &str = "valid_chain.pem";
pub const INVALID_CHAIN_FILE: &str = "invalid_chain.pem";
pub const VALID_CA_FILE: &str = "valid_ca.pem";

/// The certificates and keys behind the chain fixture files.
pub struct ChainFixtures {
    pub end_entity: Entity,
    pub trusted_ca: Authority,
    pub untrusted_ca: Authority,
    /// End-entity certificate issued by the trusted CA
    pub trusted_leaf: X509,
    /// End-entity certificate issued by the untrusted CA
    pub untrusted_leaf: X509,
}

impl ChainFixtures {
    /// Decodes the embedded keys and issues both chains
    pub fn build() -> Result<Self> {
        let end_entity = Entity::from_key(END_ENTITY_NAME, keys::end_entity_key()?)
            .with_dns_name(END_ENTITY_NAME);
        let trusted_ca = Authority::from_key(CA_NAME, keys::trusted_ca_key()?)?;
        let untrusted_ca = Authority::from_key(CA_NAME, keys::untrusted_ca_key()?)?;

        let trusted_leaf = trusted_ca.sign(&end_entity)?;
        let untrusted_leaf = untrusted_ca.sign(&end_entity)?;

        Ok(Self {
            end_entity,
            trusted_ca,
            untrusted_ca,
            trusted_leaf,
            untrusted_leaf,
        })
    }

    /// Writes the four fixture files into `out_dir`
    pub fn write<P: AsRef<Path>>(&self, out_dir: P) -> Result<()> {
        let out_dir = out_dir.as_ref();

        write_der(
            out_dir.join(KEY_FILE),
            &self.end_entity.private_key().private_key_to_pkcs8()?,
        )?;
        write_to_pem(
            out_dir.join(VALID_CHAIN_FILE),
            &[
                PemBlock::Certificate(&self.trusted_leaf),
                PemBlock::Certificate(self.trusted_ca.certificate()),
            ],
        )?;
        write_to_pem(
            out_dir.join(INVALID_CHAIN_FILE),
            &[
                PemBlock::Certificate(&self.untrusted_leaf),
                PemBlock::Certificate(self.untrusted_ca.certificate()),
            ],
        )?;
        write_to_pem(
            out_dir.join(VALID_CA_FILE),
            &[
                PemBlock::Certificate(self.trusted_ca.certificate()),
                PemBlock::PrivateKey(self.trusted_ca.key()),
            ],
        )?;
        Ok(())
    }
}

/// Builds the chain fixtures and writes them into `out_dir`
pub fn generate<P: AsRef<Path>>(out_dir: P) -> Result<ChainFixtures> {
    let fixtures = ChainFixtures::build()?;
    fixtures.write(&out_dir)?;
    info!(out_dir = %out_dir.as_ref().display(), "chain fixtures generated");
    Ok(fixtures)
}
