//! Certificate authorities and the subjects they certify.
//!
//! An [`Authority`] owns a key and a self-signed CA certificate. It can issue a
//! certificate for any [`Subject`]: itself (a re-issued self-signed
//! certificate), another authority (cross-signing) or an [`Entity`] (a leaf).
//!
//! ```
//! use cert_fixtures::authority::{Authority, Entity};
//! use cert_fixtures::certificate::HashAlg;
//!
//! # fn main() -> cert_fixtures::Result<()> {
//! let root = Authority::new("Root")?;
//! let other = Authority::new("Other root")?;
//! let leaf = Entity::new("Leaf")?.with_dns_name("leaf.example");
//!
//! let leaf_cert = root.sign(&leaf)?;
//! let cross = root.sign(&other)?;
//! let legacy = root.sign_with_algorithm(&root, HashAlg::SHA1)?;
//! assert_eq!(
//!     cross.issuer_name().to_der()?,
//!     root.certificate().subject_name().to_der()?
//! );
//! # let _ = (leaf_cert, legacy);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use tracing::debug;

use crate::certificate::{CertBuilder, Certificate, HashAlg, KeyType, Usage, generate_key};
use crate::error::Result;

/// Start of the validity window shared by all fixtures
pub const FIXTURE_NOT_BEFORE: &str = "2015-01-01";
/// End of the validity window shared by all fixtures
pub const FIXTURE_NOT_AFTER: &str = "3000-01-01";

/// Validity window, dates in yyyy-mm-dd form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: String,
    pub not_after: String,
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            not_before: FIXTURE_NOT_BEFORE.to_string(),
            not_after: FIXTURE_NOT_AFTER.to_string(),
        }
    }
}

/// Anything an [`Authority`] can issue a certificate for.
pub trait Subject {
    /// CommonName of the certificate subject
    fn name(&self) -> &str;
    /// Key whose public half goes into the certificate
    fn private_key(&self) -> &PKey<Private>;
    /// Whether the issued certificate gets CA:true
    fn is_ca(&self) -> bool;
    /// DNS names for the SubjectAlternativeName extension
    fn dns_names(&self) -> &[String] {
        &[]
    }
}

/// A certificate authority: a key plus its self-signed CA certificate.
pub struct Authority {
    name: String,
    validity: Validity,
    root: Certificate,
}

impl Authority {
    /// Generates a fresh RSA-2048 key and a self-signed CA certificate
    pub fn new(name: &str) -> Result<Self> {
        Self::self_signed(name, None, Validity::default())
    }

    /// Self-signed CA certificate for an existing key, default fixture validity
    pub fn from_key(name: &str, key: PKey<Private>) -> Result<Self> {
        Self::with_validity(name, key, Validity::default())
    }

    pub fn with_validity(name: &str, key: PKey<Private>, validity: Validity) -> Result<Self> {
        Self::self_signed(name, Some(key), validity)
    }

    fn self_signed(name: &str, key: Option<PKey<Private>>, validity: Validity) -> Result<Self> {
        let mut builder = CertBuilder::new()
            .common_name(name)
            .key_type(KeyType::RSA2048)
            .is_ca(true)
            .valid_from(&validity.not_before)
            .valid_to(&validity.not_after);
        if let Some(key) = key {
            builder = builder.private_key(key);
        }
        let root = builder.build_and_self_sign()?;
        debug!(subject = name, "created self-signed authority");
        Ok(Self {
            name: name.to_string(),
            validity,
            root,
        })
    }

    /// The self-signed certificate created together with the authority
    pub fn certificate(&self) -> &X509 {
        &self.root.x509
    }

    pub fn key(&self) -> &PKey<Private> {
        &self.root.pkey
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Issues a certificate for `subject` signed with SHA-256
    pub fn sign<S: Subject + ?Sized>(&self, subject: &S) -> Result<X509> {
        self.sign_with_algorithm(subject, HashAlg::SHA256)
    }

    /// Issues a certificate for `subject` with an explicit digest.
    ///
    /// The issuer name is copied from this authority's certificate, so it is
    /// byte-identical to the subject of [`Authority::certificate`].
    pub fn sign_with_algorithm<S: Subject + ?Sized>(
        &self,
        subject: &S,
        algorithm: HashAlg,
    ) -> Result<X509> {
        let builder = CertBuilder::new()
            .common_name(subject.name())
            .alternative_names(subject.dns_names().iter().map(String::as_str).collect())
            .private_key(subject.private_key().clone())
            .is_ca(subject.is_ca())
            .signature_alg(algorithm)
            .valid_from(&self.validity.not_before)
            .valid_to(&self.validity.not_after)
            .key_usage(usages_for(subject.is_ca()));
        let issued = builder.build_and_sign(&self.root)?;
        debug!(
            issuer = %self.name,
            subject = subject.name(),
            ?algorithm,
            "issued certificate"
        );
        Ok(issued.x509)
    }
}

impl Subject for Authority {
    fn name(&self) -> &str {
        &self.name
    }

    fn private_key(&self) -> &PKey<Private> {
        self.key()
    }

    fn is_ca(&self) -> bool {
        true
    }
}

/// A non-CA subject, terminal in any chain.
pub struct Entity {
    name: String,
    key: PKey<Private>,
    dns_names: Vec<String>,
}

impl Entity {
    /// Generates a fresh RSA-2048 key for a leaf subject
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self::from_key(name, generate_key(KeyType::RSA2048)?))
    }

    pub fn from_key(name: &str, key: PKey<Private>) -> Self {
        Self {
            name: name.to_string(),
            key,
            dns_names: Vec::new(),
        }
    }

    /// Adds a DNS SubjectAlternativeName to every certificate issued for this entity
    pub fn with_dns_name(mut self, dns_name: &str) -> Self {
        self.dns_names.push(dns_name.to_string());
        self
    }
}

impl Subject for Entity {
    fn name(&self) -> &str {
        &self.name
    }

    fn private_key(&self) -> &PKey<Private> {
        &self.key
    }

    fn is_ca(&self) -> bool {
        false
    }

    fn dns_names(&self) -> &[String] {
        &self.dns_names
    }
}

// CA usages are added by the builder
fn usages_for(ca: bool) -> HashSet<Usage> {
    if ca {
        HashSet::new()
    } else {
        [Usage::signature, Usage::encipherment, Usage::serverauth]
            .into_iter()
            .collect()
    }
}
