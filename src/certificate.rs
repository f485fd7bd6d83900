//! Certificate builder on top of OpenSSL, plus signer and chain checks.

use crate::error::{FixtureError, Result};
use chrono::NaiveDate;
use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::stack::Stack;
use openssl::x509::extension::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName,
    SubjectKeyIdentifier,
};
use openssl::x509::{
    X509, X509Builder, X509Name, X509NameBuilder, X509Ref, X509StoreContext,
    store::X509StoreBuilder,
};
use std::collections::HashSet;

use x509_parser::extensions::ParsedExtension;
use x509_parser::parse_x509_certificate;

/// Defines what type of key that is generated when no key is supplied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    RSA2048,
    P256,
    P384,
}

/// Defines which hash algorithm to be used in certificate signing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlg {
    /// Legacy digest, only kept to produce fixtures that must be rejected
    SHA1,
    SHA256,
    SHA384,
    SHA512,
}

impl HashAlg {
    pub fn message_digest(self) -> MessageDigest {
        match self {
            HashAlg::SHA1 => MessageDigest::sha1(),
            HashAlg::SHA256 => MessageDigest::sha256(),
            HashAlg::SHA384 => MessageDigest::sha384(),
            HashAlg::SHA512 => MessageDigest::sha512(),
        }
    }
}

/// Which key usage and extended key usage values
/// are applicable when creating a certificate
#[allow(non_camel_case_types)]
#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy)]
pub enum Usage {
    certsign,
    crlsign,
    encipherment,
    serverauth,
    signature,
}

/// Holds the generated certificate and the private key of its subject
#[derive(Clone)]
pub struct Certificate {
    pub x509: X509,
    pub pkey: PKey<Private>,
}

/// Builder for creating a new certificate, either for a fresh key or
/// for an existing one
#[derive(Default)]
pub struct CertBuilder {
    common_name: String,
    alternative_names: Vec<String>,
    key_type: Option<KeyType>,
    private_key: Option<PKey<Private>>,
    signature_alg: Option<HashAlg>,
    ca: bool,
    valid_from: Option<String>,
    valid_to: Option<String>,
    usage: Option<HashSet<Usage>>,
}

impl CertBuilder {
    /// Create a new CertBuilder, valid from now and one year forward unless dates are set
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the common name, CN. The subject name holds no other attributes
    pub fn common_name(mut self, common_name: &str) -> Self {
        self.common_name = common_name.into();
        self
    }
    /// DNS names for the SubjectAlternativeName extension, in the given order
    pub fn alternative_names(mut self, alternative_names: Vec<&str>) -> Self {
        for name in alternative_names {
            if !self.alternative_names.iter().any(|n| n == name) {
                self.alternative_names.push(name.to_string());
            }
        }
        self
    }
    /// Selects what type of key to generate, RSA2048 if unset. Ignored if a private key is set
    pub fn key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = Some(key_type);
        self
    }
    /// Use an existing key for the subject instead of generating one
    pub fn private_key(mut self, private_key: PKey<Private>) -> Self {
        self.private_key = Some(private_key);
        self
    }
    /// Selects what alg to use for signature, defaults to SHA256
    pub fn signature_alg(mut self, signature_alg: HashAlg) -> Self {
        self.signature_alg = Some(signature_alg);
        self
    }
    /// if this certificate be a Certificate Authority (CA)
    pub fn is_ca(mut self, ca: bool) -> Self {
        self.ca = ca;
        self
    }
    /// start date that the certificate should be valid yyyy-mm-dd
    pub fn valid_from(mut self, valid_from: &str) -> Self {
        self.valid_from = Some(valid_from.into());
        self
    }
    /// end date that the certificate should no longer be valid yyyy-mm-dd
    pub fn valid_to(mut self, valid_to: &str) -> Self {
        self.valid_to = Some(valid_to.into());
        self
    }
    /// Set what the certificate are allowed to do, KeyUsage and ExtendeKeyUsage
    pub fn key_usage(mut self, key_usage: HashSet<Usage>) -> Self {
        self.usage.get_or_insert_with(HashSet::new).extend(key_usage);
        self
    }

    /// create a self signed x509 certificate
    pub fn build_and_self_sign(&self) -> Result<Certificate> {
        let pkey = self.subject_key()?;
        let mut builder = self.prepare_x509_builder(&pkey, None)?;
        builder.sign(&pkey, select_hash(&self.signature_alg))?;
        Ok(Certificate {
            x509: builder.build(),
            pkey,
        })
    }

    /// Create a certificate signed by `signer`, which must be a CA allowed to sign certificates
    pub fn build_and_sign(&self, signer: &Certificate) -> Result<Certificate> {
        if !can_sign_cert(&signer.x509)? {
            return Err(FixtureError::Certificate(format!(
                "Trying to sign with non CA and/or no key usage that allow signing for signer certificate:{:?}",
                signer.x509.subject_name()
            )));
        }
        let pkey = self.subject_key()?;
        let mut builder = self.prepare_x509_builder(&pkey, Some(signer))?;
        builder.sign(&signer.pkey, select_hash(&self.signature_alg))?;
        Ok(Certificate {
            x509: builder.build(),
            pkey,
        })
    }

    fn subject_key(&self) -> Result<PKey<Private>> {
        match &self.private_key {
            Some(pkey) => Ok(pkey.clone()),
            None => generate_key(self.key_type.unwrap_or(KeyType::RSA2048)),
        }
    }

    fn prepare_x509_builder(
        &self,
        pkey: &PKey<Private>,
        signer: Option<&Certificate>,
    ) -> Result<X509Builder> {
        if self.common_name.trim().is_empty() {
            return Err(FixtureError::Certificate(
                "common name is mandatory".to_string(),
            ));
        }
        let name = subject_name(&self.common_name)?;

        let mut builder = X509::builder()?;
        builder.set_version(2)?;

        let serial_number = {
            let mut serial = BigNum::new()?;
            serial.rand(159, MsbOption::MAYBE_ZERO, false)?;
            serial.to_asn1_integer()?
        };
        let not_before = match &self.valid_from {
            Some(date) => create_asn1_time_from_date(date)?,
            None => Asn1Time::days_from_now(0)?,
        };
        let not_after = match &self.valid_to {
            Some(date) => create_asn1_time_from_date(date)?,
            None => Asn1Time::days_from_now(365)?,
        };

        builder.set_serial_number(&serial_number)?;
        builder.set_subject_name(&name)?;
        builder.set_pubkey(pkey)?;
        builder.set_not_before(&not_before)?;
        builder.set_not_after(&not_after)?;
        match signer {
            Some(signer) => builder.set_issuer_name(signer.x509.subject_name())?,
            None => builder.set_issuer_name(&name)?,
        }

        let mut key_usage = self.usage.clone().unwrap_or_default();
        if self.ca {
            key_usage.insert(Usage::certsign);
            key_usage.insert(Usage::crlsign);
            builder.append_extension(BasicConstraints::new().critical().ca().build()?)?;
        } else {
            builder.append_extension(BasicConstraints::new().critical().build()?)?;
        }

        let (tracked_key_usage, tracked_extended_key_usage) = get_key_usage(&key_usage);
        if tracked_key_usage.is_used() {
            builder.append_extension(tracked_key_usage.into_inner().critical().build()?)?;
        }
        if tracked_extended_key_usage.is_used() {
            builder.append_extension(tracked_extended_key_usage.into_inner().build()?)?;
        }

        let issuer: Option<&X509Ref> = signer.map(|s| &*s.x509);
        let ski = SubjectKeyIdentifier::new().build(&builder.x509v3_context(None, None))?;
        builder.append_extension(ski)?;
        let aki = AuthorityKeyIdentifier::new()
            .keyid(false)
            .build(&builder.x509v3_context(issuer, None))?;
        builder.append_extension(aki)?;

        if !self.alternative_names.is_empty() {
            let mut san = SubjectAlternativeName::new();
            for s in &self.alternative_names {
                san.dns(s);
            }
            let san = san.build(&builder.x509v3_context(issuer, None))?;
            builder.append_extension(san)?;
        }
        Ok(builder)
    }
}

/// Builds a subject name holding a single CommonName entry.
///
/// Every certificate for the same subject goes through here, so names compare
/// equal byte for byte regardless of which key signed them.
pub fn subject_name(common_name: &str) -> Result<X509Name> {
    let mut name_builder = X509NameBuilder::new()?;
    name_builder.append_entry_by_nid(Nid::COMMONNAME, common_name)?;
    Ok(name_builder.build())
}

struct TrackedExtendedKeyUsage {
    inner: ExtendedKeyUsage,
    used: bool,
}

impl TrackedExtendedKeyUsage {
    fn new() -> Self {
        Self {
            inner: ExtendedKeyUsage::new(),
            used: false,
        }
    }

    fn server_auth(&mut self) {
        self.inner.server_auth();
        self.used = true;
    }

    fn is_used(&self) -> bool {
        self.used
    }

    fn into_inner(self) -> ExtendedKeyUsage {
        self.inner
    }
}

struct TrackedKeyUsage {
    inner: KeyUsage,
    used: bool,
}

impl TrackedKeyUsage {
    fn new() -> Self {
        Self {
            inner: KeyUsage::new(),
            used: false,
        }
    }

    fn digital_signature(&mut self) {
        self.inner.digital_signature();
        self.used = true;
    }

    fn key_encipherment(&mut self) {
        self.inner.key_encipherment();
        self.used = true;
    }

    fn key_cert_sign(&mut self) {
        self.inner.key_cert_sign();
        self.used = true;
    }

    fn crl_sign(&mut self) {
        self.inner.crl_sign();
        self.used = true;
    }

    fn is_used(&self) -> bool {
        self.used
    }

    fn into_inner(self) -> KeyUsage {
        self.inner
    }
}

/// Verifies a certificate against a root certificate and the intermediate
/// chain leading up to it.
/// Note: The root certificate should not be included in the chain.
pub fn verify_cert(cert: &X509, ca: &X509, cert_chain: Vec<&X509>) -> Result<bool> {
    let mut store_builder = X509StoreBuilder::new()?;
    store_builder.add_cert(ca.clone())?;
    let store = store_builder.build();

    let mut ctx = X509StoreContext::new()?;
    let mut chain = Stack::new()?;
    cert_chain
        .iter()
        .try_for_each(|c| chain.push((*c).clone()))?;
    let verified = ctx.init(&store, cert, &chain, |c| c.verify_cert())?;
    Ok(verified)
}

fn create_asn1_time_from_date(date_str: &str) -> Result<Asn1Time> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|source| {
        FixtureError::InvalidDate {
            date: date_str.to_string(),
            source,
        }
    })?;
    // UTCTime before 2050, GeneralizedTime from then on
    let asn1_time_str = date.format("%Y%m%d000000Z").to_string();
    Ok(Asn1Time::from_str_x509(&asn1_time_str)?)
}

/// Generates a fresh private key of the given type
pub fn generate_key(key_type: KeyType) -> Result<PKey<Private>> {
    let pkey = match key_type {
        KeyType::P256 => {
            let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)?;
            PKey::from_ec_key(EcKey::generate(&group)?)?
        }
        KeyType::P384 => {
            let group = EcGroup::from_curve_name(Nid::SECP384R1)?;
            PKey::from_ec_key(EcKey::generate(&group)?)?
        }
        KeyType::RSA2048 => PKey::from_rsa(Rsa::generate(2048)?)?,
    };
    Ok(pkey)
}

fn select_hash(hash_type: &Option<HashAlg>) -> MessageDigest {
    hash_type.unwrap_or(HashAlg::SHA256).message_digest()
}

fn get_key_usage(usages: &HashSet<Usage>) -> (TrackedKeyUsage, TrackedExtendedKeyUsage) {
    let mut ku = TrackedKeyUsage::new();
    let mut eku = TrackedExtendedKeyUsage::new();
    for u in usages {
        match u {
            Usage::encipherment => {
                ku.key_encipherment();
            }
            Usage::certsign => {
                ku.key_cert_sign();
            }
            Usage::signature => {
                ku.digital_signature();
            }
            Usage::crlsign => {
                ku.crl_sign();
            }
            Usage::serverauth => {
                eku.server_auth();
            }
        }
    }

    (ku, eku)
}

fn can_sign_cert(cert: &X509) -> Result<bool> {
    let der = cert.to_der()?;
    let (_, parsed_cert) =
        parse_x509_certificate(&der).map_err(|e| FixtureError::Parse(e.to_string()))?;

    let mut is_ca = false;
    let mut can_sign = false;

    for ext in parsed_cert.tbs_certificate.extensions().iter() {
        match &ext.parsed_extension() {
            ParsedExtension::BasicConstraints(bc) => {
                is_ca = bc.ca;
            }
            ParsedExtension::KeyUsage(ku) => {
                can_sign = ku.key_cert_sign();
            }
            _ => {}
        }
    }
    Ok(is_ca && can_sign)
}
