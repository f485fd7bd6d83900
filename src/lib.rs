//! # Cert-Fixtures
//!
//! ## Description
//!
//! Generates X.509 certificate chains and private keys that other test suites
//! load as static fixtures. Built on the OpenSSL crate.
//!
//! The package has not been reviewed for any security issues and is intended for testing purposes only.
//!
//! Two generators are provided, each with its own binary:
//! - `gen-chain-fixtures`: a trusted and an untrusted two-certificate chain for
//!   `localhost`, built from keys embedded in the crate
//! - `gen-path-building-fixtures`: two cross-signed roots, an intermediate issued
//!   by both roots and two leaves, all with fresh keys, one certificate per file
//!
//! Both sit on a small certificate authority helper:
//! - Creating a CA with a fresh or existing key and a self-signed certificate
//! - Issuing certificates for the CA itself, for other CAs or for leaf entities
//! - Choosing the signature digest, including legacy SHA-1
//! - Writing certificates and keys as PEM (keys as PKCS#8)
//!
//! ### Certificate Signing Requirements
//! To sign another certificate, the signing certificate must:
//! - Have the `CA` (Certificate Authority) flag set to `true`
//! - Include the `KeyUsage` extension with the `keyCertSign` bit enabled
//!
//! Every [`authority::Authority`] certificate satisfies both.
//!
//! ## Example creating a CA and issuing certificates
//! ```rust
//! use cert_fixtures::authority::{Authority, Entity};
//! use cert_fixtures::certificate::{HashAlg, verify_cert};
//!
//! let root = Authority::new("My Test Ca").expect("failed to create root");
//! let intermediate = Authority::new("My Intermediate").expect("failed to create intermediate");
//! let leaf = Entity::new("example.com")
//!     .expect("failed to create leaf key")
//!     .with_dns_name("example.com");
//!
//! let intermediate_cert = root.sign(&intermediate).expect("failed to sign intermediate");
//! let leaf_cert = intermediate.sign(&leaf).expect("failed to sign leaf");
//! let legacy_root = root
//!     .sign_with_algorithm(&root, HashAlg::SHA1)
//!     .expect("failed to re-sign root");
//!
//! match verify_cert(&leaf_cert, root.certificate(), vec![&intermediate_cert]) {
//!    Ok(true) => println!("verify ok"),
//!    _ => println!("failed verify"),
//! }
//! # let _ = legacy_root;
//! ```
//!
//! ## Example writing a bundle
//! ```rust,no_run
//! use cert_fixtures::authority::Authority;
//! use cert_fixtures::pem::{PemBlock, write_to_pem};
//!
//! # fn main() -> cert_fixtures::Result<()> {
//! let ca = Authority::new("My Test Ca")?;
//! write_to_pem(
//!     "./certs/ca.pem",
//!     &[
//!         PemBlock::Certificate(ca.certificate()),
//!         PemBlock::PrivateKey(ca.key()),
//!     ],
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Config
//!
//! Values that can be selected when using [`certificate::CertBuilder`] directly
//! | keyword | description | options |
//! | ----------------- | --------------------------------------------------------------------------- | ----------------------------------- |
//! | common_name | the common name of the subject, mandatory field | string: www.foo.se |
//! | key_type | key type generated when no key is given, defaults to RSA2048 | enum: RSA2048, P256, P384 |
//! | private_key | use an existing key instead of generating one | openssl PKey |
//! | ca | is this certificate used to sign other certificates, default value is false | boolean: true or false |
//! | alternative_names | list of DNS names this certificate is valid for | string: valid dns names |
//! | signature_alg | which algorithm to be used for signature, default is SHA256 | enum: SHA1, SHA256, SHA384, SHA512 |
//! | valid_from | Start date then the certificate is valid, default is now | string: 2015-01-01 |
//! | valid_to | End date then the certificate is not valid, default is 1 year | string: 3000-01-01 |
//! | usage | Key usage to add to the certificates, see list below for options | list of enums, defined in Key Usage table |
//!
//! ### Key usage
//!
//! If CA is true the key usages to sign certificates and crl lists are added automatically.
//!
//! | keyword           | description                                                |
//! | ----------------- | ---------------------------------------------------------- |
//! | certsign          | allowed to sign certificates                               |
//! | crlsign           | allowed to sign crl                                        |
//! | encipherment      | allowed to encipher private or secret keys                |
//! | serverauth        | allowed to be used for server authentication             |
//! | signature         | allowed to perform digital signature (For auth)          |

pub mod authority;
pub mod certificate;
pub mod error;
pub mod fixtures;
pub mod keys;
pub mod logging;
pub mod pem;

pub use error::{FixtureError, Result};
