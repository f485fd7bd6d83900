//! Certificate graph for path-building tests.
//!
//! Two roots cross-sign each other and both issue the same intermediate, so a
//! consumer sees several candidate issuers with the same subject name. Every
//! certificate is written to its own file; assembling chains is left to the
//! consumer.

use std::path::Path;

use openssl::x509::X509;
use tracing::info;

use crate::authority::{Authority, Entity};
use crate::certificate::HashAlg;
use crate::error::Result;
use crate::pem::{PemBlock, write_to_pem};

pub const ROOT_A_NAME: &str = "Root A";
pub const ROOT_B_NAME: &str = "Root B";
pub const INTERMEDIATE_NAME: &str = "Intermediate";
pub const LEAF1_NAME: &str = "Leaf 1";
pub const LEAF2_NAME: &str = "Leaf 2";

/// Where the fixtures land when no directory is given
pub const DEFAULT_OUT_DIR: &str = "assets/path_building";

/// One issued certificate per role. Keys are fresh on every build.
pub struct PathBuildingFixtures {
    /// Root A, self-signed
    pub a: X509,
    /// Root A, self-signed with SHA-1
    pub a_sha1: X509,
    /// Root B, self-signed
    pub b: X509,
    /// Root B's key and subject, issued by Root A
    pub a_to_b: X509,
    /// Root A's key and subject, issued by Root B
    pub b_to_a: X509,
    /// Leaf 1, issued by Root A
    pub leaf1: X509,
    /// The intermediate, issued by Root A
    pub intermediate_a: X509,
    /// The intermediate, issued by Root B
    pub intermediate_b: X509,
    /// Leaf 2, issued by the intermediate
    pub leaf2: X509,
}

impl PathBuildingFixtures {
    pub fn build() -> Result<Self> {
        let root_a = Authority::new(ROOT_A_NAME)?;
        let root_b = Authority::new(ROOT_B_NAME)?;
        let intermediate = Authority::new(INTERMEDIATE_NAME)?;
        let leaf1 = Entity::new(LEAF1_NAME)?;
        let leaf2 = Entity::new(LEAF2_NAME)?;

        Ok(Self {
            a: root_a.certificate().clone(),
            a_sha1: root_a.sign_with_algorithm(&root_a, HashAlg::SHA1)?,
            b: root_b.certificate().clone(),
            a_to_b: root_a.sign(&root_b)?,
            b_to_a: root_b.sign(&root_a)?,
            leaf1: root_a.sign(&leaf1)?,
            intermediate_a: root_a.sign(&intermediate)?,
            intermediate_b: root_b.sign(&intermediate)?,
            leaf2: intermediate.sign(&leaf2)?,
        })
    }

    /// File name and certificate for every role, in issuance order
    pub fn files(&self) -> [(&'static str, &X509); 9] {
        [
            ("a.pem", &self.a),
            ("a_sha1.pem", &self.a_sha1),
            ("b.pem", &self.b),
            ("b_to_a.pem", &self.b_to_a),
            ("a_to_b.pem", &self.a_to_b),
            ("leaf1.pem", &self.leaf1),
            ("intermediate_a.pem", &self.intermediate_a),
            ("intermediate_b.pem", &self.intermediate_b),
            ("leaf2.pem", &self.leaf2),
        ]
    }

    pub fn write<P: AsRef<Path>>(&self, out_dir: P) -> Result<()> {
        for (file_name, cert) in self.files() {
            write_to_pem(
                out_dir.as_ref().join(file_name),
                &[PemBlock::Certificate(cert)],
            )?;
        }
        Ok(())
    }
}

/// Builds a fresh certificate graph and writes it into `out_dir`
pub fn generate<P: AsRef<Path>>(out_dir: P) -> Result<PathBuildingFixtures> {
    let fixtures = PathBuildingFixtures::build()?;
    fixtures.write(&out_dir)?;
    info!(out_dir = %out_dir.as_ref().display(), "path building fixtures generated");
    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_certificate_verifies_against_its_issuer() {
        let f = PathBuildingFixtures::build().unwrap();
        let a_key = f.a.public_key().unwrap();
        let b_key = f.b.public_key().unwrap();
        let intermediate_key = f.intermediate_a.public_key().unwrap();

        assert!(f.a.verify(&a_key).unwrap());
        assert!(f.a_sha1.verify(&a_key).unwrap());
        assert!(f.b.verify(&b_key).unwrap());
        assert!(f.a_to_b.verify(&a_key).unwrap());
        assert!(f.b_to_a.verify(&b_key).unwrap());
        assert!(f.leaf1.verify(&a_key).unwrap());
        assert!(f.intermediate_a.verify(&a_key).unwrap());
        assert!(f.intermediate_b.verify(&b_key).unwrap());
        assert!(f.leaf2.verify(&intermediate_key).unwrap());
    }

    #[test]
    fn test_cross_signed_keys() {
        let f = PathBuildingFixtures::build().unwrap();
        let a_key = f.a.public_key().unwrap();
        let b_key = f.b.public_key().unwrap();
        assert!(f.a_to_b.public_key().unwrap().public_eq(&b_key));
        assert!(f.b_to_a.public_key().unwrap().public_eq(&a_key));
        assert!(f.a_sha1.public_key().unwrap().public_eq(&a_key));
    }

    #[test]
    fn test_file_names() {
        let f = PathBuildingFixtures::build().unwrap();
        let names: Vec<_> = f.files().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "a.pem",
                "a_sha1.pem",
                "b.pem",
                "b_to_a.pem",
                "a_to_b.pem",
                "leaf1.pem",
                "intermediate_a.pem",
                "intermediate_b.pem",
                "leaf2.pem",
            ]
        );
    }
}
