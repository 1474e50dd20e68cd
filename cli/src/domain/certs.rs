//! Self-signed server certificate request: subject fields and the
//! `openssl.cnf` that carries them.

use crate::domain::error::ConfigError;

/// OpenSSL request config, relative to the working directory.
pub const OPENSSL_CONFIG: &str = ".certs/openssl.cnf";

/// Certificate signing request, relative to the working directory.
pub const CSR_FILE: &str = ".certs/private/server.csr";

/// Validity of the generated certificate.
pub const CERT_VALID_DAYS: u32 = 365;

pub const VALID_KEY_SIZES: &[u32] = &[2048, 3072, 4096];

pub const DEFAULT_KEY_SIZE: u32 = 2048;

/// Distinguished name and SANs for the server certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSubject {
    pub common_name: String,
    pub organization: String,
    pub organizational_unit: String,
    pub country: String,
    pub state: String,
    pub locality: String,
    pub email: String,
    pub key_size: u32,
    pub dns_names: Vec<String>,
}

impl Default for CertificateSubject {
    fn default() -> Self {
        Self {
            common_name: String::new(),
            organization: String::new(),
            organizational_unit: String::new(),
            country: String::new(),
            state: String::new(),
            locality: String::new(),
            email: String::new(),
            key_size: DEFAULT_KEY_SIZE,
            dns_names: Vec::new(),
        }
    }
}

impl CertificateSubject {
    /// Check the fields openssl would otherwise reject mid-run.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.common_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CN".to_string(),
                value: String::new(),
                valid: "a non-empty host name".to_string(),
            });
        }
        if !self.country.is_empty() && self.country.chars().count() != 2 {
            return Err(ConfigError::InvalidValue {
                key: "C".to_string(),
                value: self.country.clone(),
                valid: "a two-letter country code".to_string(),
            });
        }
        if !VALID_KEY_SIZES.contains(&self.key_size) {
            return Err(ConfigError::InvalidValue {
                key: "KEY_SIZE".to_string(),
                value: self.key_size.to_string(),
                valid: VALID_KEY_SIZES
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(())
    }

    /// SAN list; falls back to the common name when none were given.
    #[must_use]
    pub fn alt_names(&self) -> Vec<&str> {
        let names: Vec<&str> = self
            .dns_names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            vec![self.common_name.trim()]
        } else {
            names
        }
    }
}

/// Split a comma-separated SAN list.
#[must_use]
pub fn parse_dns_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render the request config consumed by `openssl req` and `openssl x509`.
#[must_use]
pub fn render_openssl_config(subject: &CertificateSubject) -> String {
    let mut dn = vec![format!("CN = {}", subject.common_name.trim())];
    for (key, value) in [
        ("O", &subject.organization),
        ("OU", &subject.organizational_unit),
        ("C", &subject.country),
        ("ST", &subject.state),
        ("L", &subject.locality),
        ("emailAddress", &subject.email),
    ] {
        if !value.trim().is_empty() {
            dn.push(format!("{key} = {}", value.trim()));
        }
    }
    let alt: Vec<String> = subject
        .alt_names()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("DNS.{} = {name}", i + 1))
        .collect();

    format!(
        "[ req ]
distinguished_name = req_distinguished_name
req_extensions = v3_req
prompt = no

[ req_distinguished_name ]
{dn}

[ v3_req ]
subjectAltName = @alt_names

[ alt_names ]
{alt}
",
        dn = dn.join("\n"),
        alt = alt.join("\n"),
    )
}
