//! `ProfilePrompter` implementations: interactive (dialoguer) and preset
//! (flags and environment only).

use anyhow::{Context, Result};
use dialoguer::{Input, Password};

use crate::application::ports::ProfilePrompter;
use crate::domain::certs::{CertificateSubject, parse_dns_list};
use crate::domain::ProfileFields;

/// Values already supplied on the command line. Empty strings are unset.
#[derive(Debug, Clone, Default)]
pub struct PromptPreset {
    pub fields: ProfileFields,
    pub subject: CertificateSubject,
}

/// Asks on the terminal for every value the preset leaves unset.
pub struct DialoguerPrompter {
    preset: PromptPreset,
}

impl DialoguerPrompter {
    #[must_use]
    pub fn new(preset: PromptPreset) -> Self {
        Self { preset }
    }
}

fn ask(preset: &str, prompt: &str) -> Result<String> {
    if !preset.is_empty() {
        return Ok(preset.to_string());
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .with_context(|| format!("reading {prompt}"))
}

fn ask_optional(preset: &str, prompt: &str) -> Result<String> {
    if !preset.is_empty() {
        return Ok(preset.to_string());
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("reading {prompt}"))
}

impl ProfilePrompter for DialoguerPrompter {
    fn collect_fields(&self) -> Result<ProfileFields> {
        let p = &self.preset.fields;
        let docker_ip = ask(&p.docker_ip, "Container IP address")?;
        let user = ask(&p.user, "Database superuser name")?;
        let password = if p.password.is_empty() {
            Password::new()
                .with_prompt("Database superuser password")
                .with_confirmation("Confirm password", "Passwords do not match. Please try again.")
                .interact()
                .context("reading password")?
        } else {
            p.password.clone()
        };
        let port = ask(&p.port, "Host port to publish")?;
        let db_name = ask(&p.db_name, "Database name")?;
        let subnet = match p.subnet.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => ask_optional("", "Network subnet (empty for the /24 of the IP)")?,
        };
        Ok(ProfileFields {
            docker_ip,
            user,
            password,
            port,
            db_name,
            subnet: Some(subnet).filter(|s| !s.trim().is_empty()),
        })
    }

    fn collect_subject(&self, default_cn: &str) -> Result<CertificateSubject> {
        let s = &self.preset.subject;
        let common_name = if s.common_name.is_empty() {
            Input::<String>::new()
                .with_prompt("Common Name (CN)")
                .default(default_cn.to_string())
                .interact_text()
                .context("reading common name")?
        } else {
            s.common_name.clone()
        };
        let key_size = Input::<u32>::new()
            .with_prompt("Key size (2048, 3072, 4096)")
            .default(s.key_size)
            .interact_text()
            .context("reading key size")?;
        let dns = if s.dns_names.is_empty() {
            parse_dns_list(&ask_optional("", "DNS alternative names (comma separated)")?)
        } else {
            s.dns_names.clone()
        };
        Ok(CertificateSubject {
            common_name,
            organization: ask_optional(&s.organization, "Organization (O)")?,
            organizational_unit: ask_optional(&s.organizational_unit, "Organizational Unit (OU)")?,
            country: ask_optional(&s.country, "Country (C)")?,
            state: ask_optional(&s.state, "State/Province (ST)")?,
            locality: ask_optional(&s.locality, "Locality (L)")?,
            email: ask_optional(&s.email, "Email")?,
            key_size,
            dns_names: dns,
        })
    }
}

/// Uses the preset as-is and fails when a required field is missing.
pub struct PresetPrompter {
    preset: PromptPreset,
}

impl PresetPrompter {
    #[must_use]
    pub fn new(preset: PromptPreset) -> Self {
        Self { preset }
    }
}

impl ProfilePrompter for PresetPrompter {
    fn collect_fields(&self) -> Result<ProfileFields> {
        let f = &self.preset.fields;
        let missing: Vec<&str> = [
            ("--docker-ip", &f.docker_ip),
            ("--user", &f.user),
            ("--password", &f.password),
            ("--port", &f.port),
            ("--db-name", &f.db_name),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(flag, _)| flag)
        .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required value(s) in non-interactive mode: {}",
                missing.join(", ")
            );
        }
        Ok(f.clone())
    }

    fn collect_subject(&self, default_cn: &str) -> Result<CertificateSubject> {
        let mut subject = self.preset.subject.clone();
        if subject.common_name.is_empty() {
            subject.common_name = default_cn.to_string();
        }
        Ok(subject)
    }
}
