//! Self-signed server certificate generation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{CertificateTool, EventLog, ProgressReporter, WorkspaceStore};
use crate::application::services::logged;
use crate::domain::certs::{
    CERT_VALID_DAYS, CSR_FILE, CertificateSubject, render_openssl_config,
};

/// Where the key and certificate are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    pub key: PathBuf,
    pub cert: PathBuf,
}

/// Generate a private key and a self-signed certificate for `subject`.
///
/// Existing files at `paths` are overwritten by openssl.
///
/// # Errors
///
/// Returns an error if the subject is invalid, the config cannot be written,
/// or any openssl step exits non-zero.
pub async fn generate_certificates(
    store: &impl WorkspaceStore,
    tool: &impl CertificateTool,
    subject: &CertificateSubject,
    paths: &CertificatePaths,
    reporter: &impl ProgressReporter,
    log: &impl EventLog,
) -> Result<()> {
    let result = generate(store, tool, subject, paths, reporter).await;
    logged(log, "certificate generation failed", result)?;
    log.record(
        &format!("generated certificate {}", paths.cert.display()),
        None,
    );
    Ok(())
}

async fn generate(
    store: &impl WorkspaceStore,
    tool: &impl CertificateTool,
    subject: &CertificateSubject,
    paths: &CertificatePaths,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    subject.validate()?;
    let config = store
        .write_openssl_config(&render_openssl_config(subject))
        .await
        .context("writing openssl config")?;
    let csr = store.root_dir().join(CSR_FILE);

    reporter.step(&format!("generating {}-bit private key...", subject.key_size));
    tool.generate_key(&paths.key, subject.key_size)
        .await
        .context("generating private key")?;

    reporter.step("creating certificate signing request...");
    tool.create_request(&paths.key, &config, &csr)
        .await
        .context("creating signing request")?;

    reporter.step("self-signing certificate...");
    tool.self_sign(&csr, &paths.key, &config, CERT_VALID_DAYS, &paths.cert)
        .await
        .context("self-signing certificate")?;
    Ok(())
}
