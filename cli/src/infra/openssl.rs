//! Infrastructure implementation of the `CertificateTool` port over the
//! `openssl` CLI.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CertificateTool, CommandRunner};

pub struct OpensslCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> OpensslCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn openssl(&self, args: &[&str]) -> Result<()> {
        let output = self
            .runner
            .run("openssl", args)
            .await
            .with_context(|| format!("running openssl {}", args.first().unwrap_or(&"")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "openssl {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            );
        }
        Ok(())
    }
}

impl<R: CommandRunner> CertificateTool for OpensslCli<R> {
    async fn generate_key(&self, key: &Path, bits: u32) -> Result<()> {
        let out = key.to_string_lossy();
        let bits = bits.to_string();
        self.openssl(&["genrsa", "-out", &*out, bits.as_str()]).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(key, std::fs::Permissions::from_mode(0o600))
                .await
                .with_context(|| format!("setting permissions on {out}"))?;
        }
        Ok(())
    }

    async fn create_request(&self, key: &Path, config: &Path, csr: &Path) -> Result<()> {
        let (key, config, csr) = (
            key.to_string_lossy(),
            config.to_string_lossy(),
            csr.to_string_lossy(),
        );
        self.openssl(&["req", "-new", "-key", &*key, "-out", &*csr, "-config", &*config])
            .await
    }

    async fn self_sign(
        &self,
        csr: &Path,
        key: &Path,
        config: &Path,
        days: u32,
        cert: &Path,
    ) -> Result<()> {
        let days = days.to_string();
        let (csr, key, config, cert) = (
            csr.to_string_lossy(),
            key.to_string_lossy(),
            config.to_string_lossy(),
            cert.to_string_lossy(),
        );
        self.openssl(&[
            "x509",
            "-req",
            "-days",
            days.as_str(),
            "-in",
            &*csr,
            "-signkey",
            &*key,
            "-out",
            &*cert,
            "-extensions",
            "v3_req",
            "-extfile",
            &*config,
        ])
        .await
    }
}
