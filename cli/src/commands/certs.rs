//! `pgstrap certs`: generate a self-signed server key and certificate.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::{ProfilePrompter, WorkspaceStore};
use crate::application::services::certificates::{CertificatePaths, generate_certificates};
use crate::domain::certs::{CertificateSubject, DEFAULT_KEY_SIZE, parse_dns_list};
use crate::domain::profile::{DEFAULT_SSL_CERT, DEFAULT_SSL_KEY};
use crate::infra::prompt::{DialoguerPrompter, PresetPrompter, PromptPreset};
use crate::output::{TerminalReporter, json};

/// Arguments for the certs command.
#[derive(Args)]
pub struct CertsArgs {
    /// Common Name (CN)
    #[arg(long)]
    pub cn: Option<String>,

    /// Organization (O)
    #[arg(long)]
    pub org: Option<String>,

    /// Organizational Unit (OU)
    #[arg(long)]
    pub ou: Option<String>,

    /// Two-letter country code (C)
    #[arg(long)]
    pub country: Option<String>,

    /// State or province (ST)
    #[arg(long)]
    pub state: Option<String>,

    /// Locality (L)
    #[arg(long)]
    pub locality: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// RSA key size in bits
    #[arg(long, default_value_t = DEFAULT_KEY_SIZE)]
    pub key_size: u32,

    /// Comma-separated DNS alternative names
    #[arg(long, value_name = "NAMES")]
    pub dns: Option<String>,

    /// Replace an existing certificate without asking
    #[arg(long)]
    pub force: bool,
}

impl CertsArgs {
    fn preset(self) -> PromptPreset {
        PromptPreset {
            subject: CertificateSubject {
                common_name: self.cn.unwrap_or_default(),
                organization: self.org.unwrap_or_default(),
                organizational_unit: self.ou.unwrap_or_default(),
                country: self.country.unwrap_or_default(),
                state: self.state.unwrap_or_default(),
                locality: self.locality.unwrap_or_default(),
                email: self.email.unwrap_or_default(),
                key_size: self.key_size,
                dns_names: self.dns.as_deref().map(parse_dns_list).unwrap_or_default(),
            },
            ..PromptPreset::default()
        }
    }
}

#[derive(Serialize)]
struct CertsReport {
    key: String,
    cert: String,
}

/// Run the certs command.
///
/// # Errors
///
/// Returns an error if the subject is invalid, the user declines to replace
/// an existing certificate, or openssl fails.
pub async fn run(app: &AppContext, args: CertsArgs) -> Result<()> {
    let store = app.workspace();
    let log = app.event_log();
    let force = args.force;

    // Paths follow the environment file when one exists.
    let paths = if store.profile_exists().await {
        let profile = store.load_profile().await?;
        CertificatePaths {
            key: profile.ssl_key_path(),
            cert: profile.ssl_cert_path(),
        }
    } else {
        CertificatePaths {
            key: store.root_dir().join(DEFAULT_SSL_KEY),
            cert: store.root_dir().join(DEFAULT_SSL_CERT),
        }
    };

    if paths.cert.exists() && !force {
        let prompt = format!("Replace existing certificate {}?", paths.cert.display());
        if !app.confirm(&prompt, false)? {
            anyhow::bail!(
                "Certificate already exists at {}. Pass --force to replace it.",
                paths.cert.display()
            );
        }
    }

    let preset = args.preset();
    let subject = if app.non_interactive {
        PresetPrompter::new(preset).collect_subject("localhost")?
    } else {
        DialoguerPrompter::new(preset).collect_subject("localhost")?
    };

    let reporter = TerminalReporter::new(&app.output);
    generate_certificates(&store, &app.openssl(), &subject, &paths, &reporter, &log).await?;

    if app.is_json() {
        return json::print(&CertsReport {
            key: paths.key.display().to_string(),
            cert: paths.cert.display().to_string(),
        });
    }
    app.output.kv("key", &paths.key.display().to_string());
    app.output.kv("certificate", &paths.cert.display().to_string());
    Ok(())
}
