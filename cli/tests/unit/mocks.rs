//! Hand-written port implementations that record every call.
//!
//! Each mock answers only what a scenario configures; anything else is an
//! error so unexpected interactions fail loudly.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use pgstrap_cli::application::ports::{
    CertificateTool, CommandRunner, ContainerEngine, DatabaseProbe, EventLog, HostPlatform,
    ProfilePrompter, ProgressReporter, WorkspaceStore,
};
use pgstrap_cli::domain::certs::{CertificateSubject, OPENSSL_CONFIG};
use pgstrap_cli::domain::error::ProvisionError;
use pgstrap_cli::domain::hba::SEED_HBA;
use pgstrap_cli::domain::{
    ConnectionDescriptor, EnvironmentProfile, PackageManager, ProfileFields, Tool,
};

use tokio_util::sync::CancellationToken;

use crate::helpers::{err_output, ok_output};

// ── Event log ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingLog {
    pub records: RefCell<Vec<(String, Option<String>)>>,
}

impl RecordingLog {
    pub fn errors(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|(_, e)| e.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.borrow().iter().map(|(m, _)| m.clone()).collect()
    }
}

impl EventLog for RecordingLog {
    fn record(&self, message: &str, error: Option<&anyhow::Error>) {
        self.records
            .borrow_mut()
            .push((message.to_string(), error.map(|e| format!("{e:#}"))));
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

// ── Host ─────────────────────────────────────────────────────────────────────

pub struct FakeHost {
    pub os_release: Option<String>,
    pub missing: Vec<Tool>,
    pub fail_install: Option<Tool>,
    pub installs: RefCell<Vec<(PackageManager, Tool)>>,
    /// Fired while an install is running, like Ctrl-C during apt.
    pub interrupt_on_install: Option<CancellationToken>,
}

impl FakeHost {
    pub fn with_os_release(content: &str) -> Self {
        Self {
            os_release: Some(content.to_string()),
            missing: Vec::new(),
            fail_install: None,
            installs: RefCell::default(),
            interrupt_on_install: None,
        }
    }
}

impl HostPlatform for FakeHost {
    async fn read_os_release(&self) -> Result<String> {
        self.os_release
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No such file or directory (os error 2)"))
    }

    async fn tool_available(&self, tool: Tool) -> bool {
        let installed = self.installs.borrow().iter().any(|(_, t)| *t == tool);
        installed || !self.missing.contains(&tool)
    }

    async fn install(&self, manager: PackageManager, tool: Tool) -> Result<()> {
        if self.fail_install == Some(tool) {
            anyhow::bail!("E: Unable to locate package {}", tool.package(manager));
        }
        if let Some(token) = &self.interrupt_on_install {
            token.cancel();
        }
        self.installs.borrow_mut().push((manager, tool));
        Ok(())
    }
}

// ── Container engine ─────────────────────────────────────────────────────────

/// Scriptable container runtime.
///
/// `running_from` is the 1-based listing call from which the container is
/// reported as running; `None` means never.
pub struct FakeEngine {
    pub running_from: Option<u32>,
    pub inspect: Option<String>,
    pub compose_fails: bool,
    pub enable_fails: bool,
    /// Exec subcommand (`cat`, `sh`, `pg_ctl`) that exits non-zero.
    pub exec_fails: Option<&'static str>,
    /// Listings before this one fail to run at all.
    pub listing_errors: u32,
    pub hba: RefCell<String>,
    pub calls: RefCell<Vec<String>>,
    listings: Cell<u32>,
}

impl FakeEngine {
    pub fn running_from(n: u32) -> Self {
        Self {
            running_from: Some(n),
            ..Self::never_running()
        }
    }

    pub fn never_running() -> Self {
        Self {
            running_from: None,
            inspect: None,
            compose_fails: false,
            enable_fails: false,
            exec_fails: None,
            listing_errors: 0,
            hba: RefCell::new(SEED_HBA.to_string()),
            calls: RefCell::default(),
            listings: Cell::new(0),
        }
    }

    pub fn listings(&self) -> u32 {
        self.listings.get()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl ContainerEngine for FakeEngine {
    async fn enable_service(&self) -> Result<Output> {
        self.log("enable".to_string());
        if self.enable_fails {
            return Ok(err_output(1, b"Failed to enable unit: Unit file docker.service does not exist."));
        }
        Ok(ok_output(b""))
    }

    async fn start_service(&self) -> Result<Output> {
        self.log("start".to_string());
        Ok(ok_output(b""))
    }

    async fn compose_up(&self, manifest: &Path) -> Result<Output> {
        self.log(format!("compose {}", manifest.display()));
        if self.compose_fails {
            return Ok(err_output(1, b"network pgstrap_net: subnet overlaps"));
        }
        Ok(ok_output(b""))
    }

    async fn list_running(&self, name: &str) -> Result<Output> {
        self.log(format!("ps {name}"));
        let n = self.listings.get() + 1;
        self.listings.set(n);
        if n <= self.listing_errors {
            anyhow::bail!("docker timed out after 30s");
        }
        match self.running_from {
            Some(from) if n >= from => Ok(ok_output(b"3f2a9c1b7e44\n")),
            _ => Ok(ok_output(b"")),
        }
    }

    async fn inspect_status(&self, name: &str) -> Result<Output> {
        self.log(format!("inspect {name}"));
        match &self.inspect {
            Some(status) => Ok(ok_output(format!("{status}\n").as_bytes())),
            None => Ok(err_output(1, b"Error: No such object")),
        }
    }

    async fn exec(&self, container: &str, user: Option<&str>, args: &[&str]) -> Result<Output> {
        let user = user.map(|u| format!("-u {u} ")).unwrap_or_default();
        self.log(format!("exec {user}{container} {}", args.join(" ")));
        if self.exec_fails.is_some() && self.exec_fails == args.first().copied() {
            return Ok(err_output(126, b"OCI runtime exec failed"));
        }
        match args.first().copied() {
            Some("cat") => Ok(ok_output(self.hba.borrow().as_bytes())),
            Some("sh") => {
                // The appended line is the single-quoted printf argument.
                let script = args.get(2).copied().unwrap_or_default();
                let line = script.split('\'').nth(3).unwrap_or_default();
                let mut hba = self.hba.borrow_mut();
                hba.push_str(line);
                hba.push('\n');
                Ok(ok_output(b""))
            }
            Some("pg_ctl") => Ok(ok_output(b"server signaled\n")),
            _ => anyhow::bail!("exec {args:?} not expected in this test"),
        }
    }
}

// ── Workspace ─────────────────────────────────────────────────────────────────

pub struct MemoryStore {
    pub root: PathBuf,
    pub profile: RefCell<Option<EnvironmentProfile>>,
    pub profile_writes: Cell<u32>,
    pub manifests: RefCell<Vec<String>>,
    pub openssl_configs: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self {
            root: PathBuf::from("/srv/pgstrap"),
            profile: RefCell::new(None),
            profile_writes: Cell::new(0),
            manifests: RefCell::default(),
            openssl_configs: RefCell::default(),
        }
    }

    pub fn with_profile(profile: EnvironmentProfile) -> Self {
        let store = Self::empty();
        *store.profile.borrow_mut() = Some(profile);
        store
    }
}

impl WorkspaceStore for MemoryStore {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn profile_path(&self) -> PathBuf {
        self.root.join(".env")
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(".docker/compose/docker-compose.yml")
    }

    async fn profile_exists(&self) -> bool {
        self.profile.borrow().is_some()
    }

    async fn create_profile(&self, profile: &EnvironmentProfile) -> Result<()> {
        if self.profile.borrow().is_some() {
            return Err(ProvisionError::ProfileAlreadyExists {
                path: self.profile_path().display().to_string(),
            }
            .into());
        }
        *self.profile.borrow_mut() = Some(profile.clone());
        self.profile_writes.set(self.profile_writes.get() + 1);
        Ok(())
    }

    async fn load_profile(&self) -> Result<EnvironmentProfile> {
        self.profile.borrow().clone().ok_or_else(|| {
            ProvisionError::ProfileInvalid {
                reason: "no environment file".to_string(),
            }
            .into()
        })
    }

    async fn write_manifest(&self, text: &str) -> Result<PathBuf> {
        self.manifests.borrow_mut().push(text.to_string());
        Ok(self.manifest_path())
    }

    async fn prepare_mounts(&self, _: &EnvironmentProfile) -> Result<bool> {
        Ok(true)
    }

    async fn write_openssl_config(&self, text: &str) -> Result<PathBuf> {
        self.openssl_configs.borrow_mut().push(text.to_string());
        Ok(self.root.join(OPENSSL_CONFIG))
    }
}

// ── Probe ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProbe {
    pub fails: bool,
    pub pings: RefCell<Vec<String>>,
}

impl FakeProbe {
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::default()
        }
    }
}

impl DatabaseProbe for FakeProbe {
    async fn ping(&self, target: &ConnectionDescriptor) -> Result<()> {
        self.pings.borrow_mut().push(target.target());
        if self.fails {
            anyhow::bail!("Connection refused (os error 111)");
        }
        Ok(())
    }
}

// ── Prompter ─────────────────────────────────────────────────────────────────

pub struct FixedPrompter {
    pub fields: ProfileFields,
    pub asked: Cell<u32>,
}

impl FixedPrompter {
    pub fn new(fields: ProfileFields) -> Self {
        Self {
            fields,
            asked: Cell::new(0),
        }
    }
}

impl ProfilePrompter for FixedPrompter {
    fn collect_fields(&self) -> Result<ProfileFields> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.fields.clone())
    }

    fn collect_subject(&self, default_cn: &str) -> Result<CertificateSubject> {
        Ok(CertificateSubject {
            common_name: default_cn.to_string(),
            ..CertificateSubject::default()
        })
    }
}

// ── Certificate tool ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingCertTool {
    pub fail_request: bool,
    pub calls: RefCell<Vec<String>>,
}

impl CertificateTool for RecordingCertTool {
    async fn generate_key(&self, key: &Path, bits: u32) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("genrsa {} {bits}", key.display()));
        Ok(())
    }

    async fn create_request(&self, key: &Path, config: &Path, csr: &Path) -> Result<()> {
        self.calls.borrow_mut().push(format!(
            "req {} {} {}",
            key.display(),
            config.display(),
            csr.display()
        ));
        if self.fail_request {
            anyhow::bail!("openssl req failed: unable to load config");
        }
        Ok(())
    }

    async fn self_sign(
        &self,
        csr: &Path,
        key: &Path,
        _config: &Path,
        days: u32,
        cert: &Path,
    ) -> Result<()> {
        self.calls.borrow_mut().push(format!(
            "x509 {} {} {days} {}",
            csr.display(),
            key.display(),
            cert.display()
        ));
        Ok(())
    }
}

// ── Command runner ───────────────────────────────────────────────────────────

/// Records argv and answers every call with `stdout`.
#[derive(Default)]
pub struct RecordingRunner {
    pub stdout: Vec<u8>,
    pub calls: RefCell<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn argv(&self, index: usize) -> Vec<String> {
        self.calls.borrow().get(index).cloned().unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, std::time::Duration::from_secs(30))
            .await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: std::time::Duration,
    ) -> Result<Output> {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().map(|a| (*a).to_string()));
        self.calls.borrow_mut().push(argv);
        Ok(ok_output(&self.stdout))
    }
}

impl CommandRunner for &RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        (**self).run(program, args).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output> {
        (**self).run_with_timeout(program, args, timeout).await
    }
}
