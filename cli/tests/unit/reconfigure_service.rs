//! Host-auth rule append and configuration reload.

#![allow(clippy::expect_used)]

use pgstrap_cli::application::services::reconfigure::{
    RuleChange, append_host_auth_rule, reload_configuration,
};
use pgstrap_cli::domain::hba::{REMOTE_PASSWORD_RULE, contains_rule};

use crate::mocks::{FakeEngine, RecordingLog};

#[tokio::test]
async fn rule_is_appended_once_across_runs() {
    let engine = FakeEngine::running_from(1);
    let log = RecordingLog::default();

    let first = append_host_auth_rule(&engine, "db", &log).await.expect("first");
    let second = append_host_auth_rule(&engine, "db", &log).await.expect("second");

    assert_eq!(first, RuleChange::Appended);
    assert_eq!(second, RuleChange::AlreadyPresent);
    let hba = engine.hba.borrow();
    assert!(contains_rule(&hba, REMOTE_PASSWORD_RULE));
    assert_eq!(hba.matches("0.0.0.0/0").count(), 1);
}

#[tokio::test]
async fn equivalent_rule_with_other_spacing_is_left_alone() {
    let engine = FakeEngine::running_from(1);
    engine
        .hba
        .borrow_mut()
        .push_str("host all all 0.0.0.0/0 scram-sha-256\n");

    let change = append_host_auth_rule(&engine, "db", &RecordingLog::default())
        .await
        .expect("append");

    assert_eq!(change, RuleChange::AlreadyPresent);
    assert!(!engine.called("exec db sh"));
}

#[tokio::test]
async fn reload_runs_as_server_user() {
    let engine = FakeEngine::running_from(1);
    reload_configuration(&engine, "db", &RecordingLog::default())
        .await
        .expect("reload");
    assert_eq!(
        engine.calls.borrow().as_slice(),
        ["exec -u postgres db pg_ctl reload -D /var/lib/postgresql/data"]
    );
}
