//! End-to-end tests: the `conjur` binary against a wiremock appliance.

#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but works fine

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAPPING: &str = "---\nvariable_a: conjur/variable/1\nvariable_b: conjur/variable/2\n";

fn conjur(dir: &Path, server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("conjur").unwrap();
    cmd.current_dir(dir)
        .arg("--config")
        .arg(dir.join("config.toml"))
        .env_remove("RUST_LOG")
        .env("CONJUR_APPLIANCE_URL", server.uri())
        .env("CONJUR_ACCOUNT", "acme")
        .env("CONJUR_AUTHN_LOGIN", "alice")
        .env("CONJUR_AUTHN_API_KEY", "api-key-1");
    cmd
}

async fn appliance() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authn/users/alice/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\":\"alice\"}"))
        .mount(&server)
        .await;
    server
}

async fn mount_value(server: &MockServer, encoded: &str, value: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/variables/{}/value", encoded)))
        .respond_with(ResponseTemplate::new(200).set_body_string(value))
        .mount(server)
        .await;
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_launch_sees_resolved_variables() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/variables/values"))
        .and(query_param("vars", "conjur/variable/1,conjur/variable/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "conjur/variable/1": "1",
            "conjur/variable/2": "2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".conjurenv"), MAPPING).unwrap();

    conjur(tmp.path(), &server)
        .args(["env", "--", "sh", "-c", "printf '%s %s' \"$VARIABLE_A\" \"$VARIABLE_B\""])
        .assert()
        .success()
        .stdout("1 2");
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_launch_falls_back_with_warning() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/variables/values"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    mount_value(&server, "conjur%2Fvariable%2F1", "one").await;
    mount_value(&server, "conjur%2Fvariable%2F2", "two").await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".conjurenv"), MAPPING).unwrap();

    conjur(tmp.path(), &server)
        .args(["env", "--", "sh", "-c", "printf '%s' \"$VARIABLE_B\""])
        .assert()
        .success()
        .stdout("two")
        .stderr(predicate::str::contains("one by one"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_launch_aborts_on_forbidden_variable() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/variables/values"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    mount_value(&server, "conjur%2Fvariable%2F1", "one").await;
    Mock::given(method("GET"))
        .and(path("/variables/conjur%2Fvariable%2F2/value"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".conjurenv"), MAPPING).unwrap();

    conjur(tmp.path(), &server)
        .args(["env", "--", "sh", "-c", "echo launched"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("launched").not())
        .stderr(predicate::str::contains("Forbidden"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_each_variable() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/authz/acme/resources/variable/conjur%2Fvariable%2F1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/authz/acme/resources/variable/conjur%2Fvariable%2F2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("vars.yml"), MAPPING).unwrap();

    conjur(tmp.path(), &server)
        .args(["env", "--check", "-f", "vars.yml"])
        .assert()
        .failure()
        .stdout("conjur/variable/1: available\nconjur/variable/2: not available\n")
        .stderr(predicate::str::contains("Some variables are not available"));

    let fetched = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().starts_with("/variables"))
        .count();
    assert_eq!(fetched, 0);
}
