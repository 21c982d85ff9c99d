//! Tests for client configuration from the environment.
//!
//! These mutate process environment variables, so every test runs serially.

use pdsapi::{PdsClient, PdsError, DEFAULT_API_URL};
use serial_test::serial;
use std::env;

fn clear_env_vars() {
    env::remove_var("PDS_API_URL");
    env::remove_var("PDS_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_from_env_defaults_to_public_registry() {
    clear_env_vars();

    let client = PdsClient::from_env().unwrap();
    assert_eq!(client.base_url().as_str(), DEFAULT_API_URL);
}

#[test]
#[serial]
fn test_from_env_reads_api_url() {
    clear_env_vars();
    env::set_var("PDS_API_URL", "http://localhost:8080/api/search/1");

    let client = PdsClient::from_env().unwrap();
    assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/search/1/");

    clear_env_vars();
}

#[test]
#[serial]
fn test_from_env_rejects_non_integer_timeout() {
    clear_env_vars();
    env::set_var("PDS_TIMEOUT_SECS", "ten");

    let err = PdsClient::from_env().unwrap_err();
    assert!(matches!(err, PdsError::ConfigInvalid(ref msg) if msg.contains("ten")));

    clear_env_vars();
}

#[test]
#[serial]
fn test_explicit_url_overrides_env_url() {
    clear_env_vars();
    env::set_var("PDS_API_URL", "http://ignored.example/api");

    let client = PdsClient::from_env_with_url(Some("http://localhost:9000/api/search/1")).unwrap();
    assert_eq!(client.base_url().as_str(), "http://localhost:9000/api/search/1/");

    let client = PdsClient::from_env_with_url(None).unwrap();
    assert_eq!(client.base_url().as_str(), "http://ignored.example/api/");

    clear_env_vars();
}

#[test]
#[serial]
fn test_explicit_url_still_honors_timeout_setting() {
    clear_env_vars();
    env::set_var("PDS_TIMEOUT_SECS", "soon");

    let err = PdsClient::from_env_with_url(Some("http://localhost:9000/")).unwrap_err();
    assert!(matches!(err, PdsError::ConfigInvalid(_)));

    env::set_var("PDS_TIMEOUT_SECS", " 5 ");
    assert!(PdsClient::from_env_with_url(Some("http://localhost:9000/")).is_ok());

    clear_env_vars();
}
