//! Tests for the `ghcli` library against a fake `gh` program
#![cfg(unix)]

mod common;
use common::*;

use pretty_assertions::assert_eq;

use ghcli::gh_binary::{GhBinary, GhError, DEFAULT_API_VERSION};
use ghcli::github::{ClientBuilder, Error, PermissionIndex};
use ghcli::logging::{LogConfig, LogFormat};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::filter::LevelFilter;

fn build_client(gh: &FakeGh) -> ghcli::github::Result<ghcli::github::Client> {
    ClientBuilder::new().executable(gh.path_str()).build()
}

#[test]
fn client_octocat() {
    let gh = FakeGh::octocat();
    let client = build_client(&gh).unwrap();

    assert_eq!(client.username(), "octocat");
    assert_eq!(client.identity().get("id"), Some(&json!(583231)));
    assert_eq!(client.repos().len(), 1);
    assert_eq!(client.gh().path(), gh.path());

    let expected = PermissionIndex::from(BTreeMap::from([(
        "octocat/repo1".to_string(),
        vec!["admin".to_string()],
    )]));
    assert_eq!(client.repo_perm_index(), &expected);
    assert_eq!(client.permissions_for("octocat/repo1").unwrap(), &["admin"]);
    assert_eq!(client.permissions_for("octocat/repo2"), None);

    assert_json_snapshot!(client.repo_perm_index(), @r###"
    {
      "octocat/repo1": [
        "admin"
      ]
    }
    "###);
}

#[test]
fn client_call_sequence() {
    let gh = FakeGh::octocat();
    build_client(&gh).unwrap();
    assert_eq!(
        gh.calls(),
        vec![
            "-H X-GitHub-API-Version:2022-11-28 api /user",
            "-H X-GitHub-API-Version:2022-11-28 api /users/octocat/repos",
        ]
    );
}

#[test]
fn client_custom_api_version() {
    let gh = FakeGh::octocat();
    let client = ClientBuilder::new()
        .executable(gh.path_str())
        .api_version("2026-03-10")
        .build()
        .unwrap();
    assert_eq!(client.gh().api_version(), "2026-03-10");
    assert!(gh
        .calls()
        .iter()
        .all(|call| call.starts_with("-H X-GitHub-API-Version:2026-03-10 api ")));
}

#[test]
fn client_repos_not_found() {
    let gh = FakeGh::new(&[
        Response::ok("api /user", OCTOCAT_USER),
        Response::failure(
            "api /users/octocat/repos",
            r#"{"message":"Not Found","status":"404"}"#,
            1,
        ),
    ]);
    match build_client(&gh) {
        Err(Error::Gh(GhError::NotFound(body))) => assert_eq!(body["message"], "Not Found"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("client construction should fail"),
    }
}

#[test]
fn client_repos_not_a_list() {
    let gh = FakeGh::new(&[
        Response::ok("api /user", OCTOCAT_USER),
        Response::ok("api /users/octocat/repos", r#"{"full_name":"octocat/repo1"}"#),
    ]);
    assert!(matches!(build_client(&gh), Err(Error::UnexpectedResponse { .. })));
}

#[test]
fn client_repos_no_output() {
    let gh = FakeGh::new(&[
        Response::ok("api /user", OCTOCAT_USER),
        Response::failure("api /users/octocat/repos", "", 1),
    ]);
    assert!(matches!(build_client(&gh), Err(Error::Gh(GhError::ProcessFailed { .. }))));
}

#[test]
fn client_identity_without_login() {
    let gh = FakeGh::new(&[Response::ok("api /user", r#"{"id":1}"#)]);
    assert!(matches!(build_client(&gh), Err(Error::MissingLogin)));
    assert_eq!(gh.calls().len(), 1);
}

#[test]
fn client_missing_executable() {
    let gh = FakeGh::octocat();
    let missing = gh.dir().join("no-such-gh");
    let result = ClientBuilder::new()
        .executable(missing.to_str().unwrap())
        .build();
    assert!(matches!(result, Err(Error::Gh(GhError::ExecutableNotFound(_)))));
    assert!(gh.calls().is_empty());
}

#[test]
fn client_search_repositories() {
    let gh = FakeGh::new(&[
        Response::ok("api /user", OCTOCAT_USER),
        Response::ok("api /users/octocat/repos", OCTOCAT_REPOS),
        Response::ok(
            "api /search/repositories?q=user%3Aoctocat",
            r#"{"total_count":1,"incomplete_results":false,"items":[{"full_name":"octocat/repo1"}]}"#,
        ),
    ]);
    let client = build_client(&gh).unwrap();
    let results = client.search_repositories("user:octocat").unwrap();
    assert_eq!(results["total_count"], 1);
    assert_eq!(results["items"][0]["full_name"], "octocat/repo1");
}

// -------------------------------------------------------------------------------------------------
// GhBinary
// -------------------------------------------------------------------------------------------------
#[test]
fn gh_success_statuses() {
    let gh = FakeGh::new(&[
        Response::ok("api /created", r#"{"id":7,"status":"201"}"#),
        Response::ok("api /ok", r#"{"id":8,"status":"200"}"#),
    ]);
    let bin = GhBinary::new(gh.path(), DEFAULT_API_VERSION);
    assert_eq!(bin.get("/created"), Some(json!({"id": 7, "status": "201"})));
    assert_eq!(bin.get("/ok"), Some(json!({"id": 8, "status": "200"})));
}

#[test]
fn gh_error_statuses() {
    let gh = FakeGh::new(&[
        Response::failure("api /missing", r#"{"message":"Not Found","status":"404"}"#, 1),
        Response::failure("api /invalid", r#"{"message":"Validation Failed","status":"422"}"#, 1),
        Response::failure("api /forbidden", r#"{"message":"Forbidden","status":"403"}"#, 1),
    ]);
    let bin = GhBinary::new(gh.path(), DEFAULT_API_VERSION);
    assert_eq!(bin.get("/missing"), None);
    assert_eq!(bin.get("/invalid"), None);
    assert_eq!(bin.get("/forbidden"), None);
    assert!(matches!(bin.try_get("/invalid"), Err(GhError::Unprocessable(_))));
    assert!(matches!(bin.try_get("/forbidden"), Err(GhError::Status { .. })));
}

#[test]
fn gh_non_json_output() {
    let gh = FakeGh::new(&[Response::ok(
        "help",
        "Work seamlessly with GitHub from the command line.",
    )]);
    let bin = GhBinary::new(gh.path(), DEFAULT_API_VERSION);
    assert_eq!(bin.execute("help", Vec::<&str>::new()), None);
    assert!(matches!(
        bin.try_execute("help", Vec::<&str>::new()),
        Err(GhError::NonJson { .. })
    ));
}

#[test]
fn gh_list_without_status() {
    let gh = FakeGh::new(&[Response::ok("api /users/octocat/repos", OCTOCAT_REPOS)]);
    let bin = GhBinary::new(gh.path(), DEFAULT_API_VERSION);
    let repos = bin.get("/users/octocat/repos").unwrap();
    assert_eq!(repos[0]["full_name"], "octocat/repo1");
}

#[test]
fn gh_post_arguments() {
    let gh = FakeGh::new(&[Response::ok(
        "api /repos/octocat/repo1/issues -X POST -f title=Hello",
        r#"{"number":1,"status":"201"}"#,
    )]);
    let bin = GhBinary::new(gh.path(), DEFAULT_API_VERSION);
    let issue = bin.post("/repos/octocat/repo1/issues", ["-f", "title=Hello"]).unwrap();
    assert_eq!(issue["number"], 1);
    assert_eq!(
        gh.calls(),
        vec!["-H X-GitHub-API-Version:2022-11-28 api /repos/octocat/repo1/issues -X POST -f title=Hello"]
    );
}

#[test]
fn gh_child_environment() {
    let gh = FakeGh::octocat();
    let bin = GhBinary::new(gh.path(), DEFAULT_API_VERSION);
    assert!(bin.get("/user").is_some());
    assert_eq!(
        gh.environments(),
        vec!["GH_PROMPT_DISABLED=1 GH_NO_UPDATE_NOTIFIER=1 stdin=closed"]
    );
}

#[test]
fn gh_spawn_failure() {
    let gh = FakeGh::octocat();
    let bin = GhBinary::new(gh.dir().join("no-such-gh"), DEFAULT_API_VERSION);
    assert_eq!(bin.get("/user"), None);
    assert!(matches!(bin.try_get("/user"), Err(GhError::IOError(_))));
}

// -------------------------------------------------------------------------------------------------
// logging
// -------------------------------------------------------------------------------------------------
#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn json_log_records(buf: &Buffer) -> Vec<serde_json::Value> {
    let contents = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("log records should be JSON"))
        .collect()
}

#[test]
fn client_logs_to_supplied_dispatch() {
    let gh = FakeGh::octocat();
    let buf = Buffer::default();
    let writer = buf.clone();
    let dispatch = LogConfig::new(LevelFilter::DEBUG)
        .format(LogFormat::Json)
        .build_dispatch_with_writer(move || writer.clone())
        .unwrap();

    let client = ClientBuilder::new()
        .executable(gh.path_str())
        .dispatch(dispatch)
        .build()
        .unwrap();

    let records = json_log_records(&buf);
    let successes: Vec<_> = records
        .iter()
        .filter(|r| r["fields"]["message"] == "Success running gh command")
        .collect();
    assert_eq!(successes.len(), 2);
    assert!(successes.iter().all(|r| r["level"] == "INFO" && r["fields"]["command"] == "api"));
    assert!(successes.iter().all(|r| r["span"]["name"] == "gh_execute"));

    // later requests keep using the client's dispatcher
    let before = records.len();
    assert_eq!(client.get("/not-stubbed"), None);
    let records = json_log_records(&buf);
    assert!(records.len() > before);
    assert!(records[before..].iter().any(|r| r["level"] == "ERROR"));
}
