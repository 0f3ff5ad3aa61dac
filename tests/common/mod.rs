//! Integration Test Utilities and Common Code

#![allow(dead_code)]

use indoc::formatdoc;

pub use assert_cmd::prelude::*;
pub use assert_fs::prelude::*;
pub use assert_fs::{fixture::ChildPath, TempDir};
pub use insta::assert_json_snapshot;
pub use predicates::prelude::*;
pub use std::path::Path;
pub use std::process::Command;

/// Build a `Command` for the `ghcli` crate binary with variadic command-line arguments.
///
/// The arguments can be anything that is allowed by `Command::arg`.
#[macro_export]
macro_rules! ghcli {
    ( $( $arg:expr ),* ) => {
        {
            let mut cmd = ghcli_cmd();
            $(
                cmd.arg($arg);
            )*
            cmd
        }
    }
}

/// Get the command for the `ghcli` binary under test, with no `ghcli` configuration inherited
/// from the environment.
pub fn ghcli_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ghcli").expect("ghcli should be executable");
    cmd.env_remove("GHCLI_GH")
        .env_remove("GHCLI_API_VERSION")
        .env_remove("GHCLI_LOG")
        .env_remove("NO_COLOR");
    cmd
}

/// A canned response of the fake `gh` program.
pub struct Response {
    /// The arguments following the API version header, joined with spaces, e.g., `api /user`
    pub args: &'static str,
    pub stdout: &'static str,
    pub exit_code: i32,
}

impl Response {
    pub fn ok(args: &'static str, stdout: &'static str) -> Self {
        Response {
            args,
            stdout,
            exit_code: 0,
        }
    }

    pub fn failure(args: &'static str, stdout: &'static str, exit_code: i32) -> Self {
        Response {
            args,
            stdout,
            exit_code,
        }
    }
}

pub const OCTOCAT_USER: &str = r#"{"login":"octocat","id":583231}"#;
pub const OCTOCAT_REPOS: &str =
    r#"[{"full_name":"octocat/repo1","permissions":{"admin":true}}]"#;

/// A fake `gh` program in a temporary directory.
///
/// It prints the stdout of the first response whose arguments match, and records every argument
/// vector it is invoked with, along with the `gh` settings in its environment and whether its
/// stdin was closed. Unmatched invocations print to stderr and exit with status 1.
/// Only shell builtins are used, so it works with an arbitrary `PATH`.
pub struct FakeGh {
    pub root: TempDir,
    pub program: ChildPath,
    calls: ChildPath,
    environments: ChildPath,
}

impl FakeGh {
    pub fn new(responses: &[Response]) -> Self {
        let root = TempDir::new().expect("should be able to create tempdir");
        let program = root.child("gh");
        let calls = root.child("calls.log");
        let environments = root.child("env.log");

        let mut cases = String::new();
        for response in responses {
            for text in [response.args, response.stdout] {
                assert!(!text.contains('\''), "fake responses cannot contain single quotes");
            }
            cases.push_str(&formatdoc! {"
                '{args}')
                    printf '%s\\n' '{stdout}'
                    exit {exit_code}
                    ;;
                ",
                args = response.args,
                stdout = response.stdout,
                exit_code = response.exit_code,
            });
        }

        let script = formatdoc! {r#"
            #!/bin/sh
            printf '%s\n' "$*" >> '{calls}'
            if read -r _line; then stdin=open; else stdin=closed; fi
            prompt="${{GH_PROMPT_DISABLED-unset}}"
            notifier="${{GH_NO_UPDATE_NOTIFIER-unset}}"
            printf 'GH_PROMPT_DISABLED=%s GH_NO_UPDATE_NOTIFIER=%s stdin=%s\n' "$prompt" "$notifier" "$stdin" >> '{environments}'
            if [ "$1" != "-H" ]; then
                echo "missing API version header" >&2
                exit 3
            fi
            shift 2
            case "$*" in
            {cases}*)
                echo "unexpected arguments: $*" >&2
                exit 1
                ;;
            esac
            "#,
            calls = calls.path().display(),
            environments = environments.path().display(),
        };

        std::fs::write(program.path(), script).expect("should be able to write fake gh");
        set_executable(program.path());

        Self {
            root,
            program,
            calls,
            environments,
        }
    }

    /// A fake `gh` authenticated as `octocat`, who has admin access to `octocat/repo1`.
    pub fn octocat() -> Self {
        Self::new(&[
            Response::ok("api /user", OCTOCAT_USER),
            Response::ok("api /users/octocat/repos", OCTOCAT_REPOS),
        ])
    }

    pub fn path(&self) -> &Path {
        self.program.path()
    }

    pub fn path_str(&self) -> &str {
        self.path().to_str().expect("tempdir path should be utf-8")
    }

    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    /// The argument vectors the fake program has been invoked with, one string per call.
    pub fn calls(&self) -> Vec<String> {
        read_lines(self.calls.path())
    }

    /// The recorded environment of each call, e.g.,
    /// `GH_PROMPT_DISABLED=1 GH_NO_UPDATE_NOTIFIER=1 stdin=closed`.
    pub fn environments(&self) -> Vec<String> {
        read_lines(self.environments.path())
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("should be able to make fake gh executable");
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) {}
