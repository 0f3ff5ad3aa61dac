use serde_json::Value;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, debug_span, error, info, Dispatch};

/// The name of the GitHub CLI executable looked up on the `PATH`
pub const DEFAULT_EXECUTABLE_NAME: &str = "gh";

/// The GitHub REST API version requested when none is configured
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

const API_VERSION_HEADER: &str = "X-GitHub-API-Version";

// -------------------------------------------------------------------------------------------------
// GhError
// -------------------------------------------------------------------------------------------------
#[derive(Debug, thiserror::Error)]
pub enum GhError {
    #[error("`{0}` executable not found in PATH")]
    ExecutableNotFound(String),

    #[error("gh execution failed: {0}")]
    IOError(#[from] std::io::Error),

    #[error("gh execution failed\ncode={status}\nstderr=```\n{stderr}```")]
    ProcessFailed { status: ExitStatus, stderr: String },

    #[error("gh returned non-JSON output: {stdout:?}")]
    NonJson {
        stdout: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource not found: {0}")]
    NotFound(Value),

    #[error("request could not be processed: {0}")]
    Unprocessable(Value),

    #[error("request failed with status {status}: {body}")]
    Status { status: String, body: Value },
}

// -------------------------------------------------------------------------------------------------
// StatusKind
// -------------------------------------------------------------------------------------------------
/// The classification of a `status` field reported in a JSON response from `gh`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// `200`, `201`, or `204`
    Success,

    /// `404`
    NotFound,

    /// `422`
    Unprocessable,

    /// Anything else
    OtherError,
}

impl StatusKind {
    pub fn from_status(status: &str) -> Self {
        match status {
            "200" | "201" | "204" => StatusKind::Success,
            "404" => StatusKind::NotFound,
            "422" => StatusKind::Unprocessable,
            _ => StatusKind::OtherError,
        }
    }
}

/// Get the `status` field of a JSON object response, normalized to a string.
///
/// GitHub reports statuses as strings (e.g., `"404"`); numbers are accepted as well.
fn response_status(value: &Value) -> Option<String> {
    match value.as_object()?.get("status")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Interpret the standard output of a `gh` invocation.
pub fn interpret_output(stdout: &str) -> Result<Value, GhError> {
    let value: Value = serde_json::from_str(stdout).map_err(|source| GhError::NonJson {
        stdout: stdout.to_owned(),
        source,
    })?;

    let status = match response_status(&value) {
        Some(status) => status,
        None => return Ok(value),
    };

    match StatusKind::from_status(&status) {
        StatusKind::Success => Ok(value),
        StatusKind::NotFound => Err(GhError::NotFound(value)),
        StatusKind::Unprocessable => Err(GhError::Unprocessable(value)),
        StatusKind::OtherError => Err(GhError::Status { status, body: value }),
    }
}

// -------------------------------------------------------------------------------------------------
// executable lookup
// -------------------------------------------------------------------------------------------------
/// Find the absolute path of the executable `name` on the `PATH` of this process.
pub fn locate_executable(name: &str) -> Result<PathBuf, GhError> {
    let search_path = std::env::var_os("PATH").unwrap_or_default();
    locate_executable_in(name, &search_path)
}

/// Find the absolute path of the executable `name` within the given `PATH`-style search path.
///
/// If `name` contains a path separator, it is not searched for, but used directly.
pub fn locate_executable_in(name: &str, search_path: &OsStr) -> Result<PathBuf, GhError> {
    let not_found = || GhError::ExecutableNotFound(name.to_owned());

    if name.is_empty() {
        return Err(not_found());
    }

    if Path::new(name).components().count() > 1 {
        let candidate = absolute(Path::new(name))?;
        return if is_executable(&candidate) {
            Ok(candidate)
        } else {
            Err(not_found())
        };
    }

    let exe_name = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    for dir in std::env::split_paths(search_path) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        for candidate_name in [name, exe_name.as_str()] {
            let candidate = dir.join(candidate_name);
            if is_executable(&candidate) {
                debug!("Found {name} at {}", candidate.display());
                return absolute(&candidate);
            }
        }
    }

    Err(not_found())
}

fn absolute(path: &Path) -> Result<PathBuf, GhError> {
    if path.is_absolute() {
        Ok(path.to_owned())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(md) => md.is_file() && md.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// -------------------------------------------------------------------------------------------------
// GhBinary
// -------------------------------------------------------------------------------------------------
/// A resolved `gh` executable, invoked once per request.
#[derive(Debug, Clone)]
pub struct GhBinary {
    path: PathBuf,
    api_version: String,
    dispatch: Option<Dispatch>,
}

impl GhBinary {
    /// Use the `gh` executable at the given path.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(path: P, api_version: S) -> Self {
        Self {
            path: path.into(),
            api_version: api_version.into(),
            dispatch: None,
        }
    }

    /// Send all log records from this binary's invocations to `dispatch`.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn api_version_header(&self) -> String {
        format!("{API_VERSION_HEADER}:{}", self.api_version)
    }

    /// Run `f` with this binary's log dispatcher as the default, if one was given.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    /// The argument vector passed to the child process, excluding the executable itself.
    pub fn command_args<I, S>(&self, command: &str, args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut argv: Vec<OsString> =
            vec!["-H".into(), self.api_version_header().into(), command.into()];
        argv.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        argv
    }

    fn gh(&self) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.env("GH_PROMPT_DISABLED", "1");
        cmd.env("GH_NO_UPDATE_NOTIFIER", "1");
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Run `gh <command> <args...>` and interpret its output as JSON.
    pub fn try_execute<I, S>(&self, command: &str, args: I) -> Result<Value, GhError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let argv = self.command_args(command, args);
        self.in_scope(|| {
            let _span = debug_span!("gh_execute", command).entered();
            let result = self.run(&argv);
            log_result(command, &argv, &result);
            result
        })
    }

    fn run(&self, argv: &[OsString]) -> Result<Value, GhError> {
        let mut cmd = self.gh();
        cmd.args(argv);
        debug!("{cmd:?}");

        let output = cmd.output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        match interpret_output(&stdout) {
            Err(GhError::NonJson { .. }) if !output.status.success() => Err(GhError::ProcessFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            result => result,
        }
    }

    /// Like `try_execute`, but collapses every failure into `None` once it has been logged.
    pub fn execute<I, S>(&self, command: &str, args: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.try_execute(command, args).ok()
    }

    pub fn try_get(&self, path: &str) -> Result<Value, GhError> {
        self.try_execute("api", [path])
    }

    /// `gh api <path>`
    pub fn get(&self, path: &str) -> Option<Value> {
        self.try_get(path).ok()
    }

    pub fn try_post<I, S>(&self, path: &str, args: I) -> Result<Value, GhError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut argv: Vec<OsString> = vec![path.into(), "-X".into(), "POST".into()];
        argv.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self.try_execute("api", argv)
    }

    /// `gh api <path> -X POST <args...>`
    pub fn post<I, S>(&self, path: &str, args: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.try_post(path, args).ok()
    }
}

fn log_result(command: &str, argv: &[OsString], result: &Result<Value, GhError>) {
    // skip the API version header and the command name
    let args: Vec<_> = argv.iter().skip(3).map(|a| a.to_string_lossy()).collect();
    match result {
        Ok(value) => {
            let size = match value {
                Value::Array(items) => items.len(),
                Value::Object(fields) => fields.len(),
                _ => 1,
            };
            info!(command, ?args, size, "Success running gh command");
        }
        Err(e @ GhError::NonJson { .. }) => {
            debug!(command, ?args, "gh command returned non-JSON output: {e}");
        }
        Err(e) => {
            error!(command, ?args, error = %e, "Error running gh command");
        }
    }
}
