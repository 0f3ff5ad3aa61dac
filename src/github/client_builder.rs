use std::ffi::OsStr;
use tracing::{debug, info, Dispatch};

use super::{build_permission_index, Client, Error, Identity, Repository, Result};
use crate::gh_binary::{self, GhBinary};

// -------------------------------------------------------------------------------------------------
// ClientBuilder
// -------------------------------------------------------------------------------------------------
pub struct ClientBuilder {
    api_version: String,
    executable: String,
    dispatch: Option<Dispatch>,
}

impl ClientBuilder {
    /// Create a new `ClientBuilder` that finds `gh` on the `PATH` and requests the default API
    /// version.
    pub fn new() -> Self {
        ClientBuilder {
            api_version: gh_binary::DEFAULT_API_VERSION.to_string(),
            executable: gh_binary::DEFAULT_EXECUTABLE_NAME.to_string(),
            dispatch: None,
        }
    }

    /// Request the given GitHub REST API version.
    pub fn api_version<S: Into<String>>(mut self, api_version: S) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Use the given executable name (searched for on the `PATH`) or path instead of `gh`.
    pub fn executable<S: Into<String>>(mut self, executable: S) -> Self {
        self.executable = executable.into();
        self
    }

    /// Send log records from the client and its `gh` invocations to `dispatch`.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Resolve the executable to a `GhBinary`, without running anything.
    pub fn build_gh(&self) -> Result<GhBinary> {
        let search_path = std::env::var_os("PATH").unwrap_or_default();
        self.build_gh_in(&search_path)
    }

    fn build_gh_in(&self, search_path: &OsStr) -> Result<GhBinary> {
        let mut gh = match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, || {
                gh_binary::locate_executable_in(&self.executable, search_path)
            }),
            None => gh_binary::locate_executable_in(&self.executable, search_path),
        }
        .map(|path| GhBinary::new(path, self.api_version.clone()))?;
        if let Some(dispatch) = &self.dispatch {
            gh = gh.with_dispatch(dispatch.clone());
        }
        Ok(gh)
    }

    /// Build a `Client` from this `ClientBuilder`.
    ///
    /// This resolves the `gh` executable, fetches the authenticated identity and its repositories,
    /// and indexes their permissions. The first step that fails aborts construction.
    pub fn build(self) -> Result<Client> {
        let gh = self.build_gh()?;
        gh.in_scope(|| -> Result<Client> {
            debug!("Using {} with API version {}", gh.path().display(), gh.api_version());

            let identity = Identity::from_value(gh.try_get("/user")?)?;
            let username = identity.login().ok_or(Error::MissingLogin)?.to_string();

            let repos_value = gh.try_get(&format!("/users/{username}/repos"))?;
            let repos = Repository::list_from_value(repos_value)?;
            let repo_perm_index = build_permission_index(&repos);
            info!("Indexed permissions of {} repositories for {username}", repo_perm_index.len());

            Ok(Client {
                gh: gh.clone(),
                identity,
                username,
                repos,
                repo_perm_index,
            })
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
