use serde_json::Value;
use std::ffi::OsStr;

use super::{ClientBuilder, Identity, PermissionIndex, Repository, Result};
use crate::gh_binary::GhBinary;

// -------------------------------------------------------------------------------------------------
// Client
// -------------------------------------------------------------------------------------------------
/// A GitHub client for the account that `gh` is authenticated as.
///
/// The identity, repository list, and permission index are fetched once when the client is built
/// and never refreshed.
pub struct Client {
    pub(super) gh: GhBinary,
    pub(super) identity: Identity,
    pub(super) username: String,
    pub(super) repos: Vec<Repository>,
    pub(super) repo_perm_index: PermissionIndex,
}

impl Client {
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub fn gh(&self) -> &GhBinary {
        &self.gh
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn repos(&self) -> &[Repository] {
        &self.repos
    }

    pub fn repo_perm_index(&self) -> &PermissionIndex {
        &self.repo_perm_index
    }

    pub fn permissions_for(&self, full_name: &str) -> Option<&[String]> {
        self.repo_perm_index.get(full_name)
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.gh.get(path)
    }

    pub fn post<I, S>(&self, path: &str, args: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.gh.post(path, args)
    }

    /// Search repositories with the given query, e.g., `user:octocat language:rust`.
    pub fn search_repositories(&self, query: &str) -> Option<Value> {
        self.gh.get(&search_repositories_path(query))
    }
}

fn search_repositories_path(query: &str) -> String {
    let query: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("/search/repositories?q={query}")
}
