use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Workspace;

/// File name of the credential store inside the home directory
pub const STORE_FILE_NAME: &str = ".slack_uploader.toml";

/// Registered workspaces plus the token of the one commands act on.
///
/// The whole store is read on every invocation and written back in full.
/// Concurrent invocations race and the last writer wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStore {
    /// Token of the current workspace; may match no workspace at all
    #[serde(default)]
    pub current_workspace_token: String,
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

/// Outcome of [`CredentialStore::register_or_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    Updated,
}

impl CredentialStore {
    /// `~/.slack_uploader.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dirs = BaseDirs::new().ok_or(Error::NoHomeDir)?;
        Ok(dirs.home_dir().join(STORE_FILE_NAME))
    }

    /// Load the store from its default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the store from `path`. A missing file yields an empty store.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "credential store not found, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::StoreRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::StoreParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the store to its default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Replace whatever is stored at `path` with this store
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::StoreWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| Error::StoreWrite {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), workspaces = self.workspaces.len(), "credential store saved");
        Ok(())
    }

    /// Workspace names in stored order
    pub fn list_names(&self) -> Vec<&str> {
        self.workspaces.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    /// Workspace whose token is the current one
    pub fn current(&self) -> Option<&Workspace> {
        if self.current_workspace_token.is_empty() {
            return None;
        }
        self.workspaces
            .iter()
            .find(|w| w.token == self.current_workspace_token)
    }

    pub fn is_current(&self, workspace: &Workspace) -> bool {
        !self.current_workspace_token.is_empty() && workspace.token == self.current_workspace_token
    }

    /// Name and token of the current workspace. The name is empty when no
    /// workspace holds the current token; the token is returned regardless.
    pub fn resolve_current(&self) -> (&str, &str) {
        let name = self.current().map(|w| w.name.as_str()).unwrap_or("");
        (name, self.current_workspace_token.as_str())
    }

    /// Add `workspace`, or overwrite name, domain and token of the one with
    /// the same id in place. The first token ever registered becomes current.
    pub fn register_or_update(&mut self, workspace: Workspace) -> Registration {
        if self.current_workspace_token.is_empty() {
            self.current_workspace_token = workspace.token.clone();
        }

        match self.workspaces.iter_mut().find(|w| w.id == workspace.id) {
            Some(existing) => {
                existing.name = workspace.name;
                existing.domain = workspace.domain;
                existing.token = workspace.token;
                info!(id = %existing.id, name = %existing.name, "workspace updated");
                Registration::Updated
            }
            None => {
                info!(id = %workspace.id, name = %workspace.name, "workspace added");
                self.workspaces.push(workspace);
                Registration::Added
            }
        }
    }

    /// Position of the workspace with id `target`, else the first named `target`
    pub fn position(&self, target: &str) -> Option<usize> {
        self.workspaces
            .iter()
            .position(|w| w.id == target)
            .or_else(|| self.workspaces.iter().position(|w| w.name == target))
    }

    /// Make the workspace identified by id (or, failing that, by name) current
    pub fn switch_current(&mut self, target: &str) -> Result<&Workspace> {
        let index = self
            .position(target)
            .ok_or_else(|| Error::UnknownWorkspace(target.to_string()))?;
        self.switch_to_index(index)
    }

    /// Make the workspace at `index` (stored order) current
    pub fn switch_to_index(&mut self, index: usize) -> Result<&Workspace> {
        let workspace = self
            .workspaces
            .get(index)
            .ok_or_else(|| Error::UnknownWorkspace(format!("#{}", index)))?;
        self.current_workspace_token = workspace.token.clone();
        info!(id = %workspace.id, name = %workspace.name, "switched workspace");
        Ok(workspace)
    }
}
