use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// Name of the profile file inside the `config` directory.
pub const PROFILE_FILE_NAME: &str = "user-profile-config.toml";

/// The fixed set of keys a profile store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKey {
    Username,
    PreferredCity,
}

impl ProfileKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKey::Username => "username",
            ProfileKey::PreferredCity => "preferredCity",
        }
    }
}

impl std::fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing location could not be created or opened. Fatal at startup.
    #[error("Failed to initialize profile storage at {}: {source}", path.display())]
    Init {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Profile storage at {} is not valid TOML: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write profile storage at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize profile to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Durable key-value persistence for the two profile fields.
///
/// `get` treats an empty stored string the same as a missing one.
pub trait ProfileStore {
    fn get(&self, key: ProfileKey) -> Result<Option<String>, StoreError>;

    /// Persist `value` under `key`. Once this returns `Ok`, the value is
    /// visible to later `get` calls and survives a process restart.
    fn set(&mut self, key: ProfileKey, value: &str) -> Result<(), StoreError>;
}

/// On-disk layout of the profile file.
///
/// Example TOML:
/// username = "alice"
/// preferredCity = "Paris"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,

    #[serde(default, rename = "preferredCity", skip_serializing_if = "Option::is_none")]
    preferred_city: Option<String>,
}

impl ProfileDocument {
    fn slot(&self, key: ProfileKey) -> Option<&str> {
        match key {
            ProfileKey::Username => self.username.as_deref(),
            ProfileKey::PreferredCity => self.preferred_city.as_deref(),
        }
    }

    fn slot_mut(&mut self, key: ProfileKey) -> &mut Option<String> {
        match key {
            ProfileKey::Username => &mut self.username,
            ProfileKey::PreferredCity => &mut self.preferred_city,
        }
    }
}

/// Profile store backed by a single TOML file.
///
/// The parsed document is kept in memory; every `set` rewrites the file
/// (temp file + fsync + rename) before the in-memory copy is updated.
#[derive(Debug)]
pub struct FileProfileStore {
    path: PathBuf,
    document: ProfileDocument,
}

impl FileProfileStore {
    /// `<working_dir>/config/user-profile-config.toml`
    pub fn default_path(working_dir: &Path) -> PathBuf {
        working_dir.join("config").join(PROFILE_FILE_NAME)
    }

    /// Open the store at `path`, creating parent directories and an empty
    /// file as needed.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Init {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Opening for append proves the file is writable without touching its contents.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Init {
                path: path.clone(),
                source,
            })?;

        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Init {
            path: path.clone(),
            source,
        })?;

        let document: ProfileDocument =
            toml::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "profile store initialized");

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, document: &ProfileDocument) -> Result<(), StoreError> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let toml = toml::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("toml.tmp");

        let mut file = File::create(&tmp_path).map_err(write_err)?;
        file.write_all(toml.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        Ok(())
    }
}

impl ProfileStore for FileProfileStore {
    fn get(&self, key: ProfileKey) -> Result<Option<String>, StoreError> {
        Ok(self
            .document
            .slot(key)
            .filter(|v| !v.is_empty())
            .map(str::to_owned))
    }

    fn set(&mut self, key: ProfileKey, value: &str) -> Result<(), StoreError> {
        let mut next = self.document.clone();
        *next.slot_mut(key) = Some(value.to_owned());

        self.persist(&next)?;
        self.document = next;

        debug!(%key, path = %self.path.display(), "profile value persisted");
        Ok(())
    }
}

/// Process-local store with the same contract as [`FileProfileStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    values: HashMap<ProfileKey, String>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for seeding a value.
    pub fn with(mut self, key: ProfileKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, key: ProfileKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).filter(|v| !v.is_empty()).cloned())
    }

    fn set(&mut self, key: ProfileKey, value: &str) -> Result<(), StoreError> {
        self.values.insert(key, value.to_owned());
        Ok(())
    }
}
