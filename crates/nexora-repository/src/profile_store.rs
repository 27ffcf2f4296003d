//! File backed profile store

use nexora_core::CustomerProfile;
use path_absolutize::Absolutize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::{error::RepositoryError, traits::ProfileRepository, RepositoryResult};

/// Serialization format of a profile source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick the format from the file extension, JSON when unknown
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

/// Read-only table of customer profiles
///
/// Loaded once from an array of profile records; lookups are O(1).
#[derive(Debug, Clone)]
pub struct ProfileStore {
    /// Absolute path of the source document, when loaded from disk
    source: Option<PathBuf>,
    /// Profiles in source order
    profiles: Vec<CustomerProfile>,
    /// user_id -> position in `profiles`
    index: HashMap<String, usize>,
}

impl ProfileStore {
    /// Load profiles from a JSON (`.json`) or YAML (`.yaml`/`.yml`) file
    ///
    /// # Errors
    /// [`RepositoryError::Configuration`] if the file is missing, unreadable,
    /// malformed, or contains duplicate or invalid profiles.
    ///
    /// # Example
    /// ```no_run
    /// # use nexora_repository::ProfileStore;
    /// # async fn example() -> nexora_repository::RepositoryResult<()> {
    /// let store = ProfileStore::load("data/mock_data.json").await?;
    /// assert!(!store.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let abs_path = path
            .absolutize()
            .map_err(|_| RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            })?
            .to_path_buf();

        debug!("Loading customer profiles from {}", abs_path.display());

        let content = fs::read_to_string(&abs_path).await.map_err(|e| {
            RepositoryError::Configuration(format!(
                "Failed to read profile source {}: {}",
                abs_path.display(),
                e
            ))
        })?;

        let profiles = parse_profiles(&content, SourceFormat::from_path(&abs_path))
            .map_err(|msg| {
                RepositoryError::Configuration(format!(
                    "Malformed profile source {}: {}",
                    abs_path.display(),
                    msg
                ))
            })?;

        let mut store = Self::from_profiles(profiles)?;
        store.source = Some(abs_path);

        info!(
            "Loaded {} customer profiles from {}",
            store.len(),
            store.source.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        );

        Ok(store)
    }

    /// Build a store from profiles already in memory
    ///
    /// # Errors
    /// [`RepositoryError::Configuration`] on duplicate `user_id`s or profiles
    /// that fail validation.
    pub fn from_profiles(profiles: Vec<CustomerProfile>) -> RepositoryResult<Self> {
        let mut index = HashMap::with_capacity(profiles.len());

        for (position, profile) in profiles.iter().enumerate() {
            profile
                .validate()
                .map_err(|e| RepositoryError::Configuration(e.to_string()))?;

            if index.insert(profile.user_id.clone(), position).is_some() {
                return Err(RepositoryError::Configuration(format!(
                    "Duplicate user_id in profile source: {}",
                    profile.user_id
                )));
            }
        }

        Ok(Self {
            source: None,
            profiles,
            index,
        })
    }

    /// Path the profiles were loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileRepository for ProfileStore {
    fn find(&self, user_id: &str) -> RepositoryResult<&CustomerProfile> {
        self.index
            .get(user_id)
            .map(|&position| &self.profiles[position])
            .ok_or_else(|| RepositoryError::NotFound {
                user_id: user_id.to_string(),
            })
    }

    fn list(&self) -> Vec<&CustomerProfile> {
        self.profiles.iter().collect()
    }
}

fn parse_profiles(content: &str, format: SourceFormat) -> Result<Vec<CustomerProfile>, String> {
    match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    }
}
