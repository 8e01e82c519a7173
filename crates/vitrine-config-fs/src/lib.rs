// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for Vitrine hosts (uses the platform config dir).

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use vitrine_app_core::config::{ConfigError, ConfigStore};

/// Stores each config key as `<key>.json` under a base directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g. `~/.config/vitrine`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "vitrine")
            .ok_or_else(|| ConfigError::Unavailable("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Create a store rooted at an explicit directory, creating it if needed.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory the store writes into.
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Readers never observe a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use vitrine_app_core::config::ConfigService;
    use vitrine_app_core::config_port::ConfigPort;
    use vitrine_app_core::prefs::ViewerPrefs;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsConfigStore::at(dir.path()).expect("store");
        assert!(matches!(store.load_raw("viewer"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn prefs_persist_as_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let svc = ConfigService::new(FsConfigStore::at(dir.path()).expect("store"));
        let prefs = ViewerPrefs {
            src: Some("assets/skull/scene.gltf".into()),
            ..ViewerPrefs::default()
        };
        svc.save_prefs(&prefs);
        assert!(dir.path().join("viewer.json").exists());
        assert!(!dir.path().join("viewer.json.tmp").exists());
        assert_eq!(svc.load_prefs(), Some(prefs));
    }
}
