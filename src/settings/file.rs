//! TOML-file settings store.
//!
//! The file holds two scalar entries:
//!
//! ```toml
//! selected_chain = "ETH"
//! wallet_key = "..."
//! ```
//!
//! # Security
//! The wallet key is stored unencrypted. Anything that can read the file can
//! use the credential. On Unix the temporary file is opened with mode `0600`
//! before any secret is written and then renamed into place, which limits but
//! does not remove that exposure.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::blockchain::types::Chain;
use crate::settings::model::{ChainSettings, WalletKey};
use crate::settings::store::{SettingsError, SettingsStore};

const APP_DIR: &str = "pixelproof";
const FILE_NAME: &str = "settings.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    selected_chain: Option<String>,
    wallet_key: Option<String>,
}

/// Settings stored in a TOML file on the local machine.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform config dir>/pixelproof/settings.toml`, falling back to the
    /// working directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<PersistedSettings>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        toml::from_str(&content).map(Some).map_err(|e| e.to_string())
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn atomic_write(&self, content: &str) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(dir, e))?;
        }

        let tmp_path = self.path.with_extension("toml.tmp");
        // A leftover from an interrupted save may carry looser permissions.
        match fs::remove_file(&tmp_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(&tmp_path, e)),
        }

        if let Err(e) = write_private(&tmp_path, content.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(&self.path, e));
        }
        Ok(())
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> ChainSettings {
        let persisted = match self.read() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => return ChainSettings::default(),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Settings unreadable, using empty settings");
                return ChainSettings::default();
            }
        };

        let chain = match persisted.selected_chain.as_deref() {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Chain>() {
                Ok(chain) => Some(chain),
                Err(e) => {
                    tracing::warn!(path = ?self.path, error = %e, "Ignoring saved chain");
                    None
                }
            },
        };

        ChainSettings {
            chain,
            wallet_key: WalletKey::new(persisted.wallet_key.unwrap_or_default()),
        }
    }

    fn save(&self, settings: &ChainSettings) -> Result<(), SettingsError> {
        let persisted = PersistedSettings {
            selected_chain: settings.chain.map(|c| c.as_str().to_string()),
            wallet_key: Some(settings.wallet_key.expose().to_string()),
        };
        let content = toml::to_string(&persisted)?;
        self.atomic_write(&content)?;

        tracing::warn!(
            path = ?self.path,
            "Wallet credential stored unencrypted; protect this file"
        );
        tracing::info!(path = ?self.path, chain = ?settings.chain, "Settings saved");
        Ok(())
    }
}

/// Create `path` (which must not exist) owner-only and write `content`.
fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
