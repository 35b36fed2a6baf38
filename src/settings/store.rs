//! Settings persistence seam.

use std::sync::Arc;

use thiserror::Error;

use crate::settings::model::ChainSettings;

/// Errors raised while persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Storage for the user's chain settings.
///
/// `load` never fails the caller: if storage is missing or unreadable it
/// returns empty settings. `save` fully overwrites any previous value, and
/// concurrent writers are not coordinated (last write wins).
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> ChainSettings;
    fn save(&self, settings: &ChainSettings) -> Result<(), SettingsError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn load(&self) -> ChainSettings {
        (**self).load()
    }

    fn save(&self, settings: &ChainSettings) -> Result<(), SettingsError> {
        (**self).save(settings)
    }
}

/// True iff the chain is set and the wallet key is non-empty.
pub fn is_complete(settings: &ChainSettings) -> bool {
    settings.is_complete()
}
