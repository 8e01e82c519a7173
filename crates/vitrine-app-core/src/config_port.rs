// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port shared across Vitrine hosts.

use crate::{
    config::{ConfigService, ConfigStore},
    prefs::{ViewerPrefs, VIEWER_PREFS_KEY},
};

/// Host-facing port for loading/saving viewer preferences.
pub trait ConfigPort {
    /// Load viewer preferences (None if missing or unreadable).
    fn load_prefs(&self) -> Option<ViewerPrefs>;
    /// Persist viewer preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ViewerPrefs);
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<ViewerPrefs> {
        match self.load(VIEWER_PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(%err, "viewer prefs unreadable; using defaults");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ViewerPrefs) {
        if let Err(err) = self.save(VIEWER_PREFS_KEY, prefs) {
            tracing::warn!(%err, "failed to save viewer prefs");
        }
    }
}
