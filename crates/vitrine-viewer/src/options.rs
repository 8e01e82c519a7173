// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Viewer construction options (`src`, `color`, input mode).

use crate::OptionsError;
use vitrine_app_core::prefs::{InteractionMode, LookPrefs, ViewerPrefs};
use vitrine_scene_port::Background;

/// Validated options for one viewer instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerOptions {
    src: String,
    color: Option<String>,
    background: Background,
    interaction: InteractionMode,
    look: LookPrefs,
}

impl ViewerOptions {
    /// Options for `src` with the default opaque background and toggle input.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            color: None,
            background: Background::default(),
            interaction: InteractionMode::default(),
            look: LookPrefs::default(),
        }
    }

    /// Set the background from `#RRGGBB`, `#RGB` or `transparent`.
    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self, OptionsError> {
        let color = color.into();
        self.background = color.parse()?;
        self.color = Some(color);
        Ok(self)
    }

    /// Choose how pointer input drives the viewer.
    pub fn with_interaction(mut self, mode: InteractionMode) -> Self {
        self.interaction = mode;
        self
    }

    /// Tune look controls.
    pub fn with_look(mut self, look: LookPrefs) -> Self {
        self.look = look;
        self
    }

    /// Build options from persisted prefs; `src` must be present.
    pub fn from_prefs(prefs: &ViewerPrefs) -> Result<Self, OptionsError> {
        let src = prefs
            .src
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(OptionsError::MissingSource)?;
        let opts = Self::new(src)
            .with_interaction(prefs.interaction)
            .with_look(prefs.look);
        match &prefs.color {
            Some(color) => opts.with_color(color.clone()),
            None => Ok(opts),
        }
    }

    /// Write these options back into `prefs`, keeping unrelated fields.
    pub fn store_into(&self, prefs: &mut ViewerPrefs) {
        prefs.src = Some(self.src.clone());
        prefs.color.clone_from(&self.color);
        prefs.interaction = self.interaction;
        prefs.look = self.look;
    }

    /// Asset source URI.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Parsed background.
    pub fn background(&self) -> Background {
        self.background
    }

    /// Input mode.
    pub fn interaction(&self) -> InteractionMode {
        self.interaction
    }

    /// Look-control tuning.
    pub fn look(&self) -> LookPrefs {
        self.look
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use vitrine_scene_port::Color;

    #[test]
    fn color_option_sets_background() {
        let opts = ViewerOptions::new("assets/skull/scene.gltf")
            .with_color("#FFFFFF")
            .expect("color");
        assert_eq!(opts.background(), Background::Color(Color::WHITE));
    }

    #[test]
    fn invalid_color_is_rejected() {
        let err = ViewerOptions::new("a.gltf").with_color("chartreuse");
        assert!(matches!(err, Err(OptionsError::Color(_))));
    }

    #[test]
    fn prefs_require_a_source() {
        assert_eq!(
            ViewerOptions::from_prefs(&ViewerPrefs::default()),
            Err(OptionsError::MissingSource)
        );
        let prefs = ViewerPrefs {
            src: Some("assets/blanko/blanko.glb".into()),
            color: Some("#000000".into()),
            interaction: InteractionMode::Look,
            ..ViewerPrefs::default()
        };
        let opts = ViewerOptions::from_prefs(&prefs).expect("opts");
        assert_eq!(opts.src(), "assets/blanko/blanko.glb");
        assert_eq!(opts.interaction(), InteractionMode::Look);

        let mut saved = ViewerPrefs::default();
        opts.store_into(&mut saved);
        assert_eq!(saved, prefs);
    }
}
