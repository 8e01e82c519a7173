// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line flags. Flags override saved prefs; absent flags keep them.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vitrine_app_core::prefs::{InteractionMode, ViewerPrefs};

/// Pointer input mode as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Click pauses/resumes the animation loop.
    Toggle,
    /// Click captures the pointer for mouse-look.
    Look,
}

impl From<InputMode> for InteractionMode {
    fn from(mode: InputMode) -> Self {
        match mode {
            InputMode::Toggle => Self::Toggle,
            InputMode::Look => Self::Look,
        }
    }
}

/// Show one glTF asset in a window.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "vitrine", version, about)]
pub struct Args {
    /// Asset URI: a path (relative to --assets), file://, or http(s)://.
    #[arg(long)]
    pub src: Option<String>,

    /// Background: #RRGGBB, #RGB or `transparent`.
    #[arg(long)]
    pub color: Option<String>,

    /// Pointer input mode.
    #[arg(long, value_enum)]
    pub input: Option<InputMode>,

    /// Base directory for relative asset paths.
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Present with vsync (`true` or `false`).
    #[arg(long, value_name = "BOOL")]
    pub vsync: Option<bool>,
}

impl Args {
    /// Overlay flags onto saved prefs.
    pub fn apply_to(&self, prefs: &mut ViewerPrefs) {
        if let Some(src) = &self.src {
            prefs.src = Some(src.clone());
        }
        if let Some(color) = &self.color {
            prefs.color = Some(color.clone());
        }
        if let Some(input) = self.input {
            prefs.interaction = input.into();
        }
        if let Some(vsync) = self.vsync {
            prefs.vsync = vsync;
        }
    }

    /// Asset base directory (defaults to the working directory).
    pub fn assets_dir(&self) -> PathBuf {
        self.assets.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_prefs() {
        let args = Args::parse_from([
            "vitrine",
            "--src",
            "skull/scene.gltf",
            "--color",
            "transparent",
            "--input",
            "look",
        ]);
        let mut prefs = ViewerPrefs {
            src: Some("old.glb".into()),
            color: Some("#ffffff".into()),
            ..ViewerPrefs::default()
        };
        args.apply_to(&mut prefs);
        assert_eq!(prefs.src.as_deref(), Some("skull/scene.gltf"));
        assert_eq!(prefs.color.as_deref(), Some("transparent"));
        assert_eq!(prefs.interaction, InteractionMode::Look);
        assert!(!prefs.vsync);
    }

    #[test]
    fn saved_look_and_vsync_can_be_switched_off() {
        let args = Args::parse_from(["vitrine", "--input", "toggle", "--vsync", "false"]);
        let mut prefs = ViewerPrefs {
            interaction: InteractionMode::Look,
            vsync: true,
            ..ViewerPrefs::default()
        };
        args.apply_to(&mut prefs);
        assert_eq!(prefs.interaction, InteractionMode::Toggle);
        assert!(!prefs.vsync);
    }

    #[test]
    fn absent_flags_keep_prefs() {
        let args = Args::parse_from(["vitrine"]);
        let saved = ViewerPrefs {
            src: Some("blanko/blanko.glb".into()),
            interaction: InteractionMode::Look,
            vsync: true,
            ..ViewerPrefs::default()
        };
        let mut prefs = saved.clone();
        args.apply_to(&mut prefs);
        assert_eq!(prefs, saved);
        assert_eq!(args.assets_dir(), PathBuf::from("."));
    }

    #[test]
    fn unknown_input_mode_is_rejected() {
        assert!(Args::try_parse_from(["vitrine", "--input", "orbit"]).is_err());
    }
}
