// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pointer input handling: click-to-pause, or pointer-lock look controls.

use glam::Vec2;
use vitrine_app_core::prefs::{InteractionMode, LookPrefs};
use vitrine_scene_port::PerspectiveCamera;

/// Host-neutral input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerInput {
    /// Primary click on the drawable.
    Click,
    /// Relative pointer motion in pixels.
    PointerDelta {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
    /// Pointer lock released (Escape, focus loss).
    Release,
}

/// Render loop state as seen by the toggle controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Loop running.
    #[default]
    Animating,
    /// Loop stopped.
    Paused,
}

impl PlaybackState {
    /// The other state.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Animating => Self::Paused,
            Self::Paused => Self::Animating,
        }
    }
}

/// What the host or viewer must do in response to an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    None,
    /// Restart the render loop.
    StartLoop,
    /// Stop the render loop.
    StopLoop,
    /// Host should grab and hide the pointer.
    LockPointer,
    /// Host should release the pointer.
    ReleasePointer,
    /// Camera orientation changed.
    CameraMoved,
}

/// Input state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionController {
    /// Clicks alternate between animating and paused.
    Toggle {
        /// Current playback state.
        playback: PlaybackState,
    },
    /// Clicks lock the pointer; motion while locked turns the camera.
    Look {
        /// Pointer locked.
        locked: bool,
        /// Look tuning.
        look: LookPrefs,
    },
}

impl InteractionController {
    /// Controller for `mode`, starting animated/unlocked.
    pub fn new(mode: InteractionMode, look: LookPrefs) -> Self {
        match mode {
            InteractionMode::Toggle => Self::Toggle {
                playback: PlaybackState::Animating,
            },
            InteractionMode::Look => Self::Look {
                locked: false,
                look,
            },
        }
    }

    /// Advance the state machine.
    pub fn handle(
        &mut self,
        input: ViewerInput,
        camera: &mut PerspectiveCamera,
    ) -> InteractionOutcome {
        match (self, input) {
            (Self::Toggle { playback }, ViewerInput::Click) => {
                *playback = playback.toggle();
                match playback {
                    PlaybackState::Animating => InteractionOutcome::StartLoop,
                    PlaybackState::Paused => InteractionOutcome::StopLoop,
                }
            }
            (Self::Look { locked, .. }, ViewerInput::Click) if !*locked => {
                *locked = true;
                InteractionOutcome::LockPointer
            }
            (Self::Look { locked, .. }, ViewerInput::Release) if *locked => {
                *locked = false;
                InteractionOutcome::ReleasePointer
            }
            (Self::Look { locked: true, look }, ViewerInput::PointerDelta { dx, dy }) => {
                camera.rotate_by_look(
                    Vec2::new(dx, dy),
                    look.sensitivity,
                    look.invert_x,
                    look.invert_y,
                );
                InteractionOutcome::CameraMoved
            }
            _ => InteractionOutcome::None,
        }
    }

    /// Playback state, for toggle controllers.
    pub fn playback(&self) -> Option<PlaybackState> {
        match self {
            Self::Toggle { playback } => Some(*playback),
            Self::Look { .. } => None,
        }
    }
}
