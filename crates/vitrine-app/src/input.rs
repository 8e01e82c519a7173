// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Input handling: map winit events into viewer input.

use vitrine_viewer::{InteractionOutcome, ViewerInput};
use winit::{
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

/// Window events the viewer cares about.
pub fn from_window_event(event: &WindowEvent) -> Option<ViewerInput> {
    match event {
        WindowEvent::MouseInput {
            state: ElementState::Pressed,
            button: MouseButton::Left,
            ..
        } => Some(ViewerInput::Click),
        WindowEvent::KeyboardInput { event, .. }
            if event.state == ElementState::Pressed
                && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
        {
            Some(ViewerInput::Release)
        }
        WindowEvent::Focused(false) => Some(ViewerInput::Release),
        _ => None,
    }
}

/// Raw pointer motion (unaffected by cursor grab or screen edges).
#[allow(clippy::cast_possible_truncation)]
pub fn from_device_event(event: &DeviceEvent) -> Option<ViewerInput> {
    match event {
        DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(ViewerInput::PointerDelta {
            dx: *dx as f32,
            dy: *dy as f32,
        }),
        _ => None,
    }
}

/// Apply pointer lock/release requested by the interaction controller.
pub fn apply_outcome(window: &Window, outcome: InteractionOutcome) {
    match outcome {
        InteractionOutcome::LockPointer => {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                tracing::warn!(%err, "pointer lock unavailable");
            }
            window.set_cursor_visible(false);
        }
        InteractionOutcome::ReleasePointer => {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!(%err, "pointer release failed");
            }
            window.set_cursor_visible(true);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_becomes_pointer_delta() {
        let ev = DeviceEvent::MouseMotion { delta: (3.0, -2.5) };
        assert_eq!(
            from_device_event(&ev),
            Some(ViewerInput::PointerDelta { dx: 3.0, dy: -2.5 })
        );
    }

    #[test]
    fn focus_loss_releases() {
        assert_eq!(
            from_window_event(&WindowEvent::Focused(false)),
            Some(ViewerInput::Release)
        );
        assert_eq!(from_window_event(&WindowEvent::Focused(true)), None);
    }
}
