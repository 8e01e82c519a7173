// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port trait for frame schedulers to wake the underlying window without
//! depending on a specific windowing crate.

/// Minimal redraw port; implementations are expected to be cheap/best-effort
/// and typically just forward to a windowing surface's `request_redraw`.
pub trait RenderPort {
    /// Request that the host deliver a redraw at the next display tick.
    fn request_redraw(&self);
}
