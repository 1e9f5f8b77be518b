//! Per-frame configuration handed to the external renderer.
//!
//! Viewer mode, camera angles and light position live in one immutable
//! value built fresh for each frame rather than in mutable globals: input
//! handling derives the next frame's config from the previous one, and the
//! renderer only ever sees a snapshot.

use glam::Vec3;

/// Which precomputed map the marching shader steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConeStepMode {
    /// The brute-force cone map.
    Plain,
    /// The relaxed refinement.
    #[default]
    Relaxed,
}

/// Immutable per-frame render inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    /// Map selector for the shader.
    pub mode: ConeStepMode,
    /// Azimuth of the view, in degrees.
    pub phi: f32,
    /// Elevation of the view, in degrees.
    pub theta: f32,
    /// Light position in scene units.
    pub light_pos: Vec3,
    /// Vertical exaggeration applied by the shader.
    pub depth_scale: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            mode: ConeStepMode::default(),
            phi: 0.0,
            theta: 0.0,
            light_pos: Vec3::new(0.0, 0.0, 1.0),
            depth_scale: 1.0,
        }
    }
}

impl FrameConfig {
    /// Next frame's config after a view drag.
    #[must_use]
    pub fn rotated(self, dphi: f32, dtheta: f32) -> Self {
        Self {
            phi: self.phi + dphi,
            theta: self.theta + dtheta,
            ..self
        }
    }

    /// Next frame's config with the view angles reset.
    #[must_use]
    pub fn reset_view(self) -> Self {
        Self {
            phi: 0.0,
            theta: 0.0,
            ..self
        }
    }

    /// Next frame's config stepping by the given map.
    #[must_use]
    pub fn with_mode(self, mode: ConeStepMode) -> Self {
        Self { mode, ..self }
    }
}
