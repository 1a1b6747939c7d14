//! Frame producers for the spinning planet
//!
//! Both producers step the spin angle by `2π / FRAMES_PER_REVOLUTION * speed` and
//! share the renderer's single-frame call. `Spin` never ends; `Revolution` stops after
//! one full turn.

use std::f64::consts::TAU;

use crate::canvas::Canvas;
use crate::renderer::Renderer;

/// Angles within this distance of a full turn repeat frame 0
const CLOSING_TOLERANCE: f64 = 1e-9;

/// Angle advanced per frame
pub fn angle_step(speed: f64) -> f64 {
    TAU / crate::FRAMES_PER_REVOLUTION as f64 * speed
}

/// Unbounded, lazily rendered sequence of `(angle_offset, canvas)`
pub struct Spin<'a> {
    renderer: &'a Renderer,
    step: f64,
    frame: u64,
}

impl<'a> Spin<'a> {
    pub fn new(renderer: &'a Renderer, speed: f64) -> Self {
        Self {
            renderer,
            step: angle_step(speed),
            frame: 0,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Iterator for Spin<'_> {
    type Item = (f64, Canvas);

    fn next(&mut self) -> Option<Self::Item> {
        let angle = self.frame as f64 * self.step;
        self.frame += 1;
        Some((angle, self.renderer.render(angle)))
    }
}

/// Exactly one revolution. The sample at a full turn duplicates frame 0 and is
/// never produced.
pub struct Revolution<'a> {
    renderer: &'a Renderer,
    step: f64,
    frame: u64,
}

impl<'a> Revolution<'a> {
    /// `speed` must be positive and finite or the sequence would never end.
    pub fn new(renderer: &'a Renderer, speed: f64) -> Self {
        Self {
            renderer,
            step: angle_step(speed),
            frame: 0,
        }
    }

    /// Spin angles this revolution will render
    pub fn angles(speed: f64) -> Vec<f64> {
        let step = angle_step(speed);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        (0u64..)
            .map(|k| k as f64 * step)
            .take_while(|&angle| angle < TAU - CLOSING_TOLERANCE)
            .collect()
    }
}

impl Iterator for Revolution<'_> {
    type Item = (f64, Canvas);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return None;
        }
        let angle = self.frame as f64 * self.step;
        if angle >= TAU - CLOSING_TOLERANCE {
            return None;
        }
        self.frame += 1;
        Some((angle, self.renderer.render(angle)))
    }
}
