//! Radial darkening, the one effect that is not a single filter function.
//!
//! Two shapes exist: the baked capture vignette (linear ramp to 70% black at
//! `0.6 * max(w, h)`) and the live preview overlay (a three-stop ramp out to the farthest corner).

use crate::foundation::core::RgbaFrame;
use crate::foundation::math::darken_over;

/// A gradient stop: black at `alpha`, placed at `offset` of the gradient radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VignetteStop {
    /// Position along the radius in `[0, 1]`.
    pub offset: f32,
    /// Black opacity at this position.
    pub alpha: f32,
}

/// How the gradient radius is derived from the frame size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VignetteRadius {
    /// `factor * max(width, height)`.
    LongestSide(f32),
    /// Distance from the center to a corner.
    FarthestCorner,
}

/// A black radial gradient centered on the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Vignette {
    /// Radius rule.
    pub radius: VignetteRadius,
    /// Stops sorted by offset. Positions before the first or after the last stop repeat it.
    pub stops: Vec<VignetteStop>,
}

impl Vignette {
    /// The darkening painted onto captured frames.
    pub fn capture() -> Self {
        Self {
            radius: VignetteRadius::LongestSide(0.6),
            stops: vec![
                VignetteStop {
                    offset: 0.0,
                    alpha: 0.0,
                },
                VignetteStop {
                    offset: 1.0,
                    alpha: 0.7,
                },
            ],
        }
    }

    /// The overlay shown over the live preview.
    pub fn preview_overlay() -> Self {
        Self {
            radius: VignetteRadius::FarthestCorner,
            stops: vec![
                VignetteStop {
                    offset: 0.4,
                    alpha: 0.0,
                },
                VignetteStop {
                    offset: 0.8,
                    alpha: 0.5,
                },
                VignetteStop {
                    offset: 1.0,
                    alpha: 0.8,
                },
            ],
        }
    }

    /// Gradient radius in pixels for a frame of the given size.
    pub fn radius_px(&self, width: u32, height: u32) -> f32 {
        match self.radius {
            VignetteRadius::LongestSide(k) => k * width.max(height) as f32,
            VignetteRadius::FarthestCorner => {
                (width as f32 / 2.0).hypot(height as f32 / 2.0)
            }
        }
    }

    /// Black opacity at normalized distance `t` from the center.
    pub fn alpha_at(&self, t: f32) -> f32 {
        let Some(first) = self.stops.first() else {
            return 0.0;
        };
        if t <= first.offset {
            return first.alpha;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.alpha;
                }
                return a.alpha + (b.alpha - a.alpha) * ((t - a.offset) / span);
            }
        }
        self.stops.last().map_or(0.0, |s| s.alpha)
    }

    /// Paint the gradient over a straight RGBA8 frame.
    pub fn apply(&self, frame: &mut RgbaFrame) {
        let radius = self.radius_px(frame.width, frame.height);
        if radius <= 0.0 {
            return;
        }
        let (cx, cy) = (frame.width as f32 / 2.0, frame.height as f32 / 2.0);
        let w = frame.width as usize;
        for (i, px) in frame.data.chunks_exact_mut(4).enumerate() {
            // Sample at pixel centers.
            let x = (i % w) as f32 + 0.5;
            let y = (i / w) as f32 + 0.5;
            let t = (x - cx).hypot(y - cy) / radius;
            let alpha = self.alpha_at(t);
            if alpha > 0.0 {
                darken_over(px, alpha);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/vignette.rs"]
mod tests;
