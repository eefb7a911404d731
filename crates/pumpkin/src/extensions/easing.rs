// extensions/easing.rs
//
// Pure easing functions for tween interpolation (Penner / AHEasing curves).
// No dependencies on nodes or pools, just math.
//
// Ease-out can always be written as `1 - ease_in(1 - t)` and in-out as the
// two halves glued at t = 0.5; the variants below use the closed forms.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec4};

/// Overshoot for the Back curves; 1.70158 gives a 10 percent overshoot.
const BACK_OVERSHOOT: f32 = 1.70158;

/// Easing function type.
///
/// Maps normalized time `t` in [0, 1] to eased progress. The result is not
/// bounded to [0, 1]: Back, Elastic and Shake overshoot.
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    /// Quarter of a unit circle.
    CircIn,
    CircOut,
    CircInOut,
    /// Base-2 exponential.
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    /// Exponentially damped sine wave.
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    /// Overshoot then settle.
    BackIn,
    BackOut,
    BackInOut,
    /// Stronger overshoot built from a sine lobe.
    ExtremeBackIn,
    ExtremeBackOut,
    ExtremeBackInOut,
    /// Exponentially decaying bounce.
    BounceIn,
    BounceOut,
    BounceInOut,
    /// Hermite smoothstep, very close to SineInOut.
    Smoothstep,
    /// Holds the start value until the very end.
    Stepped,
    /// Decaying oscillation around 1.0. Starts and ends at (almost) 1, so it
    /// is meant for the "from" tweens: screen shake, tumble, zoom.
    Shake { oscillations: u32 },
    /// Caller-supplied curve.
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            // Quadratic
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let f = t - 1.0;
                    1.0 - 2.0 * f * f
                }
            }

            // Cubic
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let f = t - 1.0;
                1.0 + f * f * f
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = t - 1.0;
                    1.0 + 4.0 * f * f * f
                }
            }

            // Quartic
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (t - 1.0).powi(4),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - 8.0 * (t - 1.0).powi(4)
                }
            }

            // Quintic
            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => 1.0 + (t - 1.0).powi(5),
            Easing::QuintInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 + 16.0 * (t - 1.0).powi(5)
                }
            }

            // Sine
            Easing::SineIn => ((t - 1.0) * FRAC_PI_2).sin() + 1.0,
            Easing::SineOut => (t * FRAC_PI_2).sin(),
            Easing::SineInOut => 0.5 * (1.0 - (t * PI).cos()),

            // Circular
            Easing::CircIn => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Easing::CircOut => ((2.0 - t) * t).max(0.0).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - (1.0 - 4.0 * t * t).max(0.0).sqrt())
                } else {
                    0.5 * (-4.0 * t * t + 8.0 * t - 3.0).max(0.0).sqrt() + 0.5
                }
            }

            // Exponential
            Easing::ExpoIn => {
                if t == 0.0 { 0.0 } else { 2.0_f32.powf(10.0 * (t - 1.0)) }
            }
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
            Easing::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    0.5 * 2.0_f32.powf(20.0 * t - 10.0)
                } else {
                    1.0 - 0.5 * 2.0_f32.powf(-20.0 * t + 10.0)
                }
            }

            // Elastic; endpoints pinned so tweens land exactly.
            Easing::ElasticIn => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    (13.0 * FRAC_PI_2 * t).sin() * 2.0_f32.powf(10.0 * (t - 1.0))
                }
            }
            Easing::ElasticOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    (-13.0 * FRAC_PI_2 * (t + 1.0)).sin() * 2.0_f32.powf(-10.0 * t) + 1.0
                }
            }
            Easing::ElasticInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    0.5 * (13.0 * PI * t).sin() * 2.0_f32.powf(20.0 * t - 10.0)
                } else {
                    0.5 * (-13.0 * PI * t).sin() * 2.0_f32.powf(-20.0 * t + 10.0) + 1.0
                }
            }

            // Back (overshoot)
            Easing::BackIn => back_in(t),
            Easing::BackOut => 1.0 - back_in(1.0 - t),
            Easing::BackInOut => {
                if t < 0.5 {
                    0.5 * back_in(2.0 * t)
                } else {
                    1.0 - 0.5 * back_in(2.0 * (1.0 - t))
                }
            }

            // Extreme back
            Easing::ExtremeBackIn => extreme_back_in(t),
            Easing::ExtremeBackOut => 1.0 - extreme_back_in(1.0 - t),
            Easing::ExtremeBackInOut => {
                if t < 0.5 {
                    0.5 * extreme_back_in(2.0 * t)
                } else {
                    1.0 - 0.5 * extreme_back_in(2.0 * (1.0 - t))
                }
            }

            // Bounce
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - t * 2.0))
                } else {
                    0.5 * bounce_out(t * 2.0 - 1.0) + 0.5
                }
            }

            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
            Easing::Stepped => {
                if t < 1.0 { 0.0 } else { 1.0 }
            }

            Easing::Shake { oscillations } => {
                -(2.0_f32.powf(-10.0 * t)) * (t * PI * oscillations as f32 * 2.0).sin() + 1.0
            }

            Easing::Custom(f) => f(t),
        }
    }
}

#[inline]
fn back_in(t: f32) -> f32 {
    ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT) * t * t
}

#[inline]
fn extreme_back_in(t: f32) -> f32 {
    (t * t - (t * PI).sin()) * t
}

#[inline]
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Linearly interpolate between two RGBA colors.
#[inline]
pub fn lerp_vec4(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec2 with easing.
#[inline]
pub fn ease_vec2(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 36] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::ExtremeBackIn,
        Easing::ExtremeBackOut,
        Easing::ExtremeBackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
        Easing::Smoothstep,
        Easing::Stepped,
    ];

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn every_curve_starts_at_zero_and_ends_at_one() {
        for easing in CURVES {
            let start = easing.apply(0.0);
            let end = easing.apply(1.0);
            assert!(start.abs() < 1e-4, "{easing:?} starts at {start}");
            assert!((end - 1.0).abs() < 1e-4, "{easing:?} ends at {end}");
        }
    }

    #[test]
    fn in_out_curves_pass_through_middle() {
        for easing in [
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::QuintInOut,
            Easing::SineInOut,
            Easing::Smoothstep,
        ] {
            let mid = easing.apply(0.5);
            assert!((mid - 0.5).abs() < 1e-4, "{easing:?} at 0.5 was {mid}");
        }
    }

    #[test]
    fn quad_out_faster_start() {
        let mid = Easing::QuadOut.apply(0.5);
        assert!(mid > 0.5, "QuadOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn back_overshoots() {
        assert!(Easing::BackIn.apply(0.2) < 0.0, "BackIn dips below zero first");
        assert!(Easing::BackOut.apply(0.8) > 1.0, "BackOut overshoots");
    }

    #[test]
    fn stepped_holds_until_end() {
        assert_eq!(Easing::Stepped.apply(0.99), 0.0);
        assert_eq!(Easing::Stepped.apply(1.0), 1.0);
    }

    #[test]
    fn shake_starts_at_one_and_settles() {
        let shake = Easing::Shake { oscillations: 10 };
        assert!((shake.apply(0.0) - 1.0).abs() < 1e-6);
        assert!((shake.apply(1.0) - 1.0).abs() < 1e-3);
        // Somewhere early on it swings away from 1.
        let swing = (1..20).map(|i| (shake.apply(i as f32 / 100.0) - 1.0).abs()).fold(0.0, f32::max);
        assert!(swing > 0.1, "shake should oscillate, max swing {swing}");
    }

    #[test]
    fn custom_curve_is_used() {
        fn square(t: f32) -> f32 {
            t * t
        }
        assert_eq!(Easing::Custom(square).apply(0.5), 0.25);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
        let v = ease_vec2(Vec2::ZERO, Vec2::new(10.0, -10.0), 1.0, Easing::QuadIn);
        assert_eq!(v, Vec2::new(10.0, -10.0));
    }
}
