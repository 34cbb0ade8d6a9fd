// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar animation capability: tween and spring steppers driven by frame ticks.
//!
//! The sheet does not own a clock. Hosts call
//! [`GleamState::advance`](crate::GleamState::advance) once per frame with the
//! elapsed time, which steps the in-flight [`ScalarAnimation`].
//!
//! ```
//! use gleam_sheet::{AnimationSpec, ScalarAnimation};
//!
//! let mut anim = ScalarAnimation::new(AnimationSpec::default(), 800.0, 400.0, 0.0);
//! let mut frame = anim.step(16.0);
//! while !frame.finished {
//!     frame = anim.step(16.0);
//! }
//! assert_eq!(frame.value, 400.0);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// An easing curve mapping linear progress in `[0, 1]` to eased progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Standard Material curve, `cubic-bezier(0.4, 0.0, 0.2, 1.0)`.
    FastOutSlowIn,
    /// Decelerating curve, `cubic-bezier(0.0, 0.0, 0.2, 1.0)`.
    LinearOutSlowIn,
    /// Accelerating curve, `cubic-bezier(0.4, 0.0, 1.0, 1.0)`.
    FastOutLinearIn,
    /// A custom cubic Bézier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Applies the curve to `fraction`, clamped to `[0, 1]`.
    #[must_use]
    pub fn transform(self, fraction: f64) -> f64 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            Self::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, t),
            Self::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, t),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_axis(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_axis_slope(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Evaluates the curve's y for a given x by solving x(t) = `x`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x <= 0.0 || x >= 1.0 {
        return x;
    }
    // Newton first, bisection if the slope is too flat to trust.
    let mut t = x;
    for _ in 0..8 {
        let err = bezier_axis(x1, x2, t) - x;
        if err.abs() < 1e-7 {
            return bezier_axis(y1, y2, t);
        }
        let slope = bezier_axis_slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= err / slope;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    t = x;
    for _ in 0..48 {
        let value = bezier_axis(x1, x2, t);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    bezier_axis(y1, y2, t)
}

/// How an animated transition moves toward its target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AnimationSpec {
    /// Fixed-duration interpolation along an easing curve.
    Tween {
        /// Total duration in milliseconds.
        duration_ms: f64,
        /// Easing curve.
        easing: Easing,
    },
    /// Damped harmonic oscillator with unit mass.
    Spring {
        /// `1.0` is critically damped; lower values bounce.
        damping_ratio: f64,
        /// Spring stiffness.
        stiffness: f64,
    },
    /// Jump to the target on the first frame.
    Snap,
}

impl AnimationSpec {
    /// Critically damped spring with medium stiffness.
    pub const SPRING_NO_BOUNCE: Self = Self::Spring {
        damping_ratio: 1.0,
        stiffness: 1500.0,
    };
}

impl Default for AnimationSpec {
    /// The sheet default: a 300ms fast-out-slow-in tween.
    fn default() -> Self {
        Self::Tween {
            duration_ms: 300.0,
            easing: Easing::FastOutSlowIn,
        }
    }
}

/// One step of a [`ScalarAnimation`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationFrame {
    /// Current value.
    pub value: f64,
    /// Current velocity in units per second.
    pub velocity: f64,
    /// `true` once the animation reached its target; `value` is then exact.
    pub finished: bool,
}

/// Displacement below which a spring counts as arrived.
const SPRING_DISPLACEMENT_THRESHOLD: f64 = 0.5;
/// Velocity (units/s) below which a spring counts as at rest.
const SPRING_VELOCITY_THRESHOLD: f64 = 1.0;

/// A running animation of one scalar toward a target.
#[derive(Clone, Debug)]
pub struct ScalarAnimation {
    spec: AnimationSpec,
    from: f64,
    to: f64,
    initial_velocity: f64,
    elapsed_ms: f64,
    value: f64,
    velocity: f64,
}

impl ScalarAnimation {
    /// Starts animating from `from` to `to` with an initial velocity in units per second.
    #[must_use]
    pub fn new(spec: AnimationSpec, from: f64, to: f64, initial_velocity: f64) -> Self {
        Self {
            spec,
            from,
            to,
            initial_velocity,
            elapsed_ms: 0.0,
            value: from,
            velocity: initial_velocity,
        }
    }

    /// The value being animated toward.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// The most recent value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The most recent velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Restarts toward a new target from the current value and velocity.
    pub fn retarget(&mut self, to: f64) {
        *self = Self::new(self.spec, self.value, to, self.velocity);
    }

    /// Advances the animation by `dt_ms` milliseconds.
    pub fn step(&mut self, dt_ms: f64) -> AnimationFrame {
        let dt_ms = dt_ms.max(0.0);
        self.elapsed_ms += dt_ms;
        let finished = match self.spec {
            AnimationSpec::Snap => {
                self.value = self.to;
                self.velocity = 0.0;
                true
            }
            AnimationSpec::Tween {
                duration_ms,
                easing,
            } => {
                if duration_ms <= 0.0 || self.elapsed_ms >= duration_ms {
                    self.value = self.to;
                    self.velocity = 0.0;
                    true
                } else {
                    let previous = self.value;
                    let eased = easing.transform(self.elapsed_ms / duration_ms);
                    self.value = self.from + (self.to - self.from) * eased;
                    self.velocity = if dt_ms > 0.0 {
                        (self.value - previous) * 1000.0 / dt_ms
                    } else {
                        self.velocity
                    };
                    false
                }
            }
            AnimationSpec::Spring {
                damping_ratio,
                stiffness,
            } => {
                let (displacement, velocity) = spring_state(
                    damping_ratio,
                    stiffness,
                    self.from - self.to,
                    self.initial_velocity,
                    self.elapsed_ms / 1000.0,
                );
                if displacement.abs() < SPRING_DISPLACEMENT_THRESHOLD
                    && velocity.abs() < SPRING_VELOCITY_THRESHOLD
                {
                    self.value = self.to;
                    self.velocity = 0.0;
                    true
                } else {
                    self.value = self.to + displacement;
                    self.velocity = velocity;
                    false
                }
            }
        };
        AnimationFrame {
            value: self.value,
            velocity: self.velocity,
            finished,
        }
    }
}

/// Closed-form displacement and velocity of a unit-mass spring at time `t` seconds.
fn spring_state(damping_ratio: f64, stiffness: f64, x0: f64, v0: f64, t: f64) -> (f64, f64) {
    let stiffness = stiffness.max(f64::MIN_POSITIVE);
    let zeta = damping_ratio.max(0.0);
    let omega = stiffness.sqrt();
    if (zeta - 1.0).abs() < 1e-9 {
        let b = v0 + omega * x0;
        let decay = (-omega * t).exp();
        let x = (x0 + b * t) * decay;
        let v = (b - omega * (x0 + b * t)) * decay;
        (x, v)
    } else if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let a = x0;
        let b = (v0 + zeta * omega * x0) / omega_d;
        let decay = (-zeta * omega * t).exp();
        let (sin, cos) = ((omega_d * t).sin(), (omega_d * t).cos());
        let x = decay * (a * cos + b * sin);
        let v = decay * (-zeta * omega * (a * cos + b * sin) + omega_d * (b * cos - a * sin));
        (x, v)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        let c2 = (v0 - r1 * x0) / (r2 - r1);
        let c1 = x0 - c2;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
    }
}
