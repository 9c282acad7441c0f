//! Surface and bulk properties shared by bodies.

use crate::error::{check_range, Result};
use crate::math;

/// Allowed density range for [`Material`] construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialLimits {
    pub min_density: f32,
    pub max_density: f32,
}

impl MaterialLimits {
    pub const MIN_DENSITY: f32 = 0.29;
    pub const MAX_DENSITY: f32 = 510.0;
}

impl Default for MaterialLimits {
    fn default() -> Self {
        Self {
            min_density: Self::MIN_DENSITY,
            max_density: Self::MAX_DENSITY,
        }
    }
}

/// Density, restitution and friction coefficients.
///
/// Immutable once built. Construction fails on out-of-range values instead
/// of clamping them; use [`Material::clamped`] when clamping is wanted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    density: f32,
    restitution: f32,
    static_friction: f32,
    dynamic_friction: f32,
}

impl Material {
    /// Build a material checked against [`MaterialLimits::default`].
    pub fn new(
        density: f32,
        restitution: f32,
        static_friction: f32,
        dynamic_friction: f32,
    ) -> Result<Self> {
        Self::with_limits(
            density,
            restitution,
            static_friction,
            dynamic_friction,
            &MaterialLimits::default(),
        )
    }

    /// Build a material checked against custom density limits.
    pub fn with_limits(
        density: f32,
        restitution: f32,
        static_friction: f32,
        dynamic_friction: f32,
        limits: &MaterialLimits,
    ) -> Result<Self> {
        Ok(Self {
            density: check_range("density", density, limits.min_density, limits.max_density)?,
            restitution: check_range("restitution", restitution, 0.0, 1.0)?,
            static_friction: check_range("static_friction", static_friction, 0.0, 1.0)?,
            dynamic_friction: check_range("dynamic_friction", dynamic_friction, 0.0, 1.0)?,
        })
    }

    /// Build a material, clamping every value into its valid range.
    ///
    /// NaN inputs fall back to the matching [`Material::default`] value.
    pub fn clamped(
        density: f32,
        restitution: f32,
        static_friction: f32,
        dynamic_friction: f32,
        limits: &MaterialLimits,
    ) -> Self {
        let fallback = Self::default();
        let fix = |value: f32, default: f32, min: f32, max: f32| {
            if value.is_nan() {
                default
            } else {
                math::clamp(value, min, max)
            }
        };
        Self {
            density: fix(
                density,
                fallback.density,
                limits.min_density,
                limits.max_density,
            ),
            restitution: fix(restitution, fallback.restitution, 0.0, 1.0),
            static_friction: fix(static_friction, fallback.static_friction, 0.0, 1.0),
            dynamic_friction: fix(dynamic_friction, fallback.dynamic_friction, 0.0, 1.0),
        }
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    #[inline]
    pub fn static_friction(&self) -> f32 {
        self.static_friction
    }

    #[inline]
    pub fn dynamic_friction(&self) -> f32 {
        self.dynamic_friction
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 2.73,
            restitution: 0.17,
            static_friction: 0.6,
            dynamic_friction: 0.3,
        }
    }
}
