use crate::foundation::core::{Axis, DMat4, DVec3};

/// Fresh identity transform.
pub fn identity() -> DMat4 {
    DMat4::IDENTITY
}

/// Translation by `(x, y, z)`.
pub fn translate(x: f64, y: f64, z: f64) -> DMat4 {
    DMat4::from_translation(DVec3::new(x, y, z))
}

/// Non-uniform scale by `(x, y, z)`.
pub fn scale(x: f64, y: f64, z: f64) -> DMat4 {
    DMat4::from_scale(DVec3::new(x, y, z))
}

/// Right-handed rotation about one of the fixed axes.
pub fn rotate(axis: Axis, radians: f64) -> DMat4 {
    match axis {
        Axis::X => DMat4::from_rotation_x(radians),
        Axis::Y => DMat4::from_rotation_y(radians),
        Axis::Z => DMat4::from_rotation_z(radians),
    }
}

/// `a · b`: applying the result to a point applies `b` first, then `a`.
pub fn compose(a: &DMat4, b: &DMat4) -> DMat4 {
    *a * *b
}

/// Clamp a lighting intensity into an 8-bit channel.
pub(crate) fn channel_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
