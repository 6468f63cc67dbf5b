//! Interpolation helpers:
//! - lerp_f32 / lerp_vec3 (linear, extrapolates outside [0,1])
//! - slerp_quat (spherical, shortest arc, NLERP fallback for nearly equal inputs)

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion (x,y,z,w). A zero quaternion becomes identity.
#[inline]
pub fn normalize4(q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        [q[0] * inv_len, q[1] * inv_len, q[2] * inv_len, q[3] * inv_len]
    } else {
        [0.0, 0.0, 0.0, 1.0]
    }
}

/// Spherical interpolation between two rotations along the shortest arc.
///
/// Inputs are normalized first. When |dot| exceeds `lerp_threshold` the arc is too
/// short for a stable `sin` ratio and normalized lerp is used instead. `t` is not
/// clamped; values outside [0,1] continue along the same great circle.
pub fn slerp_quat(a: [f32; 4], b: [f32; 4], t: f32, lerp_threshold: f32) -> [f32; 4] {
    let qa = normalize4(a);
    let mut qb = normalize4(b);

    let mut dot = dot4(qa, qb);
    if dot < 0.0 {
        qb = [-qb[0], -qb[1], -qb[2], -qb[3]];
        dot = -dot;
    }

    if dot > lerp_threshold {
        return normalize4([
            lerp_f32(qa[0], qb[0], t),
            lerp_f32(qa[1], qb[1], t),
            lerp_f32(qa[2], qb[2], t),
            lerp_f32(qa[3], qb[3], t),
        ]);
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let sin_theta_0 = theta_0.sin();
    let s0 = (theta_0 * (1.0 - t)).sin() / sin_theta_0;
    let s1 = (theta_0 * t).sin() / sin_theta_0;

    normalize4([
        s0 * qa[0] + s1 * qb[0],
        s0 * qa[1] + s1 * qb[1],
        s0 * qa[2] + s1 * qb[2],
        s0 * qa[3] + s1 * qb[3],
    ])
}
