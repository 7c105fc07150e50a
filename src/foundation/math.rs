use std::ops::{Add, Mul, Neg, Sub};

/// 3-component vector used by hit-testing and clip-space geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, o: Self) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector; the zero vector is returned unchanged.
    pub fn normalize(self) -> Self {
        let len2 = self.dot(self);
        if len2 > 0.0 {
            self.scale(1.0 / len2.sqrt())
        } else {
            self
        }
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// 4x4 matrix, row-major storage, translation in the last column.
///
/// Points are column vectors: `p' = M * p`. Composing `a * b` applies `b` first.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mat4(pub [f64; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self([
            1.0, 0.0, 0.0, x, //
            0.0, 1.0, 0.0, y, //
            0.0, 0.0, 1.0, z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self([
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            0.0, 0.0, z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_x(a: f64) -> Self {
        let (s, c) = a.sin_cos();
        Self([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_y(a: f64) -> Self {
        let (s, c) = a.sin_cos();
        Self([
            c, 0.0, s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_z(a: f64) -> Self {
        let (s, c) = a.sin_cos();
        Self([
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Euler rotation, equal to `rotate_z(z) * rotate_y(y) * rotate_x(x)`.
    pub fn rotate_xyz(x: f64, y: f64, z: f64) -> Self {
        let (sx, cx) = x.sin_cos();
        let (sy, cy) = y.sin_cos();
        let (sz, cz) = z.sin_cos();
        Self([
            cy * cz,
            sx * sy * cz - cx * sz,
            cx * sy * cz + sx * sz,
            0.0,
            cy * sz,
            sx * sy * sz + cx * cz,
            cx * sy * sz - sx * cz,
            0.0,
            -sy,
            sx * cy,
            cx * cy,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Pixel-space orthographic projection used when a draw has no projection node.
    ///
    /// Maps `x in [0, w]` to `[-1, 1]`, `y in [0, h]` to `[1, -1]` and `z in [0, far]` to `[-1, 1]`.
    pub fn pixel_ortho(width: f64, height: f64, far: f64) -> Self {
        Self([
            2.0 / width,
            0.0,
            0.0,
            -1.0,
            0.0,
            -2.0 / height,
            0.0,
            1.0,
            0.0,
            0.0,
            2.0 / far,
            -1.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.0[row * 4 + col]
    }

    pub fn transpose(&self) -> Self {
        let a = &self.0;
        Self([
            a[0], a[4], a[8], a[12], //
            a[1], a[5], a[9], a[13], //
            a[2], a[6], a[10], a[14], //
            a[3], a[7], a[11], a[15],
        ])
    }

    pub fn mul_vec4(&self, v: [f64; 4]) -> [f64; 4] {
        let a = &self.0;
        let mut out = [0.0; 4];
        for (r, o) in out.iter_mut().enumerate() {
            *o = a[r * 4] * v[0] + a[r * 4 + 1] * v[1] + a[r * 4 + 2] * v[2] + a[r * 4 + 3] * v[3];
        }
        out
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, b: Mat4) -> Mat4 {
        let a = &self.0;
        let b = &b.0;
        let mut out = [0.0; 16];
        for r in 0..4 {
            for c in 0..4 {
                out[r * 4 + c] = a[r * 4] * b[c]
                    + a[r * 4 + 1] * b[4 + c]
                    + a[r * 4 + 2] * b[8 + c]
                    + a[r * 4 + 3] * b[12 + c];
            }
        }
        Mat4(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
