use crate::foundation::math::Vec3;

/// Which triangle windings the hit test rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FaceCulling {
    #[default]
    None,
    /// Reject triangles with a negative determinant.
    Front,
    /// Reject triangles with a positive determinant.
    Back,
}

impl FaceCulling {
    /// `front` or `back` (case-insensitive); anything else disables culling.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "front" => Self::Front,
            "back" => Self::Back,
            _ => Self::None,
        }
    }
}

/// Hit-test parameters of an event router.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    pub cull_face: FaceCulling,
    /// Determinants with a smaller magnitude are treated as parallel (no hit).
    pub epsilon: f64,
    /// Ray origin depth, behind the near clip plane.
    pub origin_z: f64,
    /// Depth component of the (unnormalized) ray direction.
    pub direction_z: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cull_face: FaceCulling::None,
            epsilon: 1e-8,
            origin_z: -10.0,
            direction_z: 1e8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

/// Result of a ray-triangle test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub u: f64,
    pub v: f64,
    /// Distance along the normalized ray direction.
    pub t: f64,
    pub point: Vec3,
}

impl Triangle {
    pub const fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Moller-Trumbore test of the ray through clip `(x, y)`.
    pub fn intersect(&self, x: f64, y: f64, cfg: &RouterConfig) -> Option<RayHit> {
        let origin = Vec3::new(x, y, cfg.origin_z);
        let d = Vec3::new(x, y, cfg.direction_z).normalize();
        let t_vec = origin - self.v0;
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let p = d.cross(e2);
        let q = t_vec.cross(e1);
        let det = p.dot(e1);
        if det.abs() < cfg.epsilon {
            return None;
        }
        match cfg.cull_face {
            FaceCulling::Front if det < 0.0 => return None,
            FaceCulling::Back if det > 0.0 => return None,
            _ => {}
        }
        let u = p.dot(t_vec) / det;
        let v = q.dot(d) / det;
        let t = q.dot(e2) / det;
        if u < 0.0 || v < 0.0 || u + v > 1.0 {
            return None;
        }
        Some(RayHit {
            u,
            v,
            t,
            point: origin + d.scale(t),
        })
    }
}

/// Two triangles covering one screen-space quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrianglePair {
    pub first: Triangle,
    pub second: Triangle,
}

impl TrianglePair {
    /// Split quad `p0 p1 p2 p3` into `(p1, p2, p0)` and `(p3, p0, p2)`.
    ///
    /// With the quad corners at `(0,0) (0,h) (w,h) (w,0)` the barycentrics of both halves then
    /// read as texture-like coordinates over the whole quad.
    pub fn from_quad(p: [Vec3; 4]) -> Self {
        Self {
            first: Triangle::new(p[1], p[2], p[0]),
            second: Triangle::new(p[3], p[0], p[2]),
        }
    }

    /// Test the first triangle, then the second with mirrored barycentrics.
    pub fn intersect(&self, x: f64, y: f64, cfg: &RouterConfig) -> Option<RayHit> {
        if let Some(hit) = self.first.intersect(x, y, cfg) {
            return Some(hit);
        }
        self.second.intersect(x, y, cfg).map(|hit| RayHit {
            u: 1.0 - hit.u,
            v: 1.0 - hit.v,
            ..hit
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/geometry.rs"]
mod tests;
