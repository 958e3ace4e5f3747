use crate::{
    mesh::vertex::{Color, Vertex},
    tolerance::Real,
};

impl Vertex {
    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Position, normal and texture coordinate follow `a + (b - a)·t`; the
    /// color is blended per channel with `t` clamped to [0, 1]. This is how
    /// intersection vertices are created when a polygon is split by a plane.
    pub fn lerp(&self, other: &Vertex, t: Real) -> Vertex {
        Vertex {
            pos: self.pos.lerp(other.pos, t),
            normal: self.normal.lerp(other.normal, t),
            uv: self.uv.lerp(other.uv, t),
            color: self.color.lerp(other.color, t),
        }
    }

    /// Blend three vertices with (possibly signed) barycentric weights.
    ///
    /// ```text
    /// n = a₁·n₁ + a₂·n₂ + a₃·n₃
    /// ```
    ///
    /// The position is taken from `v1`; callers overwrite it when they know
    /// where the sample lies. Normals are not re-normalized.
    pub fn barycentric_blend(v1: &Vertex, v2: &Vertex, v3: &Vertex, weights: [Real; 3]) -> Vertex {
        let [a1, a2, a3] = weights;
        Vertex {
            pos: v1.pos,
            normal: v1.normal * a1 + v2.normal * a2 + v3.normal * a3,
            uv: v1.uv * a1 + v2.uv * a2 + v3.uv * a3,
            color: Color::weighted([v1.color, v2.color, v3.color], weights),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::mesh::vertex::{Color, Vertex};
    use crate::tolerance::Real;
    use crate::vector::{Vector2, Vector3};

    fn create_vertices() -> [Vertex; 2] {
        [
            Vertex::new(Vector3::zeros(), Vector3::x()).with_uv(Vector2::zeros()),
            Vertex::new(Vector3::from_f64(2.0, 2.0, 2.0), Vector3::y())
                .with_uv(Vector2::from_f64(1.0, 1.0))
                .with_color(Color::BLACK),
        ]
    }

    #[test]
    fn linear() {
        let [v1, v2] = create_vertices();
        let mid = v1.lerp(&v2, Real::HALF);
        assert_eq!(mid.pos, Vector3::from_f64(1.0, 1.0, 1.0));
        assert_eq!(mid.normal, Vector3::from_f64(0.5, 0.5, 0.0));
        assert_eq!(mid.uv, Vector2::from_f64(0.5, 0.5));
        assert_eq!(mid.color, Color::new(128, 128, 128, 255));
    }

    #[test]
    fn barycentric() {
        let v1 = Vertex::new(Vector3::zeros(), Vector3::x());
        let v2 = Vertex::new(Vector3::x(), Vector3::y());
        let v3 = Vertex::new(Vector3::y(), Vector3::z());

        let blended = Vertex::barycentric_blend(&v1, &v2, &v3, [Real::HALF, Real::HALF, Real::ZERO]);
        assert_eq!(blended.normal, Vector3::from_f64(0.5, 0.5, 0.0));
        assert_eq!(blended.color, Color::WHITE);
    }
}
