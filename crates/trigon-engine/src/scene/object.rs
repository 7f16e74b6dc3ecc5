use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::render::Model;

pub type ObjectId = u32;

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// 2D placement: `mat2() * position + translation`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2d {
    pub translation: [f32; 2],
    /// Radians, counter-clockwise.
    pub rotation: f32,
    pub scale: [f32; 2],
}

impl Default for Transform2d {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

impl Transform2d {
    /// Rotation × scale, column-major (`[column0, column1]`).
    pub fn mat2(&self) -> [[f32; 2]; 2] {
        let (s, c) = self.rotation.sin_cos();
        let [sx, sy] = self.scale;
        [[c * sx, s * sx], [-s * sy, c * sy]]
    }
}

/// A drawable: shared geometry plus per-object color, opacity and placement.
///
/// Not `Clone`: every object keeps the unique id it was created with.
#[derive(Debug)]
pub struct GameObject {
    id: ObjectId,
    pub model: Option<Arc<Model>>,
    pub color: [f32; 3],
    pub alpha: f32,
    /// Layer in the scene's nesting order; 0 is the outermost.
    pub depth: i32,
    pub transform: Transform2d,
}

impl GameObject {
    /// Creates an object with a fresh, monotonically increasing id.
    pub fn new() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            model: None,
            color: [0.0; 3],
            alpha: 1.0,
            depth: 0,
            transform: Transform2d::default(),
        }
    }

    pub fn with_model(model: Arc<Model>) -> Self {
        Self {
            model: Some(model),
            ..Self::new()
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Default for GameObject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [[f32; 2]; 2], b: [[f32; 2]; 2]) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn ids_increase() {
        let a = GameObject::new();
        let b = GameObject::new();
        assert!(b.id() > a.id());
    }

    #[test]
    fn defaults() {
        let o = GameObject::new();
        assert!(o.model.is_none());
        assert_eq!(o.alpha, 1.0);
        assert_eq!(o.transform, Transform2d::default());
    }

    #[test]
    fn identity_mat2() {
        assert_eq!(Transform2d::default().mat2(), [[1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn quarter_turn_with_scale() {
        let t = Transform2d {
            rotation: std::f32::consts::FRAC_PI_2,
            scale: [2.0, 3.0],
            ..Transform2d::default()
        };
        // Rotation first column is (0, 1), second (-1, 0); scaled per column.
        assert!(approx(t.mat2(), [[0.0, 2.0], [-3.0, 0.0]]));
    }
}
