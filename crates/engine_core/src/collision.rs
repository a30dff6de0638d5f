//! Point-collision seam between the tile store and the physics step.

/// Answers "is this world-space point inside something solid?".
pub trait SolidQuery {
    fn is_solid(&self, x: f32, y: f32) -> bool;
}

impl<T: SolidQuery + ?Sized> SolidQuery for &T {
    fn is_solid(&self, x: f32, y: f32) -> bool {
        (**self).is_solid(x, y)
    }
}
