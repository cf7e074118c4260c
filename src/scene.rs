//! The drawable set the renderer walks every frame.
//!
//! The scene does not own fireworks. It only records which drawables are
//! live and where they sit; the firework behind a [`DrawableId`] keeps its
//! own buffers and material.

use glam::Vec3;

/// Handle to an entry in the [`Scene`].
///
/// Ids are never reused within one scene, so a stale id simply misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(u64);

impl std::fmt::Display for DrawableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One live entry in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    /// Handle of this entry.
    pub id: DrawableId,
    /// World-space translation applied to the drawable.
    pub origin: Vec3,
}

/// Ordered set of live drawables. Draw order is attach order.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: Vec<Drawable>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable at `origin` and return its handle.
    pub fn attach(&mut self, origin: Vec3) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.drawables.push(Drawable { id, origin });
        id
    }

    /// Remove a drawable. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: DrawableId) -> bool {
        match self.drawables.iter().position(|d| d.id == id) {
            Some(index) => {
                self.drawables.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is currently attached.
    pub fn contains(&self, id: DrawableId) -> bool {
        self.drawables.iter().any(|d| d.id == id)
    }

    /// Look up a live drawable.
    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.id == id)
    }

    /// Number of live drawables.
    #[inline]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Whether nothing is attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Live drawables in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detach() {
        let mut scene = Scene::new();
        let a = scene.attach(Vec3::ZERO);
        let b = scene.attach(Vec3::X);
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);

        assert!(scene.detach(a));
        assert!(!scene.detach(a));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(b).map(|d| d.origin), Some(Vec3::X));
    }

    #[test]
    fn test_ids_not_reused() {
        let mut scene = Scene::new();
        let a = scene.attach(Vec3::ZERO);
        scene.detach(a);
        let b = scene.attach(Vec3::ZERO);
        assert_ne!(a, b);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
    }

    #[test]
    fn test_draw_order_is_attach_order() {
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..4).map(|i| scene.attach(Vec3::splat(i as f32))).collect();
        scene.detach(ids[1]);
        let order: Vec<_> = scene.iter().map(|d| d.id).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3]]);
    }
}
