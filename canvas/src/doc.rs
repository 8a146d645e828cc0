//! Document model: the room's ordered shape list.
//!
//! Insertion order is z-order: index 0 is drawn first and is the bottom of the
//! stack. Shapes are never edited in place; they arrive through local gestures
//! or remote broadcasts and leave by id, by index (local erase), or by a full
//! clear. Ids are unique within the list, so a shape echoed back by the
//! network or replayed by the history bootstrap is only stored once.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use frames::{Shape, ShapeId};

/// Ordered, id-deduplicated list of the shapes on the canvas.
#[derive(Debug, Clone, Default)]
pub struct ShapeList {
    shapes: Vec<Shape>,
}

impl ShapeList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of the stack. Returns `false` without changing
    /// the list when a shape with the same id is already present. Eraser
    /// markers are never stored.
    pub fn push(&mut self, shape: Shape) -> bool {
        if shape.is_marker() || self.contains(&shape.shape_id) {
            return false;
        }
        self.shapes.push(shape);
        true
    }

    /// Remove the shape at `index`, returning it if the index was in range.
    pub fn remove_at(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Remove the shape with `id`, returning it if it was present.
    pub fn remove_by_id(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.position(id)?;
        Some(self.shapes.remove(index))
    }

    /// Drop every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace the contents with `shapes`, keeping the first occurrence of
    /// each id and skipping markers.
    pub fn load(&mut self, shapes: Vec<Shape>) {
        self.shapes.clear();
        for shape in shapes {
            self.push(shape);
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn position(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.shape_id == id)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// All shapes, bottom first.
    #[must_use]
    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ShapeList {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
