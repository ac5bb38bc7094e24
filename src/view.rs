//! Rendered-view boundary: hit targets, geometry and the view→model mapping.

use egui::Rect;

/// Classification of rendered elements the resize interaction cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// The interactive strip on a column boundary that starts a drag.
    ResizeHandle,
    Cell,
    Table,
    Other,
}

/// Read-only view of the rendered tree.
///
/// The controller uses this to climb from a resize handle to its cell and
/// table, to read their on-screen geometry, and to map a rendered cell back
/// to the document-model node it displays.
pub trait ViewTree {
    /// Opaque handle to a rendered element.
    type Element: Copy + PartialEq;

    /// Node handle of the backing document model.
    type ModelNode: Copy;

    /// Parent of `element`, or `None` at the root.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Classification of `element`.
    fn kind(&self, element: Self::Element) -> ElementKind;

    /// Bounding box of `element` in view coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// The model cell rendered by `element`, if it renders one.
    fn model_cell(&self, element: Self::Element) -> Option<Self::ModelNode>;
}

/// Nearest ancestor of `start` with the given kind, walking parent links
/// iteratively. `start` itself is not considered.
pub fn ancestor_element<V: ViewTree>(
    view: &V,
    start: V::Element,
    kind: ElementKind,
) -> Option<V::Element> {
    let mut element = view.parent(start);
    while let Some(el) = element {
        if view.kind(el) == kind {
            return Some(el);
        }
        element = view.parent(el);
    }
    None
}
