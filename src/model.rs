//! Document-model boundary for table cell resizing.
//!
//! The resize machinery never owns the rich-text document. It reaches it
//! through [`TableModel`], which exposes just enough of the node tree to
//! locate a cell's row and table and to write the `width` attribute through
//! the host's transactional change API.

use std::fmt;

/// Node classification within the document-model tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Table,
    Row,
    Cell,
    Other,
}

/// Things that can go wrong while resolving or resizing a column.
///
/// Each variant is a precondition violation: the model or view tree was not
/// shaped the way a well-formed table is. A failed resize writes nothing, so
/// the document keeps its prior widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    /// Walking parent links from the target never reached the named kind.
    #[error("no ancestor {0} above the target node")]
    AncestorNotFound(&'static str),

    /// The cell is not among its own row's children.
    #[error("cell not found among its row's children")]
    CellNotInRow,

    /// A row is too short to have a cell at the resized column.
    #[error("row {row} has no cell at column index {column}")]
    ColumnIndexOutOfRange { row: usize, column: usize },

    /// The rendered cell element has no counterpart in the document model.
    #[error("view element is not mapped to a model cell")]
    UnmappedCell,
}

/// Read/write access to the host's table document model.
///
/// Node handles are cheap copies; all traversal goes through the host so the
/// crate stays agnostic of how the tree is stored.
pub trait TableModel {
    /// Opaque handle to a node of the document tree.
    type Node: Copy + PartialEq + fmt::Debug;

    /// Parent of `node`, or `None` at the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Classification of `node`.
    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Number of children of `node`.
    fn child_count(&self, node: Self::Node) -> usize;

    /// Child of `node` at `index`, if any.
    fn child(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// Stored `width` attribute of a cell, e.g. `"130px"`.
    fn cell_width(&self, cell: Self::Node) -> Option<&str>;

    /// Set the `width` attribute on a cell.
    ///
    /// Each call must be applied as one atomic change transaction in the
    /// host's document model. A column update is a sequence of independent
    /// transactions, one per cell.
    fn set_cell_width(&mut self, cell: Self::Node, width: &str);
}

/// Nearest ancestor of `start` with the given kind, walking parent links
/// iteratively. `start` itself is not considered.
pub fn ancestor_of_kind<M: TableModel>(
    model: &M,
    start: M::Node,
    kind: NodeKind,
) -> Option<M::Node> {
    let mut node = model.parent(start);
    while let Some(n) = node {
        if model.kind(n) == kind {
            return Some(n);
        }
        node = model.parent(n);
    }
    None
}

/// Ordinal position of `child` among `parent`'s children.
pub(crate) fn child_index<M: TableModel>(
    model: &M,
    parent: M::Node,
    child: M::Node,
) -> Option<usize> {
    (0..model.child_count(parent)).find(|&i| model.child(parent, i) == Some(child))
}

/// Serialize a pixel width the way the document schema stores it: `"130px"`.
pub fn format_px(width: f32) -> String {
    format!("{width}px")
}

/// Parse a stored `"130px"` attribute back into pixels.
pub fn parse_px(value: &str) -> Option<f32> {
    value.strip_suffix("px")?.trim().parse().ok()
}

// ----------------------------------------------------------------------------

/// Handle into a [`TableTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory table fragment implementing [`TableModel`].
///
/// Backs the bundled [`ResizableGrid`](crate::ResizableGrid) widget and the
/// test suite. Hosts embedding a real rich-text framework adapt their own
/// document model instead of using this one.
#[derive(Clone, Debug, Default)]
pub struct TableTree {
    nodes: Vec<NodeData>,
    /// Sparse: most cells never carry an explicit width.
    widths: ahash::HashMap<NodeId, String>,
}

impl TableTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, appending it to `parent`'s children.
    pub fn insert(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Build a table of `rows` × `cols` cells. Returns the tree and the
    /// table node.
    pub fn grid(rows: usize, cols: usize) -> (Self, NodeId) {
        let mut tree = Self::new();
        let table = tree.insert(NodeKind::Table, None);
        for _ in 0..rows {
            let row = tree.insert(NodeKind::Row, Some(table));
            for _ in 0..cols {
                tree.insert(NodeKind::Cell, Some(row));
            }
        }
        (tree, table)
    }

    /// Cell of `table` at (`row`, `col`), if present.
    pub fn cell(&self, table: NodeId, row: usize, col: usize) -> Option<NodeId> {
        let row = self.child(table, row)?;
        self.child(row, col)
    }
}

impl TableModel for TableTree {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.0].kind
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.nodes[node.0].children.len()
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[node.0].children.get(index).copied()
    }

    fn cell_width(&self, cell: NodeId) -> Option<&str> {
        self.widths.get(&cell).map(String::as_str)
    }

    fn set_cell_width(&mut self, cell: NodeId, width: &str) {
        self.widths.insert(cell, width.to_owned());
    }
}

// ----------------------------------------------------------------------------
