//! Column width propagation across every row of a table.
//!
//! The document schema stores widths per cell, and a column renders as wide
//! as its widest cell. Writing only the dragged cell would let a stale wider
//! cell elsewhere in the column win, and deleting the dragged cell would lose
//! the column width entirely. A resize therefore fans out to the cell at the
//! same ordinal index in every row.

use crate::model::{NodeKind, ResizeError, TableModel, ancestor_of_kind, child_index, format_px, parse_px};

/// Narrowest a cell may get, in device-independent pixels.
///
/// Matches the host's default minimum cell sizing (2 em at a 14 px font).
pub const MIN_CELL_WIDTH: f32 = 28.0;

/// Apply `width` pixels to the whole column that `cell` belongs to.
///
/// The column index is the cell's ordinal position among its row's children;
/// the width is written (serialized as `"{n}px"`) to the cell at that index
/// in every row of the enclosing table, one change transaction per cell.
///
/// `width` must be positive; callers enforce [`MIN_CELL_WIDTH`]. Every target
/// cell is resolved before anything is written, so a malformed table (a row
/// shorter than the column index) fails without touching the document.
#[profiling::function]
pub fn apply_column_width<M: TableModel>(
    model: &mut M,
    cell: M::Node,
    width: f32,
) -> Result<(), ResizeError> {
    let row = ancestor_of_kind(model, cell, NodeKind::Row)
        .ok_or(ResizeError::AncestorNotFound("row"))?;
    let table = ancestor_of_kind(model, cell, NodeKind::Table)
        .ok_or(ResizeError::AncestorNotFound("table"))?;
    let column = child_index(model, row, cell).ok_or(ResizeError::CellNotInRow)?;

    let mut targets = Vec::with_capacity(model.child_count(table));
    for index in 0..model.child_count(table) {
        let Some(row_node) = model.child(table, index) else {
            break;
        };
        if model.kind(row_node) != NodeKind::Row {
            continue;
        }
        let target = model
            .child(row_node, column)
            .ok_or(ResizeError::ColumnIndexOutOfRange { row: index, column })?;
        targets.push(target);
    }

    let width = format_px(width);
    for target in targets {
        model.set_cell_width(target, &width);
    }
    Ok(())
}

/// Rendered width of each column of `table`: the max over its cells' stored
/// widths, where a cell without a `width` attribute counts as `default`.
pub fn rendered_column_widths<M: TableModel>(model: &M, table: M::Node, default: f32) -> Vec<f32> {
    let rows: Vec<M::Node> = (0..model.child_count(table))
        .filter_map(|i| model.child(table, i))
        .filter(|&row| model.kind(row) == NodeKind::Row)
        .collect();

    let columns = rows
        .iter()
        .map(|&row| model.child_count(row))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0.0_f32; columns];
    for &row in &rows {
        for col in 0..model.child_count(row) {
            let effective = model
                .child(row, col)
                .and_then(|cell| model.cell_width(cell))
                .and_then(parse_px)
                .unwrap_or(default);
            widths[col] = widths[col].max(effective);
        }
    }
    widths
}
