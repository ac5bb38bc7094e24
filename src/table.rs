//! egui adapter: renders a model-backed grid and wires it to the resize
//! controller.
//!
//! The grid's geometry doubles as the rendered view tree: column boundaries
//! are hit-tested as resize handles, egui input is translated into
//! [`PointerEvent`]s, and the guide line is painted during a drag.

use egui::{CursorIcon, Id, Pos2, Rect, Sense, Ui, pos2, vec2};

use crate::controller::{PointerEvent, ResizeController};
use crate::gate::SelectionGate;
use crate::model::{NodeKind, ResizeError, TableModel};
use crate::propagate::rendered_column_widths;
use crate::view::{ElementKind, ViewTree};

// ----------------------------------------------------------------------------

/// Rendered elements of one grid frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridElement {
    Table,
    Cell { row: usize, col: usize },
    /// The draggable strip on the right boundary of column `col`.
    Handle { col: usize },
}

/// Per-frame geometry of the rendered grid, implementing [`ViewTree`].
///
/// Built from the model before any mutation so it holds plain copies of the
/// cell node handles rather than a borrow of the model.
pub struct GridView<N> {
    table_rect: Rect,
    col_widths: Vec<f32>,
    row_height: f32,
    grab_radius: f32,
    cell_nodes: Vec<Vec<N>>,
}

impl<N: Copy> GridView<N> {
    fn rows(&self) -> usize {
        self.cell_nodes.len()
    }

    fn cols(&self) -> usize {
        self.col_widths.len()
    }

    /// x of the boundary on the right edge of `col`.
    fn boundary_x(&self, col: usize) -> f32 {
        self.table_rect.left() + self.col_widths[..=col].iter().sum::<f32>()
    }

    /// On-screen rectangle of one cell.
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let x = self.table_rect.left() + self.col_widths[..col].iter().sum::<f32>();
        let y = self.table_rect.top() + row as f32 * self.row_height;
        Rect::from_min_size(pos2(x, y), vec2(self.col_widths[col], self.row_height))
    }

    fn handle_rect(&self, col: usize) -> Rect {
        let x = self.boundary_x(col);
        Rect::from_min_max(
            pos2(x, self.table_rect.top()),
            pos2(x, self.table_rect.bottom()),
        )
        .expand2(vec2(self.grab_radius, 0.0))
    }

    /// Deepest element under `pos`. Handles overlay the cell edges they sit
    /// on, so they win the hit test.
    pub fn hit(&self, pos: Pos2) -> Option<GridElement> {
        for col in 0..self.cols() {
            if self.handle_rect(col).contains(pos) {
                return Some(GridElement::Handle { col });
            }
        }
        if !self.table_rect.contains(pos) {
            return None;
        }
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if self.cell_rect(row, col).contains(pos) {
                    return Some(GridElement::Cell { row, col });
                }
            }
        }
        Some(GridElement::Table)
    }
}

impl<N: Copy> ViewTree for GridView<N> {
    type Element = GridElement;
    type ModelNode = N;

    fn parent(&self, element: GridElement) -> Option<GridElement> {
        match element {
            // A handle spans the whole column boundary; its anchor cell is
            // the row-0 cell, whose horizontal geometry every row shares.
            GridElement::Handle { col } => Some(GridElement::Cell { row: 0, col }),
            GridElement::Cell { .. } => Some(GridElement::Table),
            GridElement::Table => None,
        }
    }

    fn kind(&self, element: GridElement) -> ElementKind {
        match element {
            GridElement::Handle { .. } => ElementKind::ResizeHandle,
            GridElement::Cell { .. } => ElementKind::Cell,
            GridElement::Table => ElementKind::Table,
        }
    }

    fn bounding_rect(&self, element: GridElement) -> Rect {
        match element {
            GridElement::Table => self.table_rect,
            GridElement::Cell { row, col } => self.cell_rect(row, col),
            GridElement::Handle { col } => self.handle_rect(col),
        }
    }

    fn model_cell(&self, element: GridElement) -> Option<N> {
        match element {
            GridElement::Cell { row, col } => self.cell_nodes.get(row)?.get(col).copied(),
            GridElement::Handle { .. } | GridElement::Table => None,
        }
    }
}

// ----------------------------------------------------------------------------

/// What [`ResizableGrid::show`] hands back.
pub struct GridOutput {
    /// Where the grid was placed.
    pub rect: Rect,

    /// The currently selected cell, if cell selection is on.
    pub selected: Option<(usize, usize)>,
}

/// Builder for a resizable grid bound to a document-model table.
///
/// If you show multiple grids in the same [`Ui`] give them unique ids with
/// [`Self::id_salt`].
///
/// ### Example
/// ```
/// # egui::__run_test_ui(|ui| {
/// use egui_table_resize::{ResizableGrid, ResizeConfig, ResizeController, SharedGate, TableTree};
///
/// let (mut tree, table) = TableTree::grid(2, 3);
/// let gate = SharedGate::new();
/// let mut controller = ResizeController::new(ResizeConfig::default(), gate.clone());
///
/// ResizableGrid::new(table)
///     .row_height(22.0)
///     .show(ui, &mut tree, &mut controller, |ui, row, col| {
///         ui.label(format!("r{row}c{col}"));
///     });
/// # });
/// ```
pub struct ResizableGrid<N> {
    table: N,
    id_salt: Id,
    row_height: f32,
    default_col_width: f32,
    grab_radius: f32,
    select_cells: bool,
}

impl<N: Copy + PartialEq + std::fmt::Debug> ResizableGrid<N> {
    pub fn new(table: N) -> Self {
        Self {
            table,
            id_salt: Id::new("__resizable_grid"),
            row_height: 20.0,
            default_col_width: 100.0,
            grab_radius: 5.0,
            select_cells: true,
        }
    }

    /// Give this grid a unique id within the parent [`Ui`].
    #[inline]
    pub fn id_salt(mut self, id_salt: impl std::hash::Hash) -> Self {
        self.id_salt = Id::new(id_salt);
        self
    }

    /// Height of every row (default: 20.0).
    #[inline]
    pub fn row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }

    /// Rendered width of a cell without a `width` attribute (default: 100.0).
    #[inline]
    pub fn default_col_width(mut self, width: f32) -> Self {
        self.default_col_width = width;
        self
    }

    /// How far from a column boundary the resize handle extends
    /// (default: 5.0).
    #[inline]
    pub fn grab_radius(mut self, radius: f32) -> Self {
        self.grab_radius = radius;
        self
    }

    /// Let clicks select a cell (default: `true`). Selection is suppressed
    /// while the gate is disabled, i.e. during a resize drag.
    #[inline]
    pub fn select_cells(mut self, select: bool) -> Self {
        self.select_cells = select;
        self
    }

    /// Render the grid, drive the controller with this frame's pointer
    /// input, and paint the guide line if a drag is in progress.
    #[profiling::function]
    pub fn show<M, G>(
        self,
        ui: &mut Ui,
        model: &mut M,
        controller: &mut ResizeController<GridElement, G>,
        mut cell_ui: impl FnMut(&mut Ui, usize, usize),
    ) -> GridOutput
    where
        M: TableModel<Node = N>,
        G: SelectionGate,
    {
        let state_id = ui.id().with(self.id_salt);

        let col_widths = rendered_column_widths(model, self.table, self.default_col_width);
        let cell_nodes: Vec<Vec<N>> = (0..model.child_count(self.table))
            .filter_map(|i| model.child(self.table, i))
            .filter(|&row| model.kind(row) == NodeKind::Row)
            .map(|row| {
                (0..model.child_count(row))
                    .filter_map(|i| model.child(row, i))
                    .collect()
            })
            .collect();
        let rows = cell_nodes.len();

        let desired = vec2(
            col_widths.iter().sum::<f32>(),
            rows as f32 * self.row_height,
        );
        let table_rect = Rect::from_min_size(ui.cursor().min, desired);
        ui.allocate_rect(table_rect, Sense::hover());

        let view = GridView {
            table_rect,
            col_widths,
            row_height: self.row_height,
            grab_radius: self.grab_radius,
            cell_nodes,
        };

        let (pointer_pos, pressed, released, clicked, any_down, time) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_clicked(),
                i.pointer.any_down(),
                i.time,
            )
        });
        let hovered = pointer_pos.and_then(|pos| view.hit(pos));
        let resizing_at_frame_start = controller.is_resizing();

        let last_x_id = state_id.with("__last_pointer_x");
        let last_x = ui
            .data(|d| d.get_temp::<f32>(last_x_id))
            .unwrap_or(table_rect.left());

        fn report(result: Result<(), ResizeError>) {
            if let Err(err) = result {
                log::warn!("table resize failed: {err}");
            }
        }

        if pressed
            && let Some(pos) = pointer_pos
            && let Some(target @ GridElement::Handle { .. }) = view.hit(pos)
        {
            report(controller.handle_event(
                &view,
                model,
                PointerEvent::Down { target, x: pos.x },
                time,
            ));
        }

        if controller.is_resizing() {
            let fallback_x = controller.last_pointer_x().unwrap_or(last_x);
            if released {
                let x = pointer_pos.map_or(fallback_x, |p| p.x);
                report(controller.handle_event(&view, model, PointerEvent::Up { x }, time));
            } else if let Some(pos) = pointer_pos {
                if pos.x != last_x {
                    report(controller.handle_event(
                        &view,
                        model,
                        PointerEvent::Move { x: pos.x },
                        time,
                    ));
                }
            } else {
                // The pointer left the surface without a release event.
                report(controller.handle_event(
                    &view,
                    model,
                    PointerEvent::Leave { x: fallback_x },
                    time,
                ));
            }
            controller.tick(time);
        }

        if let Some(pos) = pointer_pos {
            ui.data_mut(|d| d.insert_temp(last_x_id, pos.x));
        }

        // Cell selection, gated off while a drag owns the pointer.
        let selected_id = state_id.with("__selected_cell");
        let mut selected = ui.data(|d| d.get_temp::<(usize, usize)>(selected_id));
        // `resizing_at_frame_start` keeps the click that ended a drag from
        // doubling as a selection click.
        if self.select_cells
            && clicked
            && controller.gate().is_enabled()
            && !controller.is_resizing()
            && !resizing_at_frame_start
            && let Some(GridElement::Cell { row, col }) = hovered
        {
            selected = Some((row, col));
            ui.data_mut(|d| d.insert_temp(selected_id, (row, col)));
        }

        // --- painting ---
        let painter = ui
            .painter()
            .with_clip_rect(table_rect.expand(self.grab_radius));
        let grid_stroke = ui.visuals().widgets.noninteractive.bg_stroke;

        painter.line_segment([table_rect.left_top(), table_rect.left_bottom()], grid_stroke);
        for col in 0..view.cols() {
            let x = view.boundary_x(col);
            painter.line_segment(
                [pos2(x, table_rect.top()), pos2(x, table_rect.bottom())],
                grid_stroke,
            );
        }
        for row in 0..=rows {
            let y = table_rect.top() + row as f32 * self.row_height;
            painter.line_segment(
                [pos2(table_rect.left(), y), pos2(table_rect.right(), y)],
                grid_stroke,
            );
        }

        if let Some((row, col)) = selected
            && row < rows
            && col < view.cols()
        {
            painter.rect_stroke(
                view.cell_rect(row, col),
                egui::CornerRadius::ZERO,
                ui.visuals().selection.stroke,
                egui::StrokeKind::Inside,
            );
        }

        for row in 0..rows {
            for col in 0..view.cell_nodes[row].len().min(view.cols()) {
                let rect = view.cell_rect(row, col).shrink(2.0);
                let mut child = ui.new_child(
                    egui::UiBuilder::new()
                        .max_rect(rect)
                        .layout(egui::Layout::left_to_right(egui::Align::Center)),
                );
                cell_ui(&mut child, row, col);
            }
        }

        if let Some(offset) = controller.guide().offset() {
            let x = table_rect.left() + offset;
            painter.line_segment(
                [pos2(x, table_rect.top()), pos2(x, table_rect.bottom())],
                ui.visuals().widgets.active.bg_stroke,
            );
            ui.ctx().set_cursor_icon(CursorIcon::ResizeColumn);
            // Keep frames coming so a deferred guide move flushes on time.
            ui.ctx()
                .request_repaint_after(std::time::Duration::from_millis(10));
        } else if matches!(hovered, Some(GridElement::Handle { .. })) && !any_down {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeColumn);
        }

        GridOutput {
            rect: table_rect,
            selected,
        }
    }
}

// ----------------------------------------------------------------------------
