//! Drag-resize interaction: a two-state machine driven by pointer events.
//!
//! `idle --(pointer-down on a resize handle)--> resizing`: the host's
//! cell-selection mode is gated off, the target cell's geometry is captured
//! and the guide line appears at the cell's right edge.
//!
//! `resizing --(pointer-move)--> resizing`: the guide line follows the
//! pointer, clamped to a minimum offset; updates are coalesced.
//!
//! `resizing --(pointer-up / pointer-leave)--> idle`: the guide line hides,
//! the width delta is computed and fanned out across the column, and the
//! selection mode comes back.

use egui::{NumExt as _, Rect};

use crate::gate::SelectionGate;
use crate::model::{ResizeError, TableModel};
use crate::propagate::{MIN_CELL_WIDTH, apply_column_width};
use crate::throttle::MoveCoalescer;
use crate::view::{ElementKind, ViewTree, ancestor_element};

/// Tuning for the drag interaction.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ResizeConfig {
    /// Narrowest a column may get, in pixels.
    pub min_width: f32,

    /// Minimum spacing between guide-line updates during a move burst,
    /// in seconds.
    pub move_interval: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_width: MIN_CELL_WIDTH,
            move_interval: 0.010,
        }
    }
}

/// A pointer event delivered by the host view, in view coordinates.
///
/// For one drag the host delivers `Down` before any `Move`, and a single
/// terminating `Up` or `Leave` last; the controller relies on that order.
#[derive(Clone, Copy, Debug)]
pub enum PointerEvent<E> {
    /// Primary button pressed on `target`.
    Down { target: E, x: f32 },

    /// Pointer moved while the button is held.
    Move { x: f32 },

    /// Primary button released.
    Up { x: f32 },

    /// The pointer left the tracking surface. Commits exactly like `Up`;
    /// there is no abort-without-applying gesture.
    Leave { x: f32 },
}

/// Everything captured at pointer-down and held until release.
#[derive(Clone, Copy, Debug)]
struct DragSession<E> {
    /// The rendered cell whose right edge is being dragged.
    cell: E,

    /// The cell's bounding box at drag start.
    cell_rect: Rect,

    /// Horizontal origin of the enclosing table, in view coordinates.
    table_left: f32,

    /// Pointer x at the initiating pointer-down.
    start_x: f32,

    /// Most recent pointer x seen during the session.
    last_x: f32,
}

/// The transient column-boundary indicator shown during a drag.
///
/// Offsets are relative to the table's left edge and never drop below the
/// minimum recorded when the guide appeared.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GuideLine {
    visible: bool,
    x: f32,
    min_x: f32,
}

impl GuideLine {
    fn show_at(&mut self, x: f32, min_x: f32) {
        self.min_x = min_x;
        self.x = x.at_least(min_x);
        self.visible = true;
    }

    fn move_to(&mut self, x: f32) {
        self.x = x.at_least(self.min_x);
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    /// Offset from the table's left edge, while the guide is visible.
    pub fn offset(&self) -> Option<f32> {
        self.visible.then_some(self.x)
    }
}

/// The finite-state interaction handler for one resize gesture at a time.
///
/// `E` is the host view's element handle; `G` is the capability that gates
/// the competing cell-selection input mode.
pub struct ResizeController<E, G> {
    config: ResizeConfig,
    gate: G,
    session: Option<DragSession<E>>,
    guide: GuideLine,
    coalescer: MoveCoalescer,
}

impl<E: Copy + PartialEq, G: SelectionGate> ResizeController<E, G> {
    pub fn new(config: ResizeConfig, gate: G) -> Self {
        let coalescer = MoveCoalescer::new(config.move_interval);
        Self {
            config,
            gate,
            session: None,
            guide: GuideLine::default(),
            coalescer,
        }
    }

    /// Is a drag session currently active?
    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    /// The guide-line state, for the host to paint.
    pub fn guide(&self) -> &GuideLine {
        &self.guide
    }

    /// The selection gate handed in at construction.
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Most recent pointer x seen during the active session, if any.
    ///
    /// Hosts use this as the terminating coordinate when the pointer
    /// disappears without one (e.g. a release reported off-surface).
    pub fn last_pointer_x(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.last_x)
    }

    /// Feed one pointer event. `now` is the host clock in seconds.
    ///
    /// Events that do not concern an active or starting drag are ignored.
    pub fn handle_event<V, M>(
        &mut self,
        view: &V,
        model: &mut M,
        event: PointerEvent<E>,
        now: f64,
    ) -> Result<(), ResizeError>
    where
        V: ViewTree<Element = E>,
        M: TableModel<Node = V::ModelNode>,
    {
        match event {
            PointerEvent::Down { target, x } => self.begin(view, target, x),
            PointerEvent::Move { x } => {
                self.moved(x, now);
                Ok(())
            }
            PointerEvent::Up { x } | PointerEvent::Leave { x } => self.finish(view, model, x),
        }
    }

    /// Release a coalesced guide-line update whose interval has elapsed.
    ///
    /// Hosts call this once per frame (or on a timer) while a drag is active.
    pub fn tick(&mut self, now: f64) {
        if self.session.is_some()
            && let Some(offset) = self.coalescer.tick(now)
        {
            self.guide.move_to(offset);
        }
    }

    fn begin<V>(&mut self, view: &V, target: E, x: f32) -> Result<(), ResizeError>
    where
        V: ViewTree<Element = E>,
    {
        if view.kind(target) != ElementKind::ResizeHandle {
            return Ok(());
        }
        if self.session.is_some() {
            // A press mid-drag means the release event got lost somewhere;
            // keep the session we have.
            log::warn!("pointer-down while a resize drag is active; ignored");
            return Ok(());
        }

        let cell = ancestor_element(view, target, ElementKind::Cell)
            .ok_or(ResizeError::AncestorNotFound("cell element"))?;
        let table = ancestor_element(view, cell, ElementKind::Table)
            .ok_or(ResizeError::AncestorNotFound("table element"))?;

        let cell_rect = view.bounding_rect(cell);
        let table_left = view.bounding_rect(table).left();

        self.gate.disable();
        self.coalescer.reset();

        let min_x = cell_rect.left() - table_left + self.config.min_width;
        self.guide
            .show_at(cell_rect.left() - table_left + cell_rect.width() - 1.0, min_x);

        self.session = Some(DragSession {
            cell,
            cell_rect,
            table_left,
            start_x: x,
            last_x: x,
        });
        log::trace!("resize drag started at x={x}");
        Ok(())
    }

    fn moved(&mut self, x: f32, now: f64) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.last_x = x;
        let offset = x - session.table_left;
        if let Some(offset) = self.coalescer.offer(offset, now) {
            self.guide.move_to(offset);
        }
    }

    fn finish<V, M>(&mut self, view: &V, model: &mut M, x: f32) -> Result<(), ResizeError>
    where
        V: ViewTree<Element = E>,
        M: TableModel<Node = V::ModelNode>,
    {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        self.coalescer.reset();
        self.guide.hide();

        // The terminating event always wins over any throttled move.
        let distance = x - session.start_x;
        let result = if distance != 0.0 {
            let new_width = (session.cell_rect.width() + distance).at_least(self.config.min_width);
            view.model_cell(session.cell)
                .ok_or(ResizeError::UnmappedCell)
                .and_then(|cell| apply_column_width(model, cell, new_width))
        } else {
            Ok(())
        };

        // Selection comes back even when the write failed.
        self.gate.enable();
        log::trace!("resize drag finished, distance={distance}");
        result
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeId, TableTree};
    use egui::{pos2, vec2};

    /// A fixed little view tree: a handle inside a cell inside a table.
    /// The cell spans x 20..100 (width 80) and the table starts at x 10,
    /// so the guide's minimum offset is 20 - 10 + 28 = 38.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum El {
        Handle,
        Cell,
        Table,
    }

    struct FixedView {
        /// Model cell behind `El::Cell`; `None` simulates a broken mapping.
        mapped: Option<NodeId>,
    }

    impl ViewTree for FixedView {
        type Element = El;
        type ModelNode = NodeId;

        fn parent(&self, element: El) -> Option<El> {
            match element {
                El::Handle => Some(El::Cell),
                El::Cell => Some(El::Table),
                El::Table => None,
            }
        }

        fn kind(&self, element: El) -> ElementKind {
            match element {
                El::Handle => ElementKind::ResizeHandle,
                El::Cell => ElementKind::Cell,
                El::Table => ElementKind::Table,
            }
        }

        fn bounding_rect(&self, element: El) -> Rect {
            match element {
                El::Handle => Rect::from_min_size(pos2(97.0, 0.0), vec2(6.0, 24.0)),
                El::Cell => Rect::from_min_size(pos2(20.0, 0.0), vec2(80.0, 24.0)),
                El::Table => Rect::from_min_size(pos2(10.0, 0.0), vec2(300.0, 72.0)),
            }
        }

        fn model_cell(&self, element: El) -> Option<NodeId> {
            (element == El::Cell).then_some(self.mapped).flatten()
        }
    }

    #[derive(Default)]
    struct RecordingGate {
        enabled_after_disable: bool,
        disables: usize,
        enables: usize,
    }

    impl SelectionGate for RecordingGate {
        fn disable(&mut self) {
            self.disables += 1;
            self.enabled_after_disable = false;
        }

        fn enable(&mut self) {
            self.enables += 1;
            self.enabled_after_disable = true;
        }

        fn is_enabled(&self) -> bool {
            self.disables == 0 || self.enabled_after_disable
        }
    }

    fn setup() -> (TableTree, NodeId, FixedView, ResizeController<El, RecordingGate>) {
        let (tree, table) = TableTree::grid(3, 3);
        let view = FixedView {
            mapped: tree.cell(table, 0, 1),
        };
        let controller = ResizeController::new(ResizeConfig::default(), RecordingGate::default());
        (tree, table, view, controller)
    }

    fn widths_of_column(tree: &TableTree, table: NodeId, col: usize) -> Vec<Option<String>> {
        (0..3)
            .map(|row| {
                tree.cell(table, row, col)
                    .and_then(|cell| tree.cell_width(cell))
                    .map(str::to_owned)
            })
            .collect()
    }

    #[test]
    fn drag_right_widens_the_whole_column() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        assert!(controller.is_resizing());
        assert!(!controller.gate().is_enabled());

        controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 150.0 }, 0.1)
            .unwrap();

        // 80 px rendered width + 50 px of drag.
        assert_eq!(
            widths_of_column(&tree, table, 1),
            vec![Some("130px".to_owned()); 3]
        );
        assert!(!controller.is_resizing());
        assert!(controller.gate().is_enabled());
        assert_eq!(controller.guide().offset(), None);
    }

    #[test]
    fn drag_left_clamps_to_minimum_width() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        // 80 - 60 = 20 px, below the 28 px floor.
        controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 40.0 }, 0.1)
            .unwrap();

        assert_eq!(
            widths_of_column(&tree, table, 1),
            vec![Some("28px".to_owned()); 3]
        );
    }

    #[test]
    fn zero_distance_mutates_nothing() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 100.0 }, 0.1)
            .unwrap();

        assert_eq!(widths_of_column(&tree, table, 1), vec![None, None, None]);
        assert_eq!(controller.guide().offset(), None);
        assert!(controller.gate().is_enabled());
    }

    #[test]
    fn leave_commits_like_up() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Leave { x: 120.0 }, 0.1)
            .unwrap();

        assert_eq!(
            widths_of_column(&tree, table, 1),
            vec![Some("100px".to_owned()); 3]
        );
        assert!(controller.gate().is_enabled());
    }

    #[test]
    fn guide_starts_at_the_cell_right_edge() {
        let (mut tree, _table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        // cell.left - table.left + cell.width - 1 = 20 - 10 + 80 - 1.
        assert_eq!(controller.guide().offset(), Some(89.0));
    }

    #[test]
    fn guide_never_drops_below_the_minimum_offset() {
        let (mut tree, _table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Move { x: 0.0 }, 0.05)
            .unwrap();

        // cell.left - table.left + MIN_CELL_WIDTH = 20 - 10 + 28.
        assert_eq!(controller.guide().offset(), Some(38.0));
    }

    #[test]
    fn move_burst_is_throttled_but_release_is_exact() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();

        // First move applies, the rest of the burst is deferred.
        controller
            .handle_event(&view, &mut tree, PointerEvent::Move { x: 110.0 }, 0.020)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Move { x: 120.0 }, 0.021)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Move { x: 130.0 }, 0.022)
            .unwrap();
        assert_eq!(controller.guide().offset(), Some(100.0));

        // Too early, then late enough: the newest deferred move lands.
        controller.tick(0.025);
        assert_eq!(controller.guide().offset(), Some(100.0));
        controller.tick(0.031);
        assert_eq!(controller.guide().offset(), Some(120.0));

        // The release position is honored exactly, throttling or not.
        controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 141.0 }, 0.032)
            .unwrap();
        assert_eq!(
            widths_of_column(&tree, table, 1),
            vec![Some("121px".to_owned()); 3]
        );
    }

    #[test]
    fn down_mid_drag_is_ignored() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        // A second press must not restart the session at a new origin.
        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 300.0 }, 0.01)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 150.0 }, 0.1)
            .unwrap();

        assert_eq!(
            widths_of_column(&tree, table, 1),
            vec![Some("130px".to_owned()); 3]
        );
    }

    #[test]
    fn down_elsewhere_is_not_a_drag() {
        let (mut tree, _table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Cell, x: 50.0 }, 0.0)
            .unwrap();
        assert!(!controller.is_resizing());
        assert!(controller.gate().is_enabled());
    }

    #[test]
    fn unmapped_cell_fails_but_reenables_selection() {
        let (mut tree, table, _, mut controller) = setup();
        let view = FixedView { mapped: None };

        controller
            .handle_event(&view, &mut tree, PointerEvent::Down { target: El::Handle, x: 100.0 }, 0.0)
            .unwrap();
        let err = controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 150.0 }, 0.1)
            .unwrap_err();

        assert_eq!(err, ResizeError::UnmappedCell);
        assert_eq!(widths_of_column(&tree, table, 1), vec![None, None, None]);
        assert!(controller.gate().is_enabled());
        assert!(!controller.is_resizing());
    }

    #[test]
    fn stray_move_and_up_while_idle_are_ignored() {
        let (mut tree, table, view, mut controller) = setup();

        controller
            .handle_event(&view, &mut tree, PointerEvent::Move { x: 500.0 }, 0.0)
            .unwrap();
        controller
            .handle_event(&view, &mut tree, PointerEvent::Up { x: 500.0 }, 0.1)
            .unwrap();

        assert_eq!(widths_of_column(&tree, table, 1), vec![None, None, None]);
        assert_eq!(controller.guide().offset(), None);
    }
}
