//! Drag-reorder logic for client logo rows and still grids.
//!
//! Pure index arithmetic over an owned sequence: the UI feeds discrete
//! pointer events in, the session hands the final order back exactly once
//! per completed gesture. Nothing here touches storage; persisting the
//! committed order is the caller's job.

/// Remove the element at `source` and reinsert it at `target`, shifting the
/// elements in between. Equal or out-of-bounds indices are a guarded no-op,
/// not an error.
pub fn move_item<T>(items: &mut Vec<T>, source: usize, target: usize) {
    if source == target || source >= items.len() || target >= items.len() {
        return;
    }
    let item = items.remove(source);
    items.insert(target, item);
}

/// One in-progress drag gesture.
///
/// Hover-driven moves update the displayed order only; durable state is
/// untouched until [`DragSession::drop_gesture`] commits.
#[derive(Debug)]
pub struct DragSession<T> {
    items: Vec<T>,
    drag_index: usize,
    moved: bool,
}

impl<T> DragSession<T> {
    /// Start a gesture. `None` when `drag_index` does not address an item.
    pub fn begin(items: Vec<T>, drag_index: usize) -> Option<Self> {
        if drag_index >= items.len() {
            return None;
        }
        Some(Self {
            items,
            drag_index,
            moved: false,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn drag_index(&self) -> usize {
        self.drag_index
    }

    /// Apply one pointer-move event.
    ///
    /// `hover_height` is `None` while the hovered element's geometry has not
    /// been measured yet; that case is a guarded no-op. A move commits only
    /// once the pointer crosses the hovered element's vertical midpoint in
    /// the direction of the drag, which keeps near-adjacent items from
    /// oscillating while the pointer sits between them.
    pub fn pointer_moved(
        &mut self,
        hover_index: usize,
        pointer_offset_y: f32,
        hover_height: Option<f32>,
    ) {
        let Some(height) = hover_height else {
            return;
        };
        if hover_index >= self.items.len() || hover_index == self.drag_index {
            return;
        }

        let midpoint = height / 2.0;
        // Dragging down: only move once the pointer is past the midpoint.
        if self.drag_index < hover_index && pointer_offset_y < midpoint {
            return;
        }
        // Dragging up: only move once the pointer is above the midpoint.
        if self.drag_index > hover_index && pointer_offset_y > midpoint {
            return;
        }

        move_item(&mut self.items, self.drag_index, hover_index);
        self.drag_index = hover_index;
        self.moved = true;
    }

    /// Complete the gesture. Consuming the session means the commit can fire
    /// at most once; `None` means the order never changed and there is
    /// nothing to persist.
    pub fn drop_gesture(self) -> Option<Vec<T>> {
        if self.moved {
            Some(self.items)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_then_inverse_move_restores_order() {
        let original = vec!["a", "b", "c", "d", "e"];
        for source in 0..original.len() {
            for target in 0..original.len() {
                let mut items = original.clone();
                move_item(&mut items, source, target);
                move_item(&mut items, target, source);
                assert_eq!(items, original, "source={} target={}", source, target);
            }
        }
    }

    #[test]
    fn move_to_same_index_is_noop() {
        let mut items = vec![1, 2, 3];
        for i in 0..items.len() {
            move_item(&mut items, i, i);
            assert_eq!(items, vec![1, 2, 3]);
        }
    }

    #[test]
    fn out_of_bounds_move_is_noop() {
        let mut items = vec![1, 2, 3];
        move_item(&mut items, 7, 0);
        move_item(&mut items, 0, 7);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn move_shifts_intervening_elements() {
        let mut items = vec!["a", "b", "c", "d"];
        move_item(&mut items, 0, 2);
        assert_eq!(items, vec!["b", "c", "a", "d"]);
        let mut items = vec!["a", "b", "c", "d"];
        move_item(&mut items, 3, 1);
        assert_eq!(items, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn begin_rejects_out_of_bounds_drag_index() {
        assert!(DragSession::begin(vec![1, 2], 2).is_none());
    }

    #[test]
    fn hover_without_geometry_is_noop() {
        let mut session = DragSession::begin(vec!["a", "b"], 0).unwrap();
        session.pointer_moved(1, 40.0, None);
        assert_eq!(session.items(), ["a", "b"]);
        assert!(session.drop_gesture().is_none());
    }

    #[test]
    fn dragging_down_waits_for_midpoint() {
        let mut session = DragSession::begin(vec!["a", "b"], 0).unwrap();
        // Above the midpoint of a 40px row: no move yet.
        session.pointer_moved(1, 10.0, Some(40.0));
        assert_eq!(session.items(), ["a", "b"]);
        // Past the midpoint: the move lands and the drag index follows.
        session.pointer_moved(1, 30.0, Some(40.0));
        assert_eq!(session.items(), ["b", "a"]);
        assert_eq!(session.drag_index(), 1);
    }

    #[test]
    fn dragging_up_waits_for_midpoint() {
        let mut session = DragSession::begin(vec!["a", "b", "c"], 2).unwrap();
        session.pointer_moved(0, 30.0, Some(40.0));
        assert_eq!(session.items(), ["a", "b", "c"]);
        session.pointer_moved(0, 10.0, Some(40.0));
        assert_eq!(session.items(), ["c", "a", "b"]);
        assert_eq!(session.drag_index(), 0);
    }

    #[test]
    fn drop_commits_only_when_order_changed() {
        let session = DragSession::begin(vec![1, 2, 3], 1).unwrap();
        assert!(session.drop_gesture().is_none());

        let mut session = DragSession::begin(vec![1, 2, 3], 0).unwrap();
        session.pointer_moved(2, 35.0, Some(40.0));
        assert_eq!(session.drop_gesture(), Some(vec![2, 3, 1]));
    }

    #[test]
    fn hover_over_drag_index_is_noop() {
        let mut session = DragSession::begin(vec![1, 2, 3], 1).unwrap();
        session.pointer_moved(1, 35.0, Some(40.0));
        assert_eq!(session.items(), [1, 2, 3]);
    }
}
