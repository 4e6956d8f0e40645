//! Property tests for the drag/resize controller.
//!
//! 1. Size never drops below the minimum, whatever the deltas
//! 2. With bounds set, a drag never moves the panel's top-left outside them
//! 3. Gestures never overlap: a second begin is refused until the first ends

use proptest::prelude::*;
use ratatui_datatable_core::panel::gesture::DragBounds;
use ratatui_datatable_core::panel::gesture::DragResizeController;
use ratatui_datatable_core::panel::gesture::Gesture;
use ratatui_datatable_core::panel::gesture::MIN_HEIGHT;
use ratatui_datatable_core::panel::gesture::MIN_WIDTH;
use ratatui_datatable_core::panel::gesture::Point;
use ratatui_datatable_core::panel::gesture::Size;

fn moves() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((-400i32..400, -400i32..400), 1..40)
}

proptest! {
    #[test]
    fn resize_respects_minimum(deltas in moves()) {
        let mut c = DragResizeController::default();
        prop_assert!(c.begin_resize());
        for (dx, dy) in deltas {
            c.on_pointer_move(0, 0, dx, dy);
            prop_assert!(c.size().width >= MIN_WIDTH);
            prop_assert!(c.size().height >= MIN_HEIGHT);
        }
        prop_assert!(c.end_gesture());
    }

    #[test]
    fn bounded_drag_stays_inside(pointers in moves()) {
        let bounds = DragBounds {
            origin: Point::new(0, 0),
            size: Size::new(1920, 1080),
        };
        let mut c = DragResizeController::default().with_bounds(bounds);
        prop_assert!(c.begin_drag(120, 110));
        for (x, y) in pointers {
            c.on_pointer_move(x * 5, y * 5, 0, 0);
            let p = c.position();
            prop_assert!(p.x >= 0 && p.y >= 0);
            prop_assert!(p.x + c.size().width as i32 <= 1920);
            prop_assert!(p.y + c.size().height as i32 <= 1080);
        }
    }

    #[test]
    fn gestures_never_overlap(x in -500i32..500, y in -500i32..500) {
        let mut c = DragResizeController::default();
        prop_assert!(c.begin_drag(x, y));
        let anchored = c.gesture();
        prop_assert!(!c.begin_resize());
        prop_assert!(!c.begin_drag(x + 10, y + 10));
        prop_assert_eq!(c.gesture(), anchored);
        c.end_gesture();
        prop_assert_eq!(c.gesture(), Gesture::Idle);
        prop_assert!(c.begin_resize());
    }
}
