//! Pointer-driven move/resize state for a floating panel.
//!
//! [`DragResizeController`] is independent of any rendering backend: feed it pointer positions
//! and deltas, read back the panel geometry. Units are whatever the host uses (pixels, cells).

/// Minimum panel width in host units.
pub const MIN_WIDTH: u32 = 300;
/// Minimum panel height in host units.
pub const MIN_HEIGHT: u32 = 200;
/// Size used when the caller does not provide one.
pub const DEFAULT_SIZE: Size = Size {
    width: 450,
    height: 500,
};
/// Every panel opens here.
pub const INITIAL_POSITION: Point = Point { x: 100, y: 100 };

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Region a dragged panel is kept inside. A panel larger than the region stays at its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragBounds {
    pub origin: Point,
    pub size: Size,
}

/// The active gesture. At most one gesture can be live at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging by the title bar. `anchor` is the pointer offset from the panel's top-left,
    /// captured when the drag started.
    Dragging { anchor: Point },
    /// Resizing from the bottom-right grip, driven by pointer deltas.
    Resizing,
}

/// Move/resize state machine for one panel.
///
/// Transitions: `Idle -> Dragging` via [`begin_drag`](Self::begin_drag), `Idle -> Resizing` via
/// [`begin_resize`](Self::begin_resize), and back to `Idle` via
/// [`end_gesture`](Self::end_gesture). Starting a gesture while another one is live is ignored,
/// so a stray second pointer-down can never corrupt the drag anchor.
#[derive(Clone, Debug)]
pub struct DragResizeController {
    position: Point,
    size: Size,
    min_size: Size,
    bounds: Option<DragBounds>,
    gesture: Gesture,
}

impl Default for DragResizeController {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl DragResizeController {
    pub fn new(default_size: Size) -> Self {
        let min_size = Size::new(MIN_WIDTH, MIN_HEIGHT);
        Self {
            position: INITIAL_POSITION,
            size: clamp_size(default_size, min_size),
            min_size,
            bounds: None,
            gesture: Gesture::Idle,
        }
    }

    /// Overrides the resize floor. The current size is re-clamped.
    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = min_size;
        self.size = clamp_size(self.size, min_size);
        self
    }

    /// Keeps dragged positions inside `bounds`. Without bounds the panel can be dragged
    /// anywhere, including fully off-screen.
    pub fn with_bounds(mut self, bounds: DragBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn set_bounds(&mut self, bounds: Option<DragBounds>) {
        self.bounds = bounds;
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Resizing)
    }

    /// `true` while a gesture holds pointer capture.
    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Starts a drag at the given pointer position. Returns `false` if a gesture is already live.
    pub fn begin_drag(&mut self, pointer_x: i32, pointer_y: i32) -> bool {
        if self.is_active() {
            return false;
        }
        let anchor = Point::new(pointer_x - self.position.x, pointer_y - self.position.y);
        self.gesture = Gesture::Dragging { anchor };
        #[cfg(feature = "tracing")]
        tracing::trace!(anchor_x = anchor.x, anchor_y = anchor.y, "panel drag started");
        true
    }

    /// Starts a resize. Returns `false` if a gesture is already live.
    pub fn begin_resize(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.gesture = Gesture::Resizing;
        #[cfg(feature = "tracing")]
        tracing::trace!("panel resize started");
        true
    }

    /// Applies one pointer move. Returns `true` if the geometry changed and the panel needs a
    /// redraw.
    pub fn on_pointer_move(
        &mut self,
        pointer_x: i32,
        pointer_y: i32,
        delta_x: i32,
        delta_y: i32,
    ) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging { anchor } => {
                let next = self.clamp_position(Point::new(
                    pointer_x - anchor.x,
                    pointer_y - anchor.y,
                ));
                let changed = next != self.position;
                self.position = next;
                changed
            }
            Gesture::Resizing => {
                let next = Size::new(
                    grow(self.size.width, delta_x).max(self.min_size.width),
                    grow(self.size.height, delta_y).max(self.min_size.height),
                );
                let changed = next != self.size;
                self.size = next;
                changed
            }
        }
    }

    /// Ends whatever gesture is live. Returns `true` if one was.
    pub fn end_gesture(&mut self) -> bool {
        let was_active = self.is_active();
        self.gesture = Gesture::Idle;
        #[cfg(feature = "tracing")]
        if was_active {
            tracing::trace!(
                x = self.position.x,
                y = self.position.y,
                width = self.size.width,
                height = self.size.height,
                "panel gesture ended"
            );
        }
        was_active
    }

    fn clamp_position(&self, p: Point) -> Point {
        let Some(b) = self.bounds else {
            return p;
        };
        let max_x = b.origin.x + (b.size.width as i32 - self.size.width as i32).max(0);
        let max_y = b.origin.y + (b.size.height as i32 - self.size.height as i32).max(0);
        Point::new(p.x.clamp(b.origin.x, max_x), p.y.clamp(b.origin.y, max_y))
    }
}

fn clamp_size(size: Size, min: Size) -> Size {
    Size::new(size.width.max(min.width), size.height.max(min.height))
}

fn grow(len: u32, delta: i32) -> u32 {
    (len as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32
}
