use web_time::{Duration, Instant};

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Squared cursor travel (pixels²) while pressed that turns a click into a
/// drag.
const DRAG_THRESHOLD_SQ: f32 = 16.0;

/// Result of processing a mouse-up event through the click state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    /// Drag, or press and release over different targets.
    NoAction,
    /// First click on a portal window.
    SingleClick {
        /// Index of the portal under the cursor.
        portal: usize,
    },
    /// Second click on the same portal within the double-click window.
    DoubleClick {
        /// Index of the portal under the cursor.
        portal: usize,
    },
    /// Press and release both landed on empty space.
    Background,
}

/// Tracks mouse position, drag state, and the double-click state machine.
pub struct InputState {
    pub mouse_pos: (f32, f32),
    pub mouse_down_target: Option<usize>,
    mouse_down_pos: (f32, f32),
    pub is_dragging: bool,
    last_click_time: Option<Instant>,
    last_click_target: Option<usize>,
}

impl InputState {
    /// Create a new input state with no active click.
    pub fn new() -> Self {
        Self {
            mouse_pos: (0.0, 0.0),
            mouse_down_target: None,
            mouse_down_pos: (0.0, 0.0),
            is_dragging: false,
            last_click_time: None,
            last_click_target: None,
        }
    }

    /// Record what portal (if any) is under the cursor at mouse-down.
    pub fn handle_mouse_down(&mut self, hovered: Option<usize>) {
        self.mouse_down_target = hovered;
        self.mouse_down_pos = self.mouse_pos;
        self.is_dragging = false;
    }

    /// Update cursor position; marks a drag once the pressed cursor has
    /// travelled far enough.
    pub fn handle_mouse_position(&mut self, x: f32, y: f32, pressed: bool) {
        self.mouse_pos = (x, y);
        if pressed {
            let dx = x - self.mouse_down_pos.0;
            let dy = y - self.mouse_down_pos.1;
            if dx * dx + dy * dy > DRAG_THRESHOLD_SQ {
                self.is_dragging = true;
            }
        }
    }

    /// Process a mouse-up event happening now.
    pub fn process_mouse_up(&mut self, hovered: Option<usize>) -> ClickResult {
        self.process_mouse_up_at(hovered, Instant::now())
    }

    /// Process a mouse-up event at an explicit timestamp.
    pub fn process_mouse_up_at(
        &mut self,
        hovered: Option<usize>,
        now: Instant,
    ) -> ClickResult {
        let down = self.mouse_down_target.take();
        let was_dragging = std::mem::replace(&mut self.is_dragging, false);

        if was_dragging {
            self.reset_clicks();
            return ClickResult::NoAction;
        }

        match (down, hovered) {
            (Some(d), Some(u)) if d == u => {
                let within = self.last_click_time.is_some_and(|t| {
                    now.duration_since(t) < DOUBLE_CLICK_THRESHOLD
                });
                if within && self.last_click_target == Some(u) {
                    // A third click starts a fresh pair.
                    self.reset_clicks();
                    ClickResult::DoubleClick { portal: u }
                } else {
                    self.last_click_time = Some(now);
                    self.last_click_target = Some(u);
                    ClickResult::SingleClick { portal: u }
                }
            }
            (None, None) => {
                self.reset_clicks();
                ClickResult::Background
            }
            _ => {
                self.reset_clicks();
                ClickResult::NoAction
            }
        }
    }

    fn reset_clicks(&mut self) {
        self.last_click_time = None;
        self.last_click_target = None;
    }
}
