use super::types::{InputEvent, PointerMoveEvent};

/// Current input state for the window.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Last pointer position in client-area physical pixels, `None` while
    /// the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    /// Applies a platform-agnostic input event.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_moves_update_position() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 12.0, y: 34.0 }));
        assert_eq!(state.pointer_pos, Some((12.0, 34.0)));

        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 0.0, y: 1.0 }));
        assert_eq!(state.pointer_pos, Some((0.0, 1.0)));
    }

    #[test]
    fn pointer_leaving_clears_position() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 5.0, y: 5.0 }));
        state.apply_event(&InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn focus_is_tracked() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::Focused(true));
        assert!(state.focused);
        state.apply_event(&InputEvent::Focused(false));
        assert!(!state.focused);
    }
}
