use crate::key::{KeyCode, MouseButton};
use std::cell::RefCell;
use std::rc::Weak;

/// One translated input event. Mouse coordinates are client-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        code: KeyCode,
        pressed: bool,
    },
    Mouse {
        button: MouseButton,
        x: i32,
        y: i32,
        pressed: bool,
    },
}

/// Receiver of translated input, registered with a surface.
pub trait InputSink {
    fn key_pressed(&mut self, code: KeyCode);
    fn key_released(&mut self, code: KeyCode);
    fn mouse_pressed(&mut self, button: MouseButton, x: i32, y: i32);
    fn mouse_released(&mut self, button: MouseButton, x: i32, y: i32);

    /// Route one event to the matching callback.
    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { code, pressed: true } => self.key_pressed(code),
            InputEvent::Key {
                code,
                pressed: false,
            } => self.key_released(code),
            InputEvent::Mouse {
                button,
                x,
                y,
                pressed: true,
            } => self.mouse_pressed(button, x, y),
            InputEvent::Mouse {
                button,
                x,
                y,
                pressed: false,
            } => self.mouse_released(button, x, y),
        }
    }
}

/// The single, non-owning sink slot embedded in every surface backend.
#[derive(Default)]
pub struct InputSlot {
    sink: Option<Weak<RefCell<dyn InputSink>>>,
}

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sink`, replacing any previous registration.
    pub fn register(&mut self, sink: Weak<RefCell<dyn InputSink>>) {
        self.sink = Some(sink);
    }

    pub fn is_registered(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.strong_count() > 0)
    }

    /// Deliver `event` synchronously. Returns `false` if it was dropped.
    pub fn deliver(&self, event: InputEvent) -> bool {
        let Some(sink) = self.sink.as_ref().and_then(Weak::upgrade) else {
            tracing::trace!(?event, "no input sink; event dropped");
            return false;
        };
        let Ok(mut sink) = sink.try_borrow_mut() else {
            tracing::warn!(?event, "input sink busy; event dropped");
            return false;
        };
        sink.dispatch(event);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl InputSink for Recorder {
        fn key_pressed(&mut self, code: KeyCode) {
            self.seen.push(format!("down {code:?}"));
        }
        fn key_released(&mut self, code: KeyCode) {
            self.seen.push(format!("up {code:?}"));
        }
        fn mouse_pressed(&mut self, button: MouseButton, x: i32, y: i32) {
            self.seen.push(format!("press {button:?} {x},{y}"));
        }
        fn mouse_released(&mut self, button: MouseButton, x: i32, y: i32) {
            self.seen.push(format!("release {button:?} {x},{y}"));
        }
    }

    #[test]
    fn empty_slot_drops_events() {
        let slot = InputSlot::new();
        assert!(!slot.is_registered());
        assert!(!slot.deliver(InputEvent::Key {
            code: KeyCode::A,
            pressed: true
        }));
    }

    #[test]
    fn registered_sink_receives_events_in_order() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let sink: Rc<RefCell<dyn InputSink>> = recorder.clone();
        let mut slot = InputSlot::new();
        slot.register(Rc::downgrade(&sink));

        slot.deliver(InputEvent::Key {
            code: KeyCode::Space,
            pressed: true,
        });
        slot.deliver(InputEvent::Mouse {
            button: MouseButton::Left,
            x: 4,
            y: 9,
            pressed: true,
        });
        slot.deliver(InputEvent::Key {
            code: KeyCode::Space,
            pressed: false,
        });

        assert_eq!(
            recorder.borrow().seen,
            vec!["down Space", "press Left 4,9", "up Space"]
        );
    }

    #[test]
    fn dead_sink_is_not_kept_alive() {
        let mut slot = InputSlot::new();
        {
            let sink: Rc<RefCell<dyn InputSink>> = Rc::new(RefCell::new(Recorder::default()));
            slot.register(Rc::downgrade(&sink));
            assert!(slot.is_registered());
        }
        assert!(!slot.is_registered());
        assert!(!slot.deliver(InputEvent::Key {
            code: KeyCode::Q,
            pressed: true
        }));
    }
}
