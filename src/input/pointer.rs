use crate::display::{InputEvent, MouseButtonKind};
use crate::geometry::Point;

/// A single pointer, whatever device it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
}

/// Maps mouse and touch events into surface-local logical coordinates.
///
/// Only the left button drives the mouse pointer. For touch, the first finger
/// down owns the pointer until it lifts; other fingers are ignored.
#[derive(Debug, Clone, Default)]
pub struct PointerMapper {
    origin: Point,
    active_finger: Option<i64>,
}

impl PointerMapper {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            active_finger: None,
        }
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    fn local(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.origin.x, y - self.origin.y)
    }

    pub fn map(&mut self, event: &InputEvent) -> Option<PointerEvent> {
        match *event {
            InputEvent::MouseDown {
                x,
                y,
                button: MouseButtonKind::Left,
            } => Some(PointerEvent::Down(self.local(x as f32, y as f32))),
            InputEvent::MouseMove { x, y } => {
                Some(PointerEvent::Move(self.local(x as f32, y as f32)))
            },
            InputEvent::MouseUp {
                button: MouseButtonKind::Left,
                ..
            } => Some(PointerEvent::Up),
            InputEvent::FingerDown { finger, x, y } => {
                if self.active_finger.is_some() {
                    return None;
                }
                self.active_finger = Some(finger);
                Some(PointerEvent::Down(self.local(x, y)))
            },
            InputEvent::FingerMotion { finger, x, y } if self.active_finger == Some(finger) => {
                Some(PointerEvent::Move(self.local(x, y)))
            },
            InputEvent::FingerUp { finger, .. } if self.active_finger == Some(finger) => {
                self.active_finger = None;
                Some(PointerEvent::Up)
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_maps_relative_to_origin() {
        let mut mapper = PointerMapper::new(Point::new(10.0, 20.0));
        let down = InputEvent::MouseDown {
            x: 15,
            y: 25,
            button: MouseButtonKind::Left,
        };
        assert_eq!(mapper.map(&down), Some(PointerEvent::Down(Point::new(5.0, 5.0))));
        assert_eq!(
            mapper.map(&InputEvent::MouseMove { x: 10, y: 20 }),
            Some(PointerEvent::Move(Point::new(0.0, 0.0)))
        );
        let up = InputEvent::MouseUp {
            x: 0,
            y: 0,
            button: MouseButtonKind::Left,
        };
        assert_eq!(mapper.map(&up), Some(PointerEvent::Up));
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut mapper = PointerMapper::default();
        let right = InputEvent::MouseDown {
            x: 1,
            y: 1,
            button: MouseButtonKind::Right,
        };
        assert_eq!(mapper.map(&right), None);
        assert_eq!(mapper.map(&InputEvent::Resized { width: 1, height: 1 }), None);
    }

    #[test]
    fn test_first_finger_owns_pointer() {
        let mut mapper = PointerMapper::default();
        let first = InputEvent::FingerDown {
            finger: 7,
            x: 10.0,
            y: 10.0,
        };
        let second = InputEvent::FingerDown {
            finger: 8,
            x: 50.0,
            y: 50.0,
        };
        assert_eq!(mapper.map(&first), Some(PointerEvent::Down(Point::new(10.0, 10.0))));
        assert_eq!(mapper.map(&second), None);
        assert_eq!(
            mapper.map(&InputEvent::FingerMotion {
                finger: 8,
                x: 60.0,
                y: 60.0
            }),
            None
        );
        assert_eq!(
            mapper.map(&InputEvent::FingerMotion {
                finger: 7,
                x: 12.0,
                y: 11.0
            }),
            Some(PointerEvent::Move(Point::new(12.0, 11.0)))
        );
        assert_eq!(
            mapper.map(&InputEvent::FingerUp {
                finger: 8,
                x: 0.0,
                y: 0.0
            }),
            None
        );
        assert_eq!(
            mapper.map(&InputEvent::FingerUp {
                finger: 7,
                x: 0.0,
                y: 0.0
            }),
            Some(PointerEvent::Up)
        );
        assert_eq!(mapper.active_finger, None);

        // A new touch can take over once the first lifted
        assert!(mapper.map(&second).is_some());
        assert_eq!(mapper.active_finger, Some(8));
    }
}
