use super::PointerEvent;
use crate::geometry::Point;

/// What a pointer event means to the active weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer went down inside the image
    Press(Point),
    /// Pointer moved to a point inside the image while held
    Drag { from: Point, to: Point },
}

/// Idle until the pointer goes down, then tracks the last sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum StrokeState {
    #[default]
    Idle,
    Stroking {
        last: Point,
    },
}

impl StrokeState {
    /// Advance on `event`. Points for which `inside` is false never produce a
    /// gesture, but still become the start of the next drag.
    pub fn handle(&mut self, event: PointerEvent, inside: impl Fn(Point) -> bool) -> Option<Gesture> {
        match event {
            PointerEvent::Down(p) => {
                *self = StrokeState::Stroking { last: p };
                inside(p).then_some(Gesture::Press(p))
            },
            PointerEvent::Move(p) => match self {
                StrokeState::Idle => None,
                StrokeState::Stroking { last } => {
                    let from = std::mem::replace(last, p);
                    inside(p).then_some(Gesture::Drag { from, to: p })
                },
            },
            PointerEvent::Up => {
                *self = StrokeState::Idle;
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn image() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn feed(state: &mut StrokeState, event: PointerEvent) -> Option<Gesture> {
        let rect = image();
        state.handle(event, |p| rect.contains(p))
    }

    #[test]
    fn test_press_inside_then_drags() {
        let mut state = StrokeState::default();
        let a = Point::new(10.0, 10.0);
        let b = Point::new(20.0, 15.0);
        let c = Point::new(30.0, 15.0);
        assert_eq!(feed(&mut state, PointerEvent::Down(a)), Some(Gesture::Press(a)));
        assert_eq!(feed(&mut state, PointerEvent::Move(b)), Some(Gesture::Drag { from: a, to: b }));
        assert_eq!(feed(&mut state, PointerEvent::Move(c)), Some(Gesture::Drag { from: b, to: c }));
        assert_eq!(feed(&mut state, PointerEvent::Up), None);
        assert_eq!(state, StrokeState::Idle);
    }

    #[test]
    fn test_moves_while_idle_do_nothing() {
        let mut state = StrokeState::Idle;
        assert_eq!(feed(&mut state, PointerEvent::Move(Point::new(5.0, 5.0))), None);
        assert_eq!(state, StrokeState::Idle);
    }

    #[test]
    fn test_outside_points_update_last_only() {
        let mut state = StrokeState::Idle;
        let outside = Point::new(150.0, 50.0);
        let edge = Point::new(90.0, 50.0);
        // Down outside: stroking, no press
        assert_eq!(feed(&mut state, PointerEvent::Down(outside)), None);
        assert_eq!(state, StrokeState::Stroking { last: outside });

        let further = Point::new(200.0, 50.0);
        assert_eq!(feed(&mut state, PointerEvent::Move(further)), None);
        assert_eq!(state, StrokeState::Stroking { last: further });

        // Coming back in drags from the last outside sample
        assert_eq!(
            feed(&mut state, PointerEvent::Move(edge)),
            Some(Gesture::Drag { from: further, to: edge })
        );
    }

    #[test]
    fn test_up_then_down_starts_fresh_stroke() {
        let mut state = StrokeState::Idle;
        feed(&mut state, PointerEvent::Down(Point::new(1.0, 1.0)));
        feed(&mut state, PointerEvent::Up);
        let p = Point::new(50.0, 50.0);
        assert_eq!(feed(&mut state, PointerEvent::Down(p)), Some(Gesture::Press(p)));
        assert_eq!(state, StrokeState::Stroking { last: p });
    }
}
