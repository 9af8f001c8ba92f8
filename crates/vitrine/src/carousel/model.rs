use pagehost::PointerId;
use std::num::NonZeroUsize;

/// Where a navigation request came from. Only user navigation restarts
/// autoplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Autoplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Previous,
    Next,
}

impl Swipe {
    pub fn step(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    pointer: PointerId,
    start_x: f64,
}

#[derive(Debug, Clone)]
pub struct CarouselState {
    index: usize,
    len: NonZeroUsize,
    hovering: bool,
    gesture: Option<Gesture>,
}

impl CarouselState {
    pub fn new(len: NonZeroUsize) -> Self {
        Self {
            index: 0,
            len,
            hovering: false,
            gesture: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide_count(&self) -> usize {
        self.len.get()
    }

    /// Maps any integer onto `[0, len)`, wrapping negatives from the end.
    pub fn wrap(&self, target: isize) -> usize {
        target.rem_euclid(self.len.get() as isize) as usize
    }

    pub fn set_index(&mut self, target: isize) -> usize {
        self.index = self.wrap(target);
        self.index
    }

    pub fn step_target(&self, delta: isize) -> isize {
        self.index as isize + delta
    }

    /// Horizontal track offset for slides of the given width.
    pub fn offset(&self, slide_width: f64) -> f64 {
        -(self.index as f64 * slide_width)
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn begin_gesture(&mut self, pointer: PointerId, x: f64) {
        self.gesture = Some(Gesture {
            pointer,
            start_x: x,
        });
    }

    pub fn gesture_pointer(&self) -> Option<PointerId> {
        self.gesture.map(|g| g.pointer)
    }

    /// Ends the active gesture. Travel beyond `threshold` either way is a
    /// swipe: rightward goes back, leftward goes forward.
    pub fn end_gesture(&mut self, x: f64, threshold: f64) -> Option<Swipe> {
        let gesture = self.gesture.take()?;
        let delta = x - gesture.start_x;

        if delta > threshold {
            Some(Swipe::Previous)
        } else if delta < -threshold {
            Some(Swipe::Next)
        } else {
            None
        }
    }

    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(len: usize) -> CarouselState {
        CarouselState::new(NonZeroUsize::new(len).unwrap())
    }

    #[test]
    fn test_wrap_negative_from_end() {
        let s = state(5);
        assert_eq!(s.wrap(-1), 4);
        assert_eq!(s.wrap(5), 0);
        assert_eq!(s.wrap(-6), 4);
        assert_eq!(s.wrap(12), 2);
    }

    #[test]
    fn test_offset_at_index() {
        let mut s = state(5);
        assert_eq!(s.offset(200.0), -0.0);
        s.set_index(3);
        assert_eq!(s.offset(200.0), -600.0);
        assert_eq!(s.offset(150.5), -451.5);
    }

    #[test]
    fn test_swipe_scenarios() {
        let pointer = PointerId(1);
        let mut s = state(5);

        s.begin_gesture(pointer, 200.0);
        assert_eq!(s.end_gesture(100.0, 35.0), Some(Swipe::Next));

        s.begin_gesture(pointer, 100.0);
        assert_eq!(s.end_gesture(200.0, 35.0), Some(Swipe::Previous));

        s.begin_gesture(pointer, 100.0);
        assert_eq!(s.end_gesture(115.0, 35.0), None);
        assert_eq!(s.gesture_pointer(), None);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut s = state(3);
        s.begin_gesture(PointerId(1), 100.0);
        assert_eq!(s.end_gesture(135.0, 35.0), None);
        s.begin_gesture(PointerId(1), 100.0);
        assert_eq!(s.end_gesture(65.0, 35.0), None);
    }

    #[test]
    fn test_end_without_gesture_is_ignored() {
        let mut s = state(3);
        assert_eq!(s.end_gesture(0.0, 35.0), None);

        s.begin_gesture(PointerId(1), 300.0);
        s.cancel_gesture();
        assert_eq!(s.end_gesture(0.0, 35.0), None);
    }

    proptest! {
        #[test]
        fn prop_steps_land_on_euclidean_remainder(
            len in 1usize..50,
            start in 0usize..50,
            steps in -500isize..500,
        ) {
            let mut s = state(len);
            s.set_index(start as isize);
            let start = s.index() as isize;

            let forward = steps >= 0;
            for _ in 0..steps.unsigned_abs() {
                let delta = if forward { 1 } else { -1 };
                s.set_index(s.step_target(delta));
            }

            let n = len as isize;
            let expected = (((start + steps) % n) + n) % n;
            prop_assert_eq!(s.index() as isize, expected);
        }
    }
}
