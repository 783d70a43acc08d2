// SPDX-License-Identifier: MPL-2.0
//! Touch swipe gesture state
//!
//! Tracks the fingers resting on the story. The first one down is followed
//! from press to lift and classified as a horizontal swipe once it leaves
//! the screen.

use iced::touch::Finger;
use iced::Point;
use std::collections::HashSet;

/// Minimum horizontal travel, in logical pixels, for a swipe to count.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Direction the finger travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved towards the left edge.
    Left,
    /// Finger moved towards the right edge.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    finger: Finger,
    start: Point,
}

/// Tracks the fingers on the story and the one that started the current
/// gesture.
#[derive(Debug, Clone, Default)]
pub struct SwipeState {
    gesture: Option<Gesture>,
    down: HashSet<Finger>,
}

impl SwipeState {
    /// Records a finger press. Only the first finger down starts a gesture.
    pub fn begin(&mut self, finger: Finger, position: Point) {
        self.down.insert(finger);
        if self.gesture.is_none() {
            self.gesture = Some(Gesture {
                finger,
                start: position,
            });
        }
    }

    /// Records a finger lift and classifies the gesture if that finger
    /// started it.
    ///
    /// Returns a direction only for mostly horizontal travel strictly
    /// greater than [`SWIPE_THRESHOLD`]. A tap without movement is never a
    /// swipe.
    pub fn finish(&mut self, finger: Finger, position: Point) -> Option<SwipeDirection> {
        self.down.remove(&finger);
        let gesture = self.gesture.filter(|g| g.finger == finger)?;
        self.gesture = None;

        let dx = position.x - gesture.start.x;
        let dy = position.y - gesture.start.y;
        if dx.abs() <= SWIPE_THRESHOLD || dy.abs() > dx.abs() {
            return None;
        }

        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }

    /// Forgets a finger the platform lost track of, dropping its gesture.
    pub fn lose(&mut self, finger: Finger) {
        self.down.remove(&finger);
        if self.gesture.is_some_and(|g| g.finger == finger) {
            self.gesture = None;
        }
    }

    /// Forgets every finger and the current gesture.
    pub fn cancel(&mut self) {
        self.gesture = None;
        self.down.clear();
    }

    /// Whether `finger` was pressed on the story and not lifted yet.
    #[must_use]
    pub fn is_down(&self, finger: Finger) -> bool {
        self.down.contains(&finger)
    }

    /// Whether any finger is still on the story.
    #[must_use]
    pub fn is_touching(&self) -> bool {
        !self.down.is_empty()
    }
}
