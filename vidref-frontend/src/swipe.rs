/* This file is part of the Video Reference Browser project - https://github.com/vidref/vidref-browser
*
*  Copyright (C) 2025 the Video Reference Browser contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use crate::constants::{SWIPE_COOLDOWN_MS, SWIPE_IDLE_RESET_MS, SWIPE_THRESHOLD};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

/// Turns a stream of wheel deltas into discrete swipes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeAccumulator {
    delta: f64,
    last_event_ms: Option<f64>,
    locked_until_ms: f64,
}

impl SwipeAccumulator {
    /// Feeds a wheel event, `timestamp_ms` must be monotonic (`Event.timeStamp`)
    pub fn on_wheel(&mut self, delta_y: f64, timestamp_ms: f64) -> Option<SwipeDirection> {
        let idle = self.last_event_ms.is_none_or(|last| timestamp_ms - last > SWIPE_IDLE_RESET_MS);
        self.last_event_ms = Some(timestamp_ms);

        if timestamp_ms < self.locked_until_ms {
            self.delta = 0.0;
            return None;
        }
        let reversed = self.delta * delta_y < 0.0;
        if idle || reversed {
            self.delta = 0.0;
        }

        self.delta += delta_y;
        let direction = if self.delta >= SWIPE_THRESHOLD {
            SwipeDirection::Next
        } else if self.delta <= -SWIPE_THRESHOLD {
            SwipeDirection::Previous
        } else {
            return None;
        };
        self.delta = 0.0;
        self.locked_until_ms = timestamp_ms + SWIPE_COOLDOWN_MS;
        Some(direction)
    }
}

/// The neighbour of `current` in `ids` in the given direction, `None` at either end
pub fn neighbour(ids: &[u64], current: u64, direction: SwipeDirection) -> Option<u64> {
    let index = ids.iter().position(|id| *id == current)?;
    match direction {
        SwipeDirection::Next => ids.get(index + 1).copied(),
        SwipeDirection::Previous => index.checked_sub(1).and_then(|i| ids.get(i)).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulated_scroll_fires_once_past_the_threshold() {
        let mut acc = SwipeAccumulator::default();
        assert_eq!(acc.on_wheel(50.0, 0.0), None);
        assert_eq!(acc.on_wheel(50.0, 16.0), None);
        assert_eq!(acc.on_wheel(50.0, 32.0), Some(SwipeDirection::Next));
    }

    #[test]
    fn upward_scroll_goes_back() {
        let mut acc = SwipeAccumulator::default();
        assert_eq!(acc.on_wheel(-130.0, 0.0), Some(SwipeDirection::Previous));
    }

    #[test]
    fn cooldown_swallows_the_tail_of_a_gesture() {
        let mut acc = SwipeAccumulator::default();
        assert_eq!(acc.on_wheel(200.0, 0.0), Some(SwipeDirection::Next));
        assert_eq!(acc.on_wheel(200.0, 100.0), None);
        assert_eq!(acc.on_wheel(200.0, 500.0), None);
        assert_eq!(acc.on_wheel(200.0, 700.0), Some(SwipeDirection::Next));
    }

    #[test]
    fn reversing_direction_starts_over() {
        let mut acc = SwipeAccumulator::default();
        acc.on_wheel(100.0, 0.0);
        assert_eq!(acc.on_wheel(-30.0, 10.0), None);
        // every flip drops what was accumulated before it
        assert_eq!(acc.on_wheel(30.0, 20.0), None);
        assert_eq!(acc.on_wheel(100.0, 30.0), Some(SwipeDirection::Next));
    }

    #[test]
    fn pauses_reset_the_accumulator() {
        let mut acc = SwipeAccumulator::default();
        acc.on_wheel(100.0, 0.0);
        assert_eq!(acc.on_wheel(100.0, 300.0), None);
        assert_eq!(acc.on_wheel(20.0, 350.0), Some(SwipeDirection::Next));
    }

    #[test]
    fn neighbours_stop_at_the_ends() {
        let ids = [4, 8, 15];
        assert_eq!(neighbour(&ids, 8, SwipeDirection::Next), Some(15));
        assert_eq!(neighbour(&ids, 8, SwipeDirection::Previous), Some(4));
        assert_eq!(neighbour(&ids, 15, SwipeDirection::Next), None);
        assert_eq!(neighbour(&ids, 4, SwipeDirection::Previous), None);
        assert_eq!(neighbour(&ids, 16, SwipeDirection::Next), None);
    }
}
