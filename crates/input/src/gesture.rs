//! Swipe reduction - raw drag vectors to a move direction.
//!
//! Screen coordinates: positive `dx` points right, positive `dy` points down.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use log::debug;

use crate::types::Direction;

/// Minimum drag length, in pixels, along the dominant axis
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Reduce a drag vector to a direction
///
/// The axis with the larger magnitude wins; ties go to the vertical axis. The
/// drag must be strictly longer than `threshold` along that axis.
///
/// # Examples
///
/// ```
/// use tui_2048_input::{direction_from_drag, SWIPE_THRESHOLD};
/// use tui_2048_types::Direction;
///
/// assert_eq!(direction_from_drag(80.0, 10.0, SWIPE_THRESHOLD), Some(Direction::Right));
/// assert_eq!(direction_from_drag(-5.0, -60.0, SWIPE_THRESHOLD), Some(Direction::Up));
/// assert_eq!(direction_from_drag(30.0, 0.0, SWIPE_THRESHOLD), None);
/// ```
pub fn direction_from_drag(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > threshold {
            Some(Direction::Right)
        } else if dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Direction::Down)
    } else if dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Tracks a left-button mouse drag in terminal cells.
///
/// Terminal cells are roughly twice as tall as they are wide, so the vertical
/// component is doubled before reduction.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    threshold: f32,
    origin: Option<(u16, u16)>,
}

impl DragTracker {
    /// `threshold` is measured in terminal columns
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            origin: None,
        }
    }

    /// Feed a mouse event; returns a direction when a drag is released
    pub fn handle(&mut self, event: &MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (col, row) = self.origin.take()?;
                let dx = f32::from(event.column) - f32::from(col);
                let dy = (f32::from(event.row) - f32::from(row)) * 2.0;
                let dir = direction_from_drag(dx, dy, self.threshold);
                debug!("drag ({dx}, {dy}) -> {dir:?}");
                dir
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.origin = None;
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(3.0)
    }
}
