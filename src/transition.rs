//! Portal-driven level switching.
//!
//! While `Normal`, every frame tests the player against each portal's
//! activation envelope. The first hit switches the current level, moves the
//! player to the portal's destination and starts a timed fade
//! (`Transitioning`). Checks are suppressed during the fade, and stay
//! disarmed after it until the player has left every envelope, so arriving
//! on top of another portal does not bounce straight back.

use crate::error::LevelError;
use crate::level::Level;
use crate::player::Player;
use crate::registry::LevelRegistry;

const ENVELOPE_MARGIN_X: f32 = 0.12;
const ENVELOPE_MARGIN_Y_SHORT: f32 = 0.30;
const ENVELOPE_MARGIN_Y_TALL: f32 = 0.05;
const SHORT_PORTAL_MAX_HEIGHT: f32 = 2.0;
/// Overlay opacity at the very end of a fade. The screen stays covered
/// from the switch until the fade is over.
pub const FADE_MIN_ALPHA: f32 = 0.9;

/// Whether `(px, py)` lies in the activation envelope of a portal anchored
/// at `(anchor_x, anchor_y)` whose height is `portal_height` grid cells.
pub fn in_activation_envelope(
    anchor_x: f32,
    anchor_y: f32,
    portal_height: f32,
    px: f32,
    py: f32,
) -> bool {
    let v_margin = if portal_height <= SHORT_PORTAL_MAX_HEIGHT {
        ENVELOPE_MARGIN_Y_SHORT
    } else {
        ENVELOPE_MARGIN_Y_TALL
    };

    let horizontal = anchor_x * (1.0 - ENVELOPE_MARGIN_X) <= px
        && px <= anchor_x * (1.0 + ENVELOPE_MARGIN_X);
    let vertical = anchor_y * (1.0 - v_margin) <= py && py <= anchor_y;
    horizontal && vertical
}

/// Index of the first portal in `level` whose envelope contains the player.
pub fn find_triggered_portal(level: &Level, player: &Player) -> Option<usize> {
    level.portals().find_map(|(i, deco, link)| {
        in_activation_envelope(link.anchor_x, deco.anchor_y, deco.height, player.x, player.y)
            .then_some(i)
    })
}

/// Whether a level switch is playing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    /// Portal checks run every frame.
    Normal,
    /// Fading after a switch.
    Transitioning { started_at: f64 },
}

/// A completed level switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    /// Level index left.
    pub from: usize,
    /// Level index entered.
    pub to: usize,
    /// Decoration index of the portal taken, in the source level.
    pub portal: usize,
}

/// Portal activation and fade timing.
#[derive(Debug, Clone)]
pub struct PortalTransition {
    state: TransitionState,
    armed: bool,
    fade_duration: f64,
}

impl PortalTransition {
    /// Armed, idle transition with a fade of `fade_duration` seconds.
    pub fn new(fade_duration: f64) -> Self {
        Self {
            state: TransitionState::Normal,
            armed: true,
            fade_duration,
        }
    }

    /// Current state.
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether a fade is playing.
    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning { .. })
    }

    /// Whether the next envelope hit will switch levels.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Ends the fade once it has been visible for the full duration.
    pub fn update(&mut self, now: f64) {
        if let TransitionState::Transitioning { started_at } = self.state {
            if now - started_at >= self.fade_duration {
                self.state = TransitionState::Normal;
                tracing::debug!("portal fade finished");
            }
        }
    }

    /// Overlay opacity while fading: black on arrival, easing linearly down
    /// to [`FADE_MIN_ALPHA`] at the end of the duration. `None` when idle.
    pub fn fade_alpha(&self, now: f64) -> Option<f32> {
        match self.state {
            TransitionState::Normal => None,
            TransitionState::Transitioning { started_at } => {
                if self.fade_duration <= 0.0 {
                    return Some(1.0);
                }
                let t = ((now - started_at) / self.fade_duration).clamp(0.0, 1.0) as f32;
                Some(1.0 - (1.0 - FADE_MIN_ALPHA) * t)
            }
        }
    }

    /// Runs one activation check against the current level.
    ///
    /// On a hit with a registered destination, `current` and the player are
    /// updated and the fade starts. An unregistered destination yields
    /// [`LevelError::UnknownDestination`] and changes nothing.
    pub fn check(
        &mut self,
        now: f64,
        player: &mut Player,
        levels: &[Level],
        registry: &LevelRegistry,
        current: &mut usize,
    ) -> Result<Option<Arrival>, LevelError> {
        if self.is_transitioning() {
            return Ok(None);
        }
        let Some(level) = levels.get(*current) else {
            return Ok(None);
        };

        let Some(portal) = find_triggered_portal(level, player) else {
            self.armed = true;
            return Ok(None);
        };
        if !self.armed {
            return Ok(None);
        }
        self.armed = false;

        let Some(link) = level.decorations[portal].portal() else {
            return Ok(None);
        };
        let Some(to) = registry.get(&link.destination).filter(|&i| i < levels.len()) else {
            return Err(LevelError::UnknownDestination {
                level: level.id.clone(),
                portal,
                destination: link.destination.clone(),
            });
        };

        let arrival = Arrival {
            from: *current,
            to,
            portal,
        };
        *current = to;
        player.set_position(link.dest_x, link.dest_y);
        self.state = TransitionState::Transitioning { started_at: now };
        Ok(Some(arrival))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_portal_envelope_uses_thirty_percent() {
        assert!(in_activation_envelope(10.0, 8.0, 1.0, 10.0, 7.0));
        assert!(!in_activation_envelope(10.0, 8.0, 1.0, 10.0, 5.5));
        assert!(in_activation_envelope(10.0, 8.0, 2.0, 10.0, 5.7));
    }

    #[test]
    fn tall_portal_envelope_uses_five_percent() {
        assert!(in_activation_envelope(10.0, 8.0, 3.0, 10.0, 7.7));
        assert!(!in_activation_envelope(10.0, 8.0, 3.0, 10.0, 7.0));
    }

    #[test]
    fn horizontal_envelope_is_twelve_percent() {
        assert!(in_activation_envelope(10.0, 8.0, 1.0, 8.9, 8.0));
        assert!(in_activation_envelope(10.0, 8.0, 1.0, 11.1, 8.0));
        assert!(!in_activation_envelope(10.0, 8.0, 1.0, 8.7, 8.0));
        assert!(!in_activation_envelope(10.0, 8.0, 1.0, 10.0, 8.1));
    }

    #[test]
    fn fade_runs_for_the_full_duration() {
        let mut t = PortalTransition::new(1.0);
        t.state = TransitionState::Transitioning { started_at: 2.0 };
        assert_eq!(t.fade_alpha(2.0), Some(1.0));
        let mid = t.fade_alpha(2.5).expect("fading");
        assert!((mid - 0.95).abs() < 1e-6);
        let end = t.fade_alpha(2.99).expect("fading");
        assert!(end >= FADE_MIN_ALPHA);
        t.update(2.99);
        assert!(t.is_transitioning());
        t.update(3.0);
        assert!(!t.is_transitioning());
        assert_eq!(t.fade_alpha(3.0), None);
    }
}
