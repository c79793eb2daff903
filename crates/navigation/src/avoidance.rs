//! Obstacle avoidance sequence

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::AvoidancePhase;

/// Sequence position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvoidanceState {
    #[default]
    Idle,
    Diverting,
    Rounding,
    Realigning,
    Searching,
}

impl AvoidanceState {
    fn phase(self) -> Option<AvoidancePhase> {
        match self {
            AvoidanceState::Idle => None,
            AvoidanceState::Diverting => Some(AvoidancePhase::Diverting),
            AvoidanceState::Rounding => Some(AvoidancePhase::Rounding),
            AvoidanceState::Realigning => Some(AvoidancePhase::Realigning),
            AvoidanceState::Searching => Some(AvoidancePhase::Searching),
        }
    }
}

/// Once triggered, walks every phase in order, one per cycle, without
/// looking at the sensor again.
#[derive(Debug, Clone, Default)]
pub struct ObstacleAvoidance {
    state: AvoidanceState,
}

impl ObstacleAvoidance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AvoidanceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != AvoidanceState::Idle
    }

    /// Step the sequence for this cycle and return the phase to execute.
    ///
    /// `distance_cm` only matters while idle. Leaving `Searching` returns
    /// `None` so normal navigation resumes on that same cycle.
    pub fn advance(&mut self, distance_cm: f32, threshold_cm: f32) -> Option<AvoidancePhase> {
        let next = match self.state {
            AvoidanceState::Idle if distance_cm < threshold_cm => {
                info!("Obstacle at {:.1} cm, starting avoidance", distance_cm);
                AvoidanceState::Diverting
            }
            AvoidanceState::Idle => AvoidanceState::Idle,
            AvoidanceState::Diverting => AvoidanceState::Rounding,
            AvoidanceState::Rounding => AvoidanceState::Realigning,
            AvoidanceState::Realigning => AvoidanceState::Searching,
            AvoidanceState::Searching => {
                info!("Avoidance complete, resuming course");
                AvoidanceState::Idle
            }
        };

        if next != self.state && next != AvoidanceState::Idle {
            debug!(from = ?self.state, to = ?next, "Avoidance phase");
        }
        self.state = next;
        next.phase()
    }

    pub fn reset(&mut self) {
        self.state = AvoidanceState::Idle;
    }
}
