//! Driving actions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Turn side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn opposite(self) -> Self {
        match self {
            TurnDirection::Left => TurnDirection::Right,
            TurnDirection::Right => TurnDirection::Left,
        }
    }
}

/// Steps of the obstacle avoidance sequence, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvoidancePhase {
    /// Turn away from the obstacle
    Diverting,
    /// Drive alongside it
    Rounding,
    /// Turn back towards the course
    Realigning,
    /// Advance while looking for the line again
    Searching,
}

/// Where the robot is operating, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Area {
    Course,
    Obstacle,
}

impl Area {
    pub fn label(self) -> &'static str {
        match self {
            Area::Course => "Percurso",
            Area::Obstacle => "Obstaculo",
        }
    }
}

/// Everything the robot can decide to do in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    FollowLine,
    CrossIntersection,
    CrossGap,
    SearchLine,
    Turn90(TurnDirection),
    UTurn,
    AvoidObstacle(AvoidancePhase),
    EndOfCourse,
    Disconnected,
}

impl ActionKind {
    /// Operator-facing label
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::FollowLine => "Seguindo Linha",
            ActionKind::CrossIntersection => "Seguir em Frente",
            ActionKind::CrossGap => "Atravessando Gap",
            ActionKind::SearchLine => "Procurando Linha",
            ActionKind::Turn90(TurnDirection::Left) => "Curva de 90 Esquerda",
            ActionKind::Turn90(TurnDirection::Right) => "Curva de 90 Direita",
            ActionKind::UTurn => "Meia Volta",
            ActionKind::AvoidObstacle(AvoidancePhase::Diverting) => "Obstaculo - Desviar",
            ActionKind::AvoidObstacle(AvoidancePhase::Rounding) => "Obstaculo - Contornar",
            ActionKind::AvoidObstacle(AvoidancePhase::Realigning) => "Obstaculo - Realinhar",
            ActionKind::AvoidObstacle(AvoidancePhase::Searching) => "Obstaculo - Procurar Linha",
            ActionKind::EndOfCourse => "Fim de Pista",
            ActionKind::Disconnected => "Camera Desconectada",
        }
    }

    /// Closed-loop actions steered by the lateral error
    pub fn is_line_following(self) -> bool {
        matches!(
            self,
            ActionKind::FollowLine | ActionKind::CrossIntersection | ActionKind::CrossGap
        )
    }

    /// Open-loop timed actions
    pub fn is_maneuver(self) -> bool {
        matches!(
            self,
            ActionKind::Turn90(_) | ActionKind::UTurn | ActionKind::AvoidObstacle(_)
        )
    }

    pub fn area(self) -> Area {
        match self {
            ActionKind::AvoidObstacle(_) => Area::Obstacle,
            _ => Area::Course,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOutput {
    pub action: ActionKind,
    /// Positive when the line is left of centre; zero for open-loop actions
    pub lateral_error: i32,
}

impl DecisionOutput {
    pub fn new(action: ActionKind, lateral_error: i32) -> Self {
        Self {
            action,
            lateral_error,
        }
    }

    /// Output for a cycle with no frame
    pub fn disconnected() -> Self {
        Self::new(ActionKind::Disconnected, 0)
    }
}
