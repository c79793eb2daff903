//! Priority-ordered decision policy

use tracing::debug;
use vision::{LineStatus, LineTrackState, ZoneId, ZoneState, ZoneStates};

use crate::{
    ActionKind, AvoidanceState, DecisionOutput, NavigationConfig, ObstacleAvoidance,
    TurnDirection,
};

/// Chooses one action per cycle.
///
/// Owns the cross-cycle memory (line tracking and the avoidance sequence);
/// call [`DecisionEngine::reset`] when a run starts.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: NavigationConfig,
    line_state: LineTrackState,
    avoidance: ObstacleAvoidance,
}

impl DecisionEngine {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            line_state: LineTrackState::default(),
            avoidance: ObstacleAvoidance::new(),
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn line_state(&self) -> &LineTrackState {
        &self.line_state
    }

    pub fn avoidance_state(&self) -> AvoidanceState {
        self.avoidance.state()
    }

    pub fn reset(&mut self) {
        self.line_state.reset();
        self.avoidance.reset();
    }

    /// Decide this cycle's action.
    ///
    /// Precedence: obstacle sequence, end of course, intersection, U-turn
    /// sign, 90 degree turns, then line following. A red zone still ends
    /// the course while the obstacle sequence is running.
    ///
    /// Line tracking and the obstacle sequence both advance on every call,
    /// whichever action wins.
    pub fn decide(
        &mut self,
        zones: &ZoneStates,
        distance_cm: f32,
        line_offset: Option<i32>,
    ) -> DecisionOutput {
        let phase = self
            .avoidance
            .advance(distance_cm, self.config.obstacle_threshold_cm);
        let reading = self.line_state.advance(line_offset, self.config.max_gap_frames);

        if zones.any_red() {
            return DecisionOutput::new(ActionKind::EndOfCourse, 0);
        }

        if let Some(phase) = phase {
            return DecisionOutput::new(ActionKind::AvoidObstacle(phase), 0);
        }

        let cm = zones[ZoneId::CenterTop];
        let ce = zones[ZoneId::CenterLeft];
        let cd = zones[ZoneId::CenterRight];
        let be = zones[ZoneId::RearLeft];
        let bd = zones[ZoneId::RearRight];

        if be == ZoneState::Black && bd == ZoneState::Black {
            let error = line_offset.unwrap_or(self.line_state.last_error);
            return DecisionOutput::new(ActionKind::CrossIntersection, error);
        }

        if be == ZoneState::Green && bd == ZoneState::Green {
            return DecisionOutput::new(ActionKind::UTurn, 0);
        }

        if cm == ZoneState::White {
            if ce == ZoneState::Black && cd == ZoneState::White {
                return DecisionOutput::new(ActionKind::Turn90(TurnDirection::Left), 0);
            }
            if cd == ZoneState::Black && ce == ZoneState::White {
                return DecisionOutput::new(ActionKind::Turn90(TurnDirection::Right), 0);
            }
        }

        let action = match reading.status {
            LineStatus::Following => ActionKind::FollowLine,
            LineStatus::CrossingGap => ActionKind::CrossGap,
            LineStatus::Searching => ActionKind::SearchLine,
        };
        debug!(
            action = action.label(),
            error = reading.error,
            gap = self.line_state.gap_counter,
            "Line decision"
        );
        DecisionOutput::new(action, reading.error)
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AvoidancePhase;
    use proptest::prelude::*;

    const CLEAR: f32 = 999.0;

    fn zones(cm: ZoneState, ce: ZoneState, cd: ZoneState, be: ZoneState, bd: ZoneState) -> ZoneStates {
        ZoneStates::default()
            .with(ZoneId::CenterTop, cm)
            .with(ZoneId::CenterLeft, ce)
            .with(ZoneId::CenterRight, cd)
            .with(ZoneId::RearLeft, be)
            .with(ZoneId::RearRight, bd)
    }

    fn any_zone_state() -> impl Strategy<Value = ZoneState> {
        prop::sample::select(vec![ZoneState::Black, ZoneState::White, ZoneState::Green, ZoneState::Red])
    }

    fn any_zones() -> impl Strategy<Value = ZoneStates> {
        prop::array::uniform5(any_zone_state()).prop_map(|[cm, ce, cd, be, bd]| zones(cm, ce, cd, be, bd))
    }

    #[test]
    fn test_left_turn_scenario() {
        use ZoneState::*;
        let mut engine = DecisionEngine::default();
        let out = engine.decide(&zones(White, Black, White, White, White), CLEAR, Some(3));
        assert_eq!(out.action, ActionKind::Turn90(TurnDirection::Left));
        assert_eq!(out.action.label(), "Curva de 90 Esquerda");
    }

    #[test]
    fn test_right_turn_needs_white_centre() {
        use ZoneState::*;
        let mut engine = DecisionEngine::default();
        let out = engine.decide(&zones(White, White, Black, White, White), CLEAR, Some(0));
        assert_eq!(out.action, ActionKind::Turn90(TurnDirection::Right));

        let out = engine.decide(&zones(Black, White, Black, White, White), CLEAR, Some(0));
        assert_eq!(out.action, ActionKind::FollowLine);
    }

    #[test]
    fn test_u_turn_on_double_green() {
        use ZoneState::*;
        let mut engine = DecisionEngine::default();
        let out = engine.decide(&zones(White, Black, White, Green, Green), CLEAR, None);
        assert_eq!(out.action, ActionKind::UTurn);
    }

    #[test]
    fn test_obstacle_preempts_line_following() {
        let mut engine = DecisionEngine::default();
        let out = engine.decide(&ZoneStates::default(), 10.0, Some(20));
        assert_eq!(out.action, ActionKind::AvoidObstacle(AvoidancePhase::Diverting));
        // The line is still tracked underneath
        assert_eq!(engine.line_state().last_error, 20);
    }

    #[test]
    fn test_avoidance_runs_to_completion() {
        use AvoidancePhase::*;
        let mut engine = DecisionEngine::default();
        let plain = ZoneStates::default();

        let actions: Vec<_> = (0..5)
            .map(|i| engine.decide(&plain, if i == 0 { 10.0 } else { CLEAR }, Some(4)).action)
            .collect();

        assert_eq!(
            actions,
            vec![
                ActionKind::AvoidObstacle(Diverting),
                ActionKind::AvoidObstacle(Rounding),
                ActionKind::AvoidObstacle(Realigning),
                ActionKind::AvoidObstacle(Searching),
                ActionKind::FollowLine,
            ]
        );
    }

    #[test]
    fn test_red_ends_course_during_avoidance() {
        let mut engine = DecisionEngine::default();
        engine.decide(&ZoneStates::default(), 10.0, None);

        let red = ZoneStates::default().with(ZoneId::CenterTop, ZoneState::Red);
        let out = engine.decide(&red, 10.0, None);
        assert_eq!(out.action, ActionKind::EndOfCourse);
        // The sequence still moved on underneath
        assert_eq!(engine.avoidance_state(), AvoidanceState::Rounding);
    }

    #[test]
    fn test_gap_then_search() {
        let mut engine = DecisionEngine::new(NavigationConfig {
            max_gap_frames: 2,
            ..Default::default()
        });
        let plain = ZoneStates::default();

        assert_eq!(engine.decide(&plain, CLEAR, Some(-7)).action, ActionKind::FollowLine);
        let gap = engine.decide(&plain, CLEAR, None);
        assert_eq!(gap, DecisionOutput::new(ActionKind::CrossGap, -7));
        let lost = engine.decide(&plain, CLEAR, None);
        assert_eq!(lost, DecisionOutput::new(ActionKind::SearchLine, 0));

        engine.reset();
        assert_eq!(*engine.line_state(), LineTrackState::default());
    }

    #[test]
    fn test_intersection_keeps_last_error_without_line() {
        use ZoneState::*;
        let mut engine = DecisionEngine::default();
        engine.decide(&ZoneStates::default(), CLEAR, Some(12));

        let out = engine.decide(&zones(White, White, White, Black, Black), CLEAR, None);
        assert_eq!(out, DecisionOutput::new(ActionKind::CrossIntersection, 12));
        assert_eq!(engine.line_state().gap_counter, 1);
    }

    #[test]
    fn test_visible_line_restarts_gap_window_on_any_action() {
        use ZoneState::*;
        let mut engine = DecisionEngine::default();
        let plain = ZoneStates::default();
        let crossing = zones(White, White, White, Black, Black);

        engine.decide(&plain, CLEAR, Some(5));
        for _ in 0..14 {
            assert_eq!(engine.decide(&plain, CLEAR, None).action, ActionKind::CrossGap);
        }
        for _ in 0..10 {
            let out = engine.decide(&crossing, CLEAR, Some(-30));
            assert_eq!(out, DecisionOutput::new(ActionKind::CrossIntersection, -30));
        }
        assert_eq!(*engine.line_state(), LineTrackState { last_error: -30, gap_counter: 0 });

        let out = engine.decide(&plain, CLEAR, None);
        assert_eq!(out, DecisionOutput::new(ActionKind::CrossGap, -30));
    }

    #[test]
    fn test_turn_cycle_updates_last_error() {
        use ZoneState::*;
        let mut engine = DecisionEngine::default();
        engine.decide(&ZoneStates::default(), CLEAR, None);

        let out = engine.decide(&zones(White, Black, White, White, White), CLEAR, Some(42));
        assert_eq!(out.action, ActionKind::Turn90(TurnDirection::Left));
        assert_eq!(*engine.line_state(), LineTrackState { last_error: 42, gap_counter: 0 });
    }

    proptest! {
        #[test]
        fn test_intersection_priority(
            cm in any_zone_state(),
            ce in any_zone_state(),
            cd in any_zone_state(),
            offset in prop::option::of(-160i32..160),
        ) {
            prop_assume!(![cm, ce, cd].contains(&ZoneState::Red));
            let mut engine = DecisionEngine::default();
            let out = engine.decide(&zones(cm, ce, cd, ZoneState::Black, ZoneState::Black), CLEAR, offset);
            prop_assert_eq!(out.action, ActionKind::CrossIntersection);
        }

        #[test]
        fn test_red_priority(
            states in any_zones(),
            red_zone in prop::sample::select(ZoneId::ALL.to_vec()),
            distance in 0.0f32..1000.0,
            offset in prop::option::of(-160i32..160),
            warmup in 0usize..6,
        ) {
            let mut engine = DecisionEngine::default();
            for _ in 0..warmup {
                engine.decide(&ZoneStates::default(), distance, offset);
            }
            let out = engine.decide(&states.with(red_zone, ZoneState::Red), distance, offset);
            prop_assert_eq!(out.action, ActionKind::EndOfCourse);
        }
    }
}
