//! Ultrasonic pulse-timing sensor

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::{DistanceSensor, ObstacleConfig, SensorError, SENTINEL_DISTANCE_CM};

/// Speed of sound in cm/s
const SPEED_OF_SOUND_CM_S: f32 = 34_300.0;

/// GPIO lines of a trigger/echo ultrasonic module
pub trait EchoPin {
    fn set_trigger(&mut self, high: bool);
    fn echo_is_high(&mut self) -> bool;
}

/// One-way distance for a round-trip echo pulse
pub fn distance_from_pulse(width: Duration) -> f32 {
    width.as_secs_f32() * SPEED_OF_SOUND_CM_S / 2.0
}

/// Ultrasonic obstacle monitor
pub struct ObstacleMonitor<P> {
    pin: P,
    config: ObstacleConfig,
}

impl<P: EchoPin> ObstacleMonitor<P> {
    pub fn new(mut pin: P, config: ObstacleConfig) -> Result<Self, SensorError> {
        config.validate()?;
        pin.set_trigger(false);
        info!(
            "Ultrasonic sensor ready (timeout {:?}, max {} cm)",
            config.echo_timeout(),
            config.max_plausible_cm
        );
        Ok(Self { pin, config })
    }

    /// Poll the echo line until it reads `level`, giving up at the timeout
    fn wait_for_echo(&mut self, level: bool) -> Option<Instant> {
        let deadline = Instant::now() + self.config.echo_timeout();
        loop {
            if self.pin.echo_is_high() == level {
                return Some(Instant::now());
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::hint::spin_loop();
        }
    }

    /// Raw pulse measurement, `None` on an edge timeout
    fn measure_pulse(&mut self) -> Option<Duration> {
        self.pin.set_trigger(true);
        std::thread::sleep(self.config.trigger_pulse());
        self.pin.set_trigger(false);

        let Some(start) = self.wait_for_echo(true) else {
            debug!("Echo rising edge timed out");
            return None;
        };
        let Some(end) = self.wait_for_echo(false) else {
            debug!("Echo falling edge timed out");
            return None;
        };
        Some(end.duration_since(start))
    }

    fn plausible(&self, distance: f32) -> bool {
        distance > 0.0 && distance < self.config.max_plausible_cm
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: EchoPin> DistanceSensor for ObstacleMonitor<P> {
    fn measure_distance(&mut self) -> f32 {
        match self.measure_pulse().map(distance_from_pulse) {
            Some(distance) if self.plausible(distance) => distance,
            Some(distance) => {
                debug!("Discarding implausible distance {:.1} cm", distance);
                SENTINEL_DISTANCE_CM
            }
            None => SENTINEL_DISTANCE_CM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Echo goes high after `delay_polls` polls and stays high for `width`
    struct ScriptedPin {
        delay_polls: Option<u32>,
        width: Duration,
        polls: u32,
        rose_at: Option<Instant>,
        triggers: u32,
    }

    impl ScriptedPin {
        fn echo(delay_polls: u32, width: Duration) -> Self {
            Self {
                delay_polls: Some(delay_polls),
                width,
                polls: 0,
                rose_at: None,
                triggers: 0,
            }
        }

        fn silent() -> Self {
            Self {
                delay_polls: None,
                ..Self::echo(0, Duration::ZERO)
            }
        }
    }

    impl EchoPin for ScriptedPin {
        fn set_trigger(&mut self, high: bool) {
            if high {
                self.triggers += 1;
            }
        }

        fn echo_is_high(&mut self) -> bool {
            self.polls += 1;
            match (self.delay_polls, self.rose_at) {
                (None, _) => false,
                (Some(delay), None) if self.polls > delay => {
                    self.rose_at = Some(Instant::now());
                    true
                }
                (Some(_), None) => false,
                (Some(_), Some(rose)) => {
                    if self.width == Duration::MAX {
                        return true;
                    }
                    rose.elapsed() < self.width
                }
            }
        }
    }

    fn fast_config() -> ObstacleConfig {
        ObstacleConfig {
            echo_timeout_ms: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_pulse_to_distance() {
        // 1 ms round trip is 17.15 cm
        let d = distance_from_pulse(Duration::from_millis(1));
        assert!((d - 17.15).abs() < 0.01);
    }

    #[test]
    fn test_measures_echo() {
        let pin = ScriptedPin::echo(3, Duration::from_millis(1));
        let mut monitor = ObstacleMonitor::new(pin, fast_config()).unwrap();
        let d = monitor.measure_distance();
        assert!(d > 10.0 && d < 100.0, "distance was {}", d);
        assert_eq!(monitor.into_inner().triggers, 1);
    }

    #[test]
    fn test_missing_echo_is_sentinel() {
        let mut monitor = ObstacleMonitor::new(ScriptedPin::silent(), fast_config()).unwrap();

        let started = Instant::now();
        assert_eq!(monitor.measure_distance(), SENTINEL_DISTANCE_CM);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_stuck_high_echo_is_sentinel() {
        let pin = ScriptedPin::echo(0, Duration::MAX);
        let mut monitor = ObstacleMonitor::new(pin, fast_config()).unwrap();
        assert_eq!(monitor.measure_distance(), SENTINEL_DISTANCE_CM);
    }

    #[test]
    fn test_far_echo_is_sentinel() {
        // 30 ms round trip is about 514 cm, past the plausible band
        let pin = ScriptedPin::echo(0, Duration::from_millis(30));
        let config = ObstacleConfig {
            echo_timeout_ms: 100,
            ..Default::default()
        };
        let mut monitor = ObstacleMonitor::new(pin, config).unwrap();
        assert_eq!(monitor.measure_distance(), SENTINEL_DISTANCE_CM);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = ObstacleConfig {
            echo_timeout_ms: 0,
            ..Default::default()
        };
        assert!(ObstacleMonitor::new(ScriptedPin::silent(), config).is_err());
    }

    proptest! {
        #[test]
        fn test_plausibility_band(distance in -100.0f32..2000.0) {
            let monitor = ObstacleMonitor::new(ScriptedPin::silent(), fast_config()).unwrap();
            prop_assert_eq!(monitor.plausible(distance), distance > 0.0 && distance < 400.0);
        }
    }
}
