//! Constant-distance sensor for bench runs

use tracing::info;

use crate::{DistanceSensor, SensorError};

/// Always reports the same distance
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance {
    distance_cm: f32,
}

impl FixedDistance {
    pub fn new(distance_cm: f32) -> Result<Self, SensorError> {
        if !distance_cm.is_finite() || distance_cm < 0.0 {
            return Err(SensorError::Init(format!("invalid fixed distance {}", distance_cm)));
        }
        info!("Using fixed distance sensor at {} cm", distance_cm);
        Ok(Self { distance_cm })
    }
}

impl DistanceSensor for FixedDistance {
    fn measure_distance(&mut self) -> f32 {
        self.distance_cm
    }
}
