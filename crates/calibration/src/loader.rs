//! Profile loading from the calibration store

use std::path::Path;

use config::{Config, Environment, File};
use tracing::info;

use crate::{CalibrationError, CalibrationProfile};

/// Load and validate a calibration profile.
///
/// Fields missing from the file keep their defaults. `LINEBOT_CALIBRATION__*`
/// environment variables override scalar fields.
pub fn load_profile(path: impl AsRef<Path>) -> Result<CalibrationProfile, CalibrationError> {
    let path = path.as_ref();
    let settings = Config::builder()
        .add_source(File::from(path))
        .add_source(
            Environment::with_prefix("LINEBOT_CALIBRATION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let profile: CalibrationProfile = settings.try_deserialize()?;
    profile.validate()?;

    info!(
        "Calibration loaded from {}: black<={} white>={}",
        path.display(),
        profile.black_cutoff,
        profile.white_cutoff
    );
    Ok(profile)
}
