//! Stand-in device seams for the shell

use cnav_engine::geo::{
    Coordinate, Fix, FixOptions, Locator, PermissionPrompt, PermissionState, SensorError,
};

/// Grants location access without asking
pub struct AutoGrant;

impl PermissionPrompt for AutoGrant {
    async fn request_foreground(&self) -> PermissionState {
        tracing::info!("Location permission granted (shell)");
        PermissionState::Granted
    }
}

/// Always reports the same position
pub struct FixedLocator {
    fix: Fix,
}

impl FixedLocator {
    pub fn new(coordinate: Coordinate, accuracy: f64) -> Self {
        Self {
            fix: Fix {
                latitude: coordinate.lat,
                longitude: coordinate.lng,
                accuracy,
            },
        }
    }
}

impl Locator for FixedLocator {
    async fn current_fix(&self, options: &FixOptions) -> Result<Fix, SensorError> {
        tracing::debug!(
            "Fix requested (high accuracy: {}, timeout {} ms)",
            options.enable_high_accuracy,
            options.timeout_ms
        );
        Ok(self.fix)
    }
}
