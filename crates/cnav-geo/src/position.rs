//! Position provider
//!
//! Foreground permission prompt followed by one high-accuracy fix. Callers
//! that arrive while an acquisition is pending share its outcome, so the user
//! never sees two permission prompts at once. Nothing is cached once an
//! acquisition settles.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smol::future::FutureExt;
use smol::lock::OnceCell;
use smol::Timer;

use crate::{Coordinate, UserPosition};

/// Outcome of a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

/// Platform permission prompt
pub trait PermissionPrompt {
    /// Ask for foreground location access
    fn request_foreground(&self) -> impl Future<Output = PermissionState>;
}

/// Raw reading from the location sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

/// Location sensor failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("location services are disabled")]
    Disabled,

    #[error("sensor failure: {0}")]
    Failure(String),
}

/// Platform location sensor
pub trait Locator {
    /// Read the current position once
    fn current_fix(&self, options: &FixOptions) -> impl Future<Output = Result<Fix, SensorError>>;
}

/// Fix request options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 15_000,
        }
    }
}

impl FixOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Position acquisition error shown to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission was denied")]
    PermissionDenied,

    #[error("current position is unavailable: {0}")]
    PositionUnavailable(String),
}

type Outcome = Result<UserPosition, LocationError>;

/// Single-flight position provider
pub struct PositionProvider<P, L> {
    prompt: P,
    locator: L,
    options: FixOptions,
    in_flight: RefCell<Option<Rc<OnceCell<Outcome>>>>,
}

impl<P: PermissionPrompt, L: Locator> PositionProvider<P, L> {
    pub fn new(prompt: P, locator: L, options: FixOptions) -> Self {
        Self {
            prompt,
            locator,
            options,
            in_flight: RefCell::new(None),
        }
    }

    pub fn options(&self) -> &FixOptions {
        &self.options
    }

    /// Is an acquisition currently shared with new callers?
    pub fn is_pending(&self) -> bool {
        self.in_flight.borrow().is_some()
    }

    /// Acquire the current position, joining a pending acquisition if any
    pub async fn acquire(&self) -> Outcome {
        let cell = self
            .in_flight
            .borrow_mut()
            .get_or_insert_with(|| Rc::new(OnceCell::new()))
            .clone();

        let outcome = cell.get_or_init(|| self.acquire_fresh()).await.clone();
        self.release(&cell);
        outcome
    }

    /// Detach the pending acquisition so the next caller starts afresh.
    ///
    /// Awaiters of the detached acquisition still receive its outcome.
    pub fn cancel(&self) {
        if self.in_flight.borrow_mut().take().is_some() {
            tracing::debug!("Detached pending position acquisition");
        }
    }

    fn release(&self, cell: &Rc<OnceCell<Outcome>>) {
        let mut slot = self.in_flight.borrow_mut();
        if slot.as_ref().is_some_and(|current| Rc::ptr_eq(current, cell)) {
            *slot = None;
        }
    }

    async fn acquire_fresh(&self) -> Outcome {
        if self.prompt.request_foreground().await == PermissionState::Denied {
            tracing::warn!("Location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let timeout = self.options.timeout();
        let fix = self
            .locator
            .current_fix(&self.options)
            .or(async {
                Timer::after(timeout).await;
                Err::<Fix, _>(SensorError::Failure(format!(
                    "timed out after {} ms",
                    timeout.as_millis()
                )))
            })
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        let coordinate = Coordinate::new(fix.latitude, fix.longitude)
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;
        if !(fix.accuracy.is_finite() && fix.accuracy >= 0.0) {
            return Err(LocationError::PositionUnavailable(format!(
                "invalid accuracy: {}",
                fix.accuracy
            )));
        }

        tracing::info!("Position acquired at {} (±{:.0} m)", coordinate, fix.accuracy);
        Ok(UserPosition::new(coordinate, fix.accuracy))
    }
}
