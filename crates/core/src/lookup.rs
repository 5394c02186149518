// crates/core/src/lookup.rs
//! Search controller: submit a plate lookup, then track the resulting job.

use std::sync::Arc;

use plate_watch_types::{JobId, LookupQuery, VehicleType, DEFAULT_MAX_RETRIES};

use crate::api::JobSubmitter;
use crate::error::LookupError;
use crate::plate::normalize_plate;
use crate::tracker::JobTracker;

/// Couples a [`JobSubmitter`] with a [`JobTracker`].
///
/// Each search replaces the previous one: the old session is torn down
/// before the new job is submitted.
pub struct PlateLookup {
    submitter: Arc<dyn JobSubmitter>,
    tracker: JobTracker,
    max_retries: u8,
}

impl PlateLookup {
    pub fn new(submitter: Arc<dyn JobSubmitter>, tracker: JobTracker) -> Self {
        Self {
            submitter,
            tracker,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Captcha retry budget sent with every submission.
    pub fn with_max_retries(mut self, max_retries: u8) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Submit a lookup for `plate` and start tracking it.
    ///
    /// Invalid plates never reach the submitter. A submission failure is
    /// returned as-is and leaves the tracker idle.
    pub async fn search(
        &mut self,
        plate: &str,
        vehicle_type: VehicleType,
    ) -> Result<JobId, LookupError> {
        self.tracker.stop().await;

        let license_plate = normalize_plate(plate)?;
        let query =
            LookupQuery::new(license_plate, vehicle_type).with_max_retries(self.max_retries);

        let ticket = self.submitter.submit(&query).await.map_err(|e| {
            tracing::warn!(
                license_plate = %query.license_plate,
                error = %e,
                "Lookup submission failed"
            );
            e
        })?;

        tracing::info!(
            job_id = %ticket.job_id,
            license_plate = %query.license_plate,
            vehicle_type = %query.vehicle_type,
            "Lookup submitted"
        );

        self.tracker.set_enabled(true).await;
        self.tracker.track(ticket.job_id.clone()).await;
        Ok(ticket.job_id)
    }

    /// Start over: stop tracking and clear the observable state.
    pub async fn reset(&mut self) {
        self.tracker.stop().await;
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut JobTracker {
        &mut self.tracker
    }
}
