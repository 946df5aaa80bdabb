//! Simulated network latency

use std::time::Duration;

/// Round-trip delay of each mock operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Listing every record
    pub list: Duration,
    /// Listing the cases of one client
    pub by_client: Duration,
    /// Fetching one record
    pub by_id: Duration,
    /// Fetching a nationality record
    pub nationality: Duration,
    /// Creating a record
    pub create: Duration,
    /// Creating a case together with its nationality record
    pub create_with_nationality: Duration,
    /// Updating a record
    pub update: Duration,
    /// Deleting a record
    pub delete: Duration,
}

impl LatencyProfile {
    /// No delay at all
    #[must_use]
    pub const fn none() -> Self {
        Self {
            list: Duration::ZERO,
            by_client: Duration::ZERO,
            by_id: Duration::ZERO,
            nationality: Duration::ZERO,
            create: Duration::ZERO,
            create_with_nationality: Duration::ZERO,
            update: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }

    /// Every delay multiplied by `factor`
    ///
    /// Negative or non-finite factors yield [`LatencyProfile::none`]. Delays
    /// too large for a [`Duration`] saturate at [`Duration::MAX`].
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return Self::none();
        }
        let scale = |d: Duration| {
            Duration::try_from_secs_f64(d.as_secs_f64() * factor).unwrap_or(Duration::MAX)
        };
        Self {
            list: scale(self.list),
            by_client: scale(self.by_client),
            by_id: scale(self.by_id),
            nationality: scale(self.nationality),
            create: scale(self.create),
            create_with_nationality: scale(self.create_with_nationality),
            update: scale(self.update),
            delete: scale(self.delete),
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(500),
            by_client: Duration::from_millis(300),
            by_id: Duration::from_millis(300),
            nationality: Duration::from_millis(200),
            create: Duration::from_millis(300),
            create_with_nationality: Duration::from_millis(400),
            update: Duration::from_millis(300),
            delete: Duration::from_millis(300),
        }
    }
}
