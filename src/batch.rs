//! Batch runner for forecasting many farms at once
//!
//! Each profile is forecast independently on the rayon pool; a bad profile
//! fails on its own without affecting the rest of the batch.

use log::warn;
use rayon::prelude::*;

use crate::error::ForecastError;
use crate::farm::FarmProfile;
use crate::forecast::ForecastResult;

/// Forecast outcome for one profile in a batch
#[derive(Debug)]
pub struct ProfileOutcome {
    pub farm_name: String,
    pub result: Result<ForecastResult, ForecastError>,
}

impl ProfileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Forecast every profile in parallel, preserving input order
pub fn forecast_profiles(profiles: &[FarmProfile]) -> Vec<ProfileOutcome> {
    profiles
        .par_iter()
        .map(|profile| {
            let result = profile.forecast();
            if let Err(e) = &result {
                warn!("forecast failed for {}: {}", profile.display_name(), e);
            }
            ProfileOutcome {
                farm_name: profile.farm_name.clone(),
                result,
            }
        })
        .collect()
}
