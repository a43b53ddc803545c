// StandardScaler - per-feature mean/std standardization

use serde::{Deserialize, Serialize};

use crate::analysis::features::{FeatureVector, FEATURE_DIM};

/// Floor applied to standard deviations before dividing
pub const STD_EPSILON: f64 = 1e-8;

/// Standardization parameters fitted on a training matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: [f64; FEATURE_DIM],
    /// Population standard deviations (not floored; the floor is applied on use)
    pub stds: [f64; FEATURE_DIM],
}

impl StandardScaler {
    /// Fit means and population standard deviations column by column.
    ///
    /// Returns `None` for an empty matrix.
    pub fn fit(rows: &[FeatureVector]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let count = rows.len() as f64;

        let mut means = [0.0; FEATURE_DIM];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row.as_array()) {
                *mean += value;
            }
        }
        means.iter_mut().for_each(|m| *m /= count);

        let mut stds = [0.0; FEATURE_DIM];
        for row in rows {
            for ((std, value), mean) in stds.iter_mut().zip(row.as_array()).zip(means.iter()) {
                *std += (value - mean).powi(2);
            }
        }
        stds.iter_mut().for_each(|s| *s = (*s / count).sqrt());

        Some(Self { means, stds })
    }

    /// `(x - mean) / max(std, STD_EPSILON)` for every slot
    pub fn transform(&self, features: &FeatureVector) -> [f64; FEATURE_DIM] {
        let mut scaled = [0.0; FEATURE_DIM];
        for (i, value) in features.as_array().iter().enumerate() {
            scaled[i] = (value - self.means[i]) / self.stds[i].max(STD_EPSILON);
        }
        scaled
    }
}
