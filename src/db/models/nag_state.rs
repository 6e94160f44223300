// Nag State Record Model
// Per-certificate count of expiration warnings already sent. The counter is
// monotonically non-decreasing and bounded by the number of configured
// warning thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nag state record in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NagStateRecord {
    pub serial: String,
    pub sent_count: i64,
    pub updated_at: DateTime<Utc>,
}

impl NagStateRecord {
    /// Create new nag state record with no warnings sent
    pub fn new(serial: String) -> Self {
        Self {
            serial,
            sent_count: 0,
            updated_at: Utc::now(),
        }
    }
}
