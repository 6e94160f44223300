// Warning Windows
// Partitions the time from now until the largest threshold into
// non-overlapping half-open windows, one per configured warning threshold

use crate::MailerError;
use chrono::{DateTime, Duration, Utc};

/// Ordered warning thresholds in days before expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningThresholds {
    days: Vec<i64>,
}

/// One threshold's half-open time window [left, right)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningWindow {
    /// 0-based threshold index; window 0 covers the most imminent expiries
    pub index: usize,
    /// The threshold that produced this window, in days before expiry
    pub days: i64,
    pub left: DateTime<Utc>,
    pub right: DateTime<Utc>,
    /// Certificates qualify while sent_count < max_nag_count; a successful
    /// dispatch sets the counter to exactly this value
    pub max_nag_count: i64,
}

impl WarningThresholds {
    /// Create a threshold list; days must be positive and strictly ascending
    pub fn new(days: Vec<i64>) -> crate::Result<Self> {
        if days.is_empty() {
            return Err(MailerError::ThresholdError {
                message: "at least one warning threshold is required".to_string(),
            }
            .into());
        }

        if days.iter().any(|&d| d <= 0) {
            return Err(MailerError::ThresholdError {
                message: format!("thresholds must be positive: {:?}", days),
            }
            .into());
        }

        if days.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(MailerError::ThresholdError {
                message: format!("thresholds must be strictly ascending: {:?}", days),
            }
            .into());
        }

        Ok(Self { days })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &[i64] {
        &self.days
    }

    /// Materialise the windows for a run starting at `now`. Window i covers
    /// [now + days[i-1], now + days[i]) with window 0 starting at `now`, so
    /// together they partition [now, now + max(days)).
    pub fn windows(&self, now: DateTime<Utc>) -> Vec<WarningWindow> {
        let count = self.days.len() as i64;

        self.days
            .iter()
            .enumerate()
            .map(|(index, &days)| {
                let left = if index == 0 {
                    now
                } else {
                    now + Duration::days(self.days[index - 1])
                };
                let right = now + Duration::days(days);

                WarningWindow {
                    index,
                    days,
                    left,
                    right,
                    max_nag_count: count - index as i64,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(days: &[i64]) -> WarningThresholds {
        WarningThresholds::new(days.to_vec()).unwrap()
    }

    #[test]
    fn test_empty_thresholds_rejected() {
        assert!(WarningThresholds::new(vec![]).is_err());
    }

    #[test]
    fn test_non_positive_thresholds_rejected() {
        assert!(WarningThresholds::new(vec![0, 3]).is_err());
        assert!(WarningThresholds::new(vec![-1, 3]).is_err());
    }

    #[test]
    fn test_unsorted_thresholds_rejected() {
        assert!(WarningThresholds::new(vec![3, 1]).is_err());
        assert!(WarningThresholds::new(vec![1, 1]).is_err());
    }

    #[test]
    fn test_single_threshold_window() {
        let now = Utc::now();
        let windows = thresholds(&[7]).windows(now);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].left, now);
        assert_eq!(windows[0].right, now + Duration::days(7));
        assert_eq!(windows[0].max_nag_count, 1);
    }

    #[test]
    fn test_windows_partition_interval() {
        let now = Utc::now();
        let windows = thresholds(&[1, 3, 7, 14]).windows(now);

        assert_eq!(windows.len(), 4);

        // First window starts at now, last ends at now + max threshold
        assert_eq!(windows[0].left, now);
        assert_eq!(windows[3].right, now + Duration::days(14));

        // Adjacent windows share a boundary: non-overlapping and gap-free
        for pair in windows.windows(2) {
            assert_eq!(pair[0].right, pair[1].left);
        }
    }

    #[test]
    fn test_max_nag_counts_step_down() {
        let now = Utc::now();
        let windows = thresholds(&[1, 3, 7, 14]).windows(now);

        let counts: Vec<i64> = windows.iter().map(|w| w.max_nag_count).collect();
        assert_eq!(counts, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_concrete_scenario_window_bounds() {
        // Thresholds [1, 3, 7, 14]: window i=1 is [now + 1d, now + 3d), so a
        // certificate expiring at now + 2d falls inside it
        let now = Utc::now();
        let windows = thresholds(&[1, 3, 7, 14]).windows(now);

        let expiry = now + Duration::days(2);
        let window = &windows[1];

        assert!(window.left <= expiry && expiry < window.right);
        assert_eq!(window.max_nag_count, 3);
    }

    #[test]
    fn test_windows_ascend_with_urgency_first() {
        let now = Utc::now();
        let windows = thresholds(&[2, 5]).windows(now);

        assert_eq!(windows[0].index, 0);
        assert_eq!(windows[0].days, 2);
        assert!(windows[0].right <= windows[1].right);
    }
}
