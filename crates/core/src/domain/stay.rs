use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::OperationError;

/// Canonical storage format for stay timestamps. Lexicographic order on this
/// format equals chronological order, which the overlap predicate in SQL
/// relies on.
pub const STAY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_FORMATS: &[&str] =
    &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a caller-supplied stay timestamp, with or without seconds.
pub fn parse_stay_datetime(value: &str) -> Result<NaiveDateTime, OperationError> {
    let trimmed = value.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| OperationError::InvalidDateTime(value.to_string()))
}

/// A half-open stay interval `[check_in, check_out)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayWindow {
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
}

impl StayWindow {
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, OperationError> {
        Ok(Self {
            check_in: parse_stay_datetime(check_in)?,
            check_out: parse_stay_datetime(check_out)?,
        })
    }

    /// Half-open interval overlap: `[a,b)` and `[c,d)` overlap iff
    /// `a < d && c < b`.
    pub fn overlaps(&self, other: &StayWindow) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    pub fn check_in_stored(&self) -> String {
        self.check_in.format(STAY_DATETIME_FORMAT).to_string()
    }

    pub fn check_out_stored(&self) -> String {
        self.check_out.format(STAY_DATETIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_stay_datetime, StayWindow};
    use crate::errors::OperationError;

    fn window(check_in: &str, check_out: &str) -> StayWindow {
        StayWindow::parse(check_in, check_out).expect("valid window")
    }

    #[test]
    fn accepts_minute_and_second_precision() {
        let with_seconds = parse_stay_datetime("2025-05-10 14:00:00").expect("with seconds");
        let without_seconds = parse_stay_datetime("2025-05-10 14:00").expect("without seconds");
        assert_eq!(with_seconds, without_seconds);
    }

    #[test]
    fn accepts_t_separator() {
        let spaced = parse_stay_datetime("2025-05-10 14:00").expect("spaced");
        let iso = parse_stay_datetime("2025-05-10T14:00").expect("iso");
        assert_eq!(spaced, iso);
    }

    #[test]
    fn rejects_garbage_with_invalid_datetime() {
        let error = parse_stay_datetime("next friday").expect_err("should fail");
        assert!(matches!(error, OperationError::InvalidDateTime(_)));
    }

    #[test]
    fn stored_form_normalizes_to_second_precision() {
        let stay = window("2025-05-10 14:00", "2025-05-12 11:00");
        assert_eq!(stay.check_in_stored(), "2025-05-10 14:00:00");
        assert_eq!(stay.check_out_stored(), "2025-05-12 11:00:00");
    }

    #[test]
    fn overlapping_windows_are_detected() {
        let existing = window("2025-05-10 14:00", "2025-05-12 11:00");
        let requested = window("2025-05-11 00:00", "2025-05-13 00:00");
        assert!(existing.overlaps(&requested));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let existing = window("2025-05-10 14:00", "2025-05-12 11:00");
        let requested = window("2025-05-12 11:00", "2025-05-14 00:00");
        assert!(!existing.overlaps(&requested));
        assert!(!requested.overlaps(&existing));
    }
}
