//! The patient queue view model.
//!
//! Rows are recomputed against a supplied clock instant, so the once-a-minute
//! refresh timer is pure re-render with no side effects. Selecting a patient
//! goes through the MR identity challenge before the record opens.

use std::time::Duration;

use eyenotes_types::{MrNumber, Patient};

use crate::shell::Route;

/// How often the queue recomputes elapsed waits.
pub const QUEUE_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

const HOUR_MS: i64 = 60 * 60 * 1000;
const MINUTE_MS: i64 = 60 * 1000;

/// Wait-time severity driving the station pill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitSeverity {
    Normal,
    /// Waiting for more than one hour.
    Warning,
    /// Waiting for more than two hours.
    Danger,
}

/// Elapsed wait label, e.g. `2 Hrs 22 Mins` or `45 Mins`.
///
/// Patients without a check-in instant show `0 Mins`.
pub fn elapsed_wait_label(check_in_millis: Option<i64>, now_millis: i64) -> String {
    let Some(check_in) = check_in_millis else {
        return "0 Mins".into();
    };

    let elapsed = (now_millis - check_in).max(0);
    let hours = elapsed / HOUR_MS;
    let minutes = (elapsed % HOUR_MS) / MINUTE_MS;

    if hours > 0 {
        format!("{hours} Hrs {minutes} Mins")
    } else {
        format!("{minutes} Mins")
    }
}

pub fn wait_severity(check_in_millis: Option<i64>, now_millis: i64) -> WaitSeverity {
    let Some(check_in) = check_in_millis else {
        return WaitSeverity::Normal;
    };

    let elapsed = now_millis - check_in;
    if elapsed > 2 * HOUR_MS {
        WaitSeverity::Danger
    } else if elapsed > HOUR_MS {
        WaitSeverity::Warning
    } else {
        WaitSeverity::Normal
    }
}

/// One row of the queue table.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRow {
    pub patient_id: String,
    pub name: String,
    pub parent_info: String,
    pub age: u32,
    pub gender: String,
    pub visit_type: String,
    pub hospital_reg_time: String,
    pub clinical_in_time: String,
    pub purpose: String,
    pub elapsed_wait: String,
    pub wait_severity: WaitSeverity,
    pub assigned_to: String,
    pub last_visit_date: String,
    pub last_clinic: String,
}

/// Builds the queue table for a clock instant.
pub fn queue_rows(patients: &[Patient], now_millis: i64) -> Vec<QueueRow> {
    patients
        .iter()
        .map(|patient| QueueRow {
            patient_id: patient.id.clone(),
            name: patient.name.clone(),
            parent_info: if patient.parent_info.is_empty() {
                "S/O -".into()
            } else {
                patient.parent_info.clone()
            },
            age: patient.age,
            gender: patient.gender.clone(),
            visit_type: patient.visit_type.to_string(),
            hospital_reg_time: patient.hospital_reg_time.clone(),
            clinical_in_time: patient.clinical_in_time.clone(),
            purpose: patient.purpose.clone(),
            elapsed_wait: elapsed_wait_label(patient.check_in_timestamp, now_millis),
            wait_severity: wait_severity(patient.check_in_timestamp, now_millis),
            assigned_to: if patient.assigned_to.is_empty() {
                "Unassigned".into()
            } else {
                patient.assigned_to.clone()
            },
            last_visit_date: patient.last_visit_date.clone(),
            last_clinic: patient.last_clinic.clone(),
        })
        .collect()
}

/// Number of patients currently waiting.
pub fn waiting_count(patients: &[Patient]) -> usize {
    patients.iter().filter(|p| p.status == "Waiting").count()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MrChallengeError {
    #[error("please enter the last 3 digits of the MR number")]
    MissingInput,
    #[error("incorrect digits; hint: the last 3 digits of {mr_number}")]
    Mismatch { mr_number: String },
}

/// The identity challenge shown before a record opens.
///
/// Exactly the last three characters of the patient's MR number must be
/// entered (string equality). A mismatch is retryable with no attempt limit.
pub fn verify_mr(patient: &Patient, input: &str) -> Result<Route, MrChallengeError> {
    if input.is_empty() {
        return Err(MrChallengeError::MissingInput);
    }

    let expected = match MrNumber::new(&patient.mr_number) {
        Ok(mr) => mr.last_three().to_owned(),
        Err(_) => String::new(),
    };

    if input == expected {
        Ok(Route::Record {
            patient_id: patient.id.clone(),
        })
    } else {
        Err(MrChallengeError::Mismatch {
            mr_number: patient.mr_number.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(mr: &str) -> Patient {
        Patient {
            id: "P758184".into(),
            mr_number: mr.into(),
            name: "Hari Prasad".into(),
            status: "Waiting".into(),
            ..Patient::default()
        }
    }

    #[test]
    fn elapsed_label_formats_hours_and_minutes() {
        let now = 10 * HOUR_MS;
        assert_eq!(
            elapsed_wait_label(Some(now - (2 * HOUR_MS + 22 * MINUTE_MS)), now),
            "2 Hrs 22 Mins"
        );
        assert_eq!(elapsed_wait_label(Some(now - 45 * MINUTE_MS), now), "45 Mins");
        assert_eq!(elapsed_wait_label(None, now), "0 Mins");
    }

    #[test]
    fn elapsed_label_never_goes_negative() {
        assert_eq!(elapsed_wait_label(Some(5 * MINUTE_MS), 0), "0 Mins");
    }

    #[test]
    fn severity_thresholds_are_one_and_two_hours() {
        let now = 10 * HOUR_MS;
        assert_eq!(
            wait_severity(Some(now - 30 * MINUTE_MS), now),
            WaitSeverity::Normal
        );
        assert_eq!(
            wait_severity(Some(now - 90 * MINUTE_MS), now),
            WaitSeverity::Warning
        );
        assert_eq!(
            wait_severity(Some(now - 150 * MINUTE_MS), now),
            WaitSeverity::Danger
        );
        assert_eq!(wait_severity(None, now), WaitSeverity::Normal);
    }

    #[test]
    fn matching_last_three_digits_navigates_to_the_record() {
        let route = verify_mr(&patient("758184"), "184").expect("digits should match");
        assert_eq!(
            route,
            Route::Record {
                patient_id: "P758184".into()
            }
        );
    }

    #[test]
    fn wrong_digits_give_a_hinted_retryable_error() {
        let err = verify_mr(&patient("758184"), "999").expect_err("digits should mismatch");
        assert_eq!(
            err,
            MrChallengeError::Mismatch {
                mr_number: "758184".into()
            }
        );
        // Retry with the right digits still works.
        assert!(verify_mr(&patient("758184"), "184").is_ok());
    }

    #[test]
    fn empty_input_is_prompted_for() {
        assert_eq!(
            verify_mr(&patient("758184"), ""),
            Err(MrChallengeError::MissingInput)
        );
    }

    #[test]
    fn queue_rows_carry_wait_and_defaults() {
        let mut p = patient("758184");
        p.check_in_timestamp = Some(0);
        p.parent_info = String::new();
        p.assigned_to = String::new();

        let rows = queue_rows(&[p], 75 * MINUTE_MS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].elapsed_wait, "1 Hrs 15 Mins");
        assert_eq!(rows[0].wait_severity, WaitSeverity::Warning);
        assert_eq!(rows[0].parent_info, "S/O -");
        assert_eq!(rows[0].assigned_to, "Unassigned");
    }

    #[test]
    fn waiting_count_filters_by_status() {
        let mut done = patient("111111");
        done.status = "Completed".into();
        assert_eq!(waiting_count(&[patient("758184"), done]), 1);
    }
}
