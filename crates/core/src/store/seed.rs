//! Built-in seed dataset.
//!
//! Used only when the backend is unreachable and no local state exists yet,
//! so the queue is never empty on a fresh workstation.

use eyenotes_types::{Patient, VisitSummary, VisitType};

const MINUTE_MS: i64 = 60 * 1000;

pub(crate) fn seed_patients(now_millis: i64) -> Vec<Patient> {
    vec![
        Patient {
            id: "P758184".into(),
            mr_number: "758184".into(),
            name: "Hari Prasad".into(),
            parent_info: "S/O Ravi Kumar".into(),
            age: 35,
            gender: "Male".into(),
            city: "Chennai".into(),
            state: "Tamil Nadu".into(),
            visit_type: VisitType::Review,
            hospital_reg_time: "07:51 AM".into(),
            clinical_in_time: "07:51 AM".into(),
            check_in_timestamp: Some(now_millis - 142 * MINUTE_MS),
            purpose: "Post Surgical Followup In Retina Clinic".into(),
            assigned_to: "Sivadarshan / -".into(),
            last_visit_date: "11/12/2025".into(),
            last_clinic: "RETINA CLINIC".into(),
            status: "Waiting".into(),
            allergies: "Penicillin".into(),
            conditions: "Diabetic".into(),
            visit_history: vec![
                VisitSummary {
                    id: 23,
                    date: "16-Dec-25".into(),
                    location: "CHN".into(),
                    has_investigation: true,
                    has_glaucoma: true,
                    ..VisitSummary::default()
                },
                VisitSummary {
                    id: 22,
                    date: "06-Nov-25".into(),
                    location: "CHN".into(),
                    has_refraction: true,
                    has_glaucoma: true,
                    ..VisitSummary::default()
                },
            ],
            ..Patient::default()
        },
        Patient {
            id: "P992831".into(),
            mr_number: "992831".into(),
            name: "Avik Dey Sarkar".into(),
            parent_info: "S/O Pradip Sarkar".into(),
            age: 16,
            gender: "Male".into(),
            city: "Madurai".into(),
            state: "Tamil Nadu".into(),
            visit_type: VisitType::Review,
            hospital_reg_time: "08:10 AM".into(),
            clinical_in_time: "08:10 AM".into(),
            check_in_timestamp: Some(now_millis - 105 * MINUTE_MS),
            purpose: "Post Surgical Followup In Retina Clinic".into(),
            assigned_to: "Avik Dey Sarkar / -".into(),
            last_visit_date: "31/07/2024".into(),
            last_clinic: "RETINA CLINIC".into(),
            status: "Waiting".into(),
            visit_history: vec![VisitSummary {
                id: 5,
                date: "10-Dec-25".into(),
                location: "CHN".into(),
                has_glaucoma: true,
                ..VisitSummary::default()
            }],
            ..Patient::default()
        },
        Patient {
            id: "P112233".into(),
            mr_number: "112233".into(),
            name: "Chakram Priyalaxmi".into(),
            parent_info: "D/O Venkat Rao".into(),
            age: 51,
            gender: "Female".into(),
            city: "Trichy".into(),
            state: "Tamil Nadu".into(),
            visit_type: VisitType::Review,
            hospital_reg_time: "08:43 AM".into(),
            clinical_in_time: "08:43 AM".into(),
            check_in_timestamp: Some(now_millis - 148 * MINUTE_MS),
            purpose: "Post Surgical Followup In Retina Clinic".into(),
            assigned_to: "Chakram Priyalaxmi / -".into(),
            last_visit_date: "01/08/2024".into(),
            last_clinic: "RETINA CLINIC".into(),
            status: "Waiting".into(),
            allergies: "Sulfa drugs".into(),
            conditions: "Hypertension".into(),
            visit_history: vec![VisitSummary {
                id: 12,
                date: "20-Dec-25".into(),
                location: "CHN".into(),
                has_glaucoma: true,
                ..VisitSummary::default()
            }],
            ..Patient::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_unique_ids_and_mr_numbers() {
        let patients = seed_patients(0);
        let mut ids: Vec<_> = patients.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), patients.len());
        assert!(patients.iter().all(|p| p.status == "Waiting"));
    }
}
