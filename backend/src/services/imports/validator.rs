//! The row validator: a pure, in-order fold over one uploaded batch.
//!
//! Each row is checked against the reference sets snapshotted when the
//! upload arrived, accumulating every applicable error so the admin sees all
//! problems in one pass. When a row comes out clean its email and mobile are
//! added to internal copies of the sets before the next row is examined —
//! within-batch duplicate detection is therefore sequential and
//! order-sensitive, and must stay that way: of two rows claiming the same
//! new email, exactly the first may be accepted. The caller's sets are never
//! mutated, so validating the same batch against the same snapshot twice
//! gives identical results.

use common::model::validation::{RowOutcome, RowStatus};
use common::model::worker::CandidateRow;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static pattern")
});

/// Snapshot of the world the batch is validated against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSets {
    /// Normalized (lowercased) emails already registered.
    pub existing_emails: HashSet<String>,
    /// 10-digit mobiles already registered.
    pub existing_mobiles: HashSet<String>,
    /// Trimmed taxonomy names; profession matching is case-sensitive.
    pub known_professions: HashSet<String>,
}

/// Validates every row, preserving input order. `row_number` is the
/// spreadsheet row (data starts at row 2).
pub fn validate_batch(
    rows: &[CandidateRow],
    refs: &ReferenceSets,
) -> Vec<(CandidateRow, RowOutcome)> {
    let mut seen_emails = refs.existing_emails.clone();
    let mut seen_mobiles = refs.existing_mobiles.clone();
    let mut outcomes = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let mut errors = Vec::new();

        let name = row.name.trim();
        let email = row.email.trim().to_lowercase();
        let mobile = row.mobile.trim();
        let profession = row.profession.trim();

        if name.is_empty() {
            errors.push("Name is required".to_string());
        }

        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !EMAIL_RE.is_match(&email) {
            errors.push("Invalid email format".to_string());
        } else if seen_emails.contains(&email) {
            errors.push("Email already exists".to_string());
        }

        if mobile.is_empty() {
            errors.push("Mobile is required".to_string());
        } else if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
            errors.push("Mobile must be exactly 10 digits".to_string());
        } else if seen_mobiles.contains(mobile) {
            errors.push("Mobile number already registered".to_string());
        }

        if profession.is_empty() {
            errors.push("Profession is required".to_string());
        } else if !refs.known_professions.contains(profession) {
            errors.push(format!(
                "Invalid profession: '{}' (check reference sheet)",
                profession
            ));
        }

        let status = if errors.is_empty() {
            // Accepted: later rows reusing this email or mobile are rejected.
            seen_emails.insert(email);
            seen_mobiles.insert(mobile.to_string());
            RowStatus::Valid
        } else {
            RowStatus::Invalid
        };

        outcomes.push((
            row.clone(),
            RowOutcome {
                row_number: (index + 2) as u32,
                status,
                errors,
            },
        ));
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> ReferenceSets {
        ReferenceSets {
            existing_emails: ["taken@example.com".to_string()].into(),
            existing_mobiles: ["9000000000".to_string()].into(),
            known_professions: ["Electrician".to_string(), "Plumber".to_string()].into(),
        }
    }

    fn row(name: &str, email: &str, mobile: &str, profession: &str) -> CandidateRow {
        CandidateRow {
            name: name.to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
            profession: profession.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn partitions_are_total_and_disjoint() {
        let rows = vec![
            row("Asha", "asha@example.com", "9876543210", "Electrician"),
            row("", "bad", "123", "Nope"),
            row("Ravi", "taken@example.com", "9876543211", "Plumber"),
        ];
        let outcomes = validate_batch(&rows, &refs());

        assert_eq!(outcomes.len(), rows.len());
        for (_, outcome) in &outcomes {
            match outcome.status {
                RowStatus::Valid => assert!(outcome.errors.is_empty()),
                RowStatus::Invalid => assert!(!outcome.errors.is_empty()),
            }
        }
    }

    #[test]
    fn all_errors_accumulate_on_one_row() {
        let rows = vec![row("", "", "", "")];
        let outcomes = validate_batch(&rows, &refs());
        assert_eq!(
            outcomes[0].1.errors,
            vec![
                "Name is required",
                "Email is required",
                "Mobile is required",
                "Profession is required",
            ]
        );
    }

    #[test]
    fn duplicate_email_within_batch_rejects_the_second_row_only() {
        let rows = vec![
            row("Asha", "new@example.com", "9876543210", "Electrician"),
            row("Mira", "new@example.com", "9876543211", "Electrician"),
        ];
        let outcomes = validate_batch(&rows, &refs());
        assert_eq!(outcomes[0].1.status, RowStatus::Valid);
        assert_eq!(outcomes[1].1.status, RowStatus::Invalid);
        assert!(outcomes[1].1.errors.contains(&"Email already exists".to_string()));
    }

    #[test]
    fn existing_email_match_is_case_insensitive() {
        let rows = vec![row("Asha", "TAKEN@Example.COM", "9876543210", "Electrician")];
        let outcomes = validate_batch(&rows, &refs());
        assert!(outcomes[0].1.errors.contains(&"Email already exists".to_string()));
    }

    #[test]
    fn mobile_must_be_exactly_ten_digits() {
        for bad in ["12345", "12345678901", "12345abcde"] {
            let outcomes = validate_batch(
                &[row("Asha", "asha@example.com", bad, "Electrician")],
                &refs(),
            );
            assert!(
                outcomes[0]
                    .1
                    .errors
                    .contains(&"Mobile must be exactly 10 digits".to_string()),
                "expected rejection for {:?}",
                bad
            );
        }

        let outcomes = validate_batch(
            &[row("Asha", "asha@example.com", "9876543210", "Electrician")],
            &refs(),
        );
        assert_eq!(outcomes[0].1.status, RowStatus::Valid);
    }

    #[test]
    fn profession_is_trimmed_but_case_sensitive() {
        let trailing = validate_batch(
            &[row("Asha", "asha@example.com", "9876543210", "Electrician ")],
            &refs(),
        );
        assert_eq!(trailing[0].1.status, RowStatus::Valid);

        let lowercase = validate_batch(
            &[row("Asha", "asha2@example.com", "9876543212", "electrician")],
            &refs(),
        );
        assert_eq!(lowercase[0].1.status, RowStatus::Invalid);
        assert!(lowercase[0].1.errors[0].starts_with("Invalid profession: 'electrician'"));
    }

    #[test]
    fn row_numbers_start_below_the_header() {
        let rows = vec![
            row("Asha", "asha@example.com", "9876543210", "Electrician"),
            row("Mira", "mira@example.com", "9876543211", "Plumber"),
        ];
        let outcomes = validate_batch(&rows, &refs());
        assert_eq!(outcomes[0].1.row_number, 2);
        assert_eq!(outcomes[1].1.row_number, 3);
    }

    #[test]
    fn validation_does_not_mutate_the_snapshot() {
        let refs = refs();
        let rows = vec![row("Asha", "asha@example.com", "9876543210", "Electrician")];

        let first = validate_batch(&rows, &refs);
        let second = validate_batch(&rows, &refs);

        assert_eq!(refs.existing_emails.len(), 1);
        assert_eq!(first[0].1.status, second[0].1.status);
        assert_eq!(first[0].1.errors, second[0].1.errors);
    }

    #[test]
    fn three_row_scenario_matches_the_reference_behavior() {
        let rows = vec![
            row("Asha", "fresh@example.com", "9876543210", "Electrician"),
            row("", "mira@example.com", "9876543211", "Plumber"),
            row("Ravi", "fresh@example.com", "9876543212", "Plumber"),
        ];
        let outcomes = validate_batch(&rows, &refs());

        assert_eq!(outcomes[0].1.status, RowStatus::Valid);

        assert_eq!(outcomes[1].1.status, RowStatus::Invalid);
        assert_eq!(outcomes[1].1.errors, vec!["Name is required"]);

        assert_eq!(outcomes[2].1.status, RowStatus::Invalid);
        assert!(outcomes[2].1.errors.contains(&"Email already exists".to_string()));
    }
}
