//! Pairing
//!
//! Groups scan file names by patient id into complete upper/lower pairs.
//! Names are sorted first, so when an id has several upper (or lower) files
//! the lexicographically first one is used.

use std::fmt;

use ahash::AHashMap;
use serde::Serialize;

use crate::naming::{FileNameRecord, PatientId, Role};

/// A complete pair of scan files for one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPair {
    pub id: PatientId,
    pub upper_file: String,
    pub lower_file: String,
}

/// Why a file or an id was left out of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// File name does not start with digits
    NoNumericPrefix,
    /// No role keyword or marker in the file name
    UnknownRole,
    /// Id has lower files but no upper file
    MissingUpper,
    /// Id has upper files but no lower file
    MissingLower,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoNumericPrefix => "no numeric prefix",
            Self::UnknownRole => "could not detect role (upper/lower)",
            Self::MissingUpper => "no upper scan",
            Self::MissingLower => "no lower scan",
        })
    }
}

/// A skipped file, or a skipped id for incomplete pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    /// File name, or the files of an incomplete id joined by `, `
    pub subject: String,
    pub id: Option<PatientId>,
    pub reason: SkipReason,
}

/// Result of pairing a set of file names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairPlan {
    /// Complete pairs in ascending id order
    pub pairs: Vec<PlannedPair>,
    /// Everything that was dropped, in the order it was found
    pub skipped: Vec<Skipped>,
    /// Number of file names considered
    pub file_count: usize,
}

impl PairPlan {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Default)]
struct Bucket {
    upper: Vec<String>,
    lower: Vec<String>,
}

/// Pair file names by their leading id and detected role.
pub fn plan_pairs<I, S>(names: I) -> PairPlan
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    names.sort();

    let mut plan = PairPlan {
        file_count: names.len(),
        ..PairPlan::default()
    };
    let mut buckets: AHashMap<PatientId, Bucket> = AHashMap::new();

    for name in names {
        let record = FileNameRecord::parse(name);
        let Some(id) = record.id else {
            plan.skipped.push(Skipped {
                subject: record.filename,
                id: None,
                reason: SkipReason::NoNumericPrefix,
            });
            continue;
        };

        let bucket = match record.role {
            Role::Unknown => {
                plan.skipped.push(Skipped {
                    subject: record.filename,
                    id: Some(id),
                    reason: SkipReason::UnknownRole,
                });
                continue;
            }
            Role::Upper => &mut buckets.entry(id).or_default().upper,
            Role::Lower => &mut buckets.entry(id).or_default().lower,
        };
        bucket.push(record.filename);
    }

    let mut ids: Vec<PatientId> = buckets.keys().copied().collect();
    ids.sort();

    for id in ids {
        let Some(mut bucket) = buckets.remove(&id) else {
            continue;
        };
        if bucket.upper.is_empty() || bucket.lower.is_empty() {
            let reason = if bucket.upper.is_empty() {
                SkipReason::MissingUpper
            } else {
                SkipReason::MissingLower
            };
            let mut files = bucket.upper;
            files.append(&mut bucket.lower);
            plan.skipped.push(Skipped {
                subject: files.join(", "),
                id: Some(id),
                reason,
            });
            continue;
        }

        if bucket.upper.len() > 1 || bucket.lower.len() > 1 {
            log::debug!(
                "id={} has {} upper and {} lower files, using the first of each",
                id,
                bucket.upper.len(),
                bucket.lower.len()
            );
        }
        plan.pairs.push(PlannedPair {
            id,
            upper_file: bucket.upper.swap_remove(0),
            lower_file: bucket.lower.swap_remove(0),
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_pair_dropped() {
        let plan = plan_pairs(["1_upper.stl", "1_lower.stl", "2_upper.stl"]);
        assert_eq!(plan.pairs.len(), 1);
        assert_eq!(plan.pairs[0].id, PatientId(1));
        assert_eq!(plan.pairs[0].upper_file, "1_upper.stl");
        assert_eq!(plan.pairs[0].lower_file, "1_lower.stl");

        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].id, Some(PatientId(2)));
        assert_eq!(plan.skipped[0].reason, SkipReason::MissingLower);
        assert_eq!(plan.file_count, 3);
    }

    #[test]
    fn test_pairs_sorted_by_numeric_id() {
        let plan = plan_pairs([
            "10_top.stl",
            "10_bottom.stl",
            "2_upper.stl",
            "002_lower.stl",
            "1_верх.stl",
            "01_низ.stl",
        ]);
        let ids: Vec<u64> = plan.pairs.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 10]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_unusable_names_recorded() {
        let plan = plan_pairs(["upper.stl", "3_scan.stl", "3_lower.stl"]);
        assert!(plan.is_empty());
        let reasons: Vec<SkipReason> = plan.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::UnknownRole,
                SkipReason::NoNumericPrefix,
                SkipReason::MissingUpper,
            ]
        );
    }

    #[test]
    fn test_duplicates_resolved_lexicographically() {
        let plan = plan_pairs([
            "4_upper_b.stl",
            "4_lower_z.stl",
            "4_upper_a.stl",
            "4_lower_y.stl",
        ]);
        assert_eq!(plan.pairs.len(), 1);
        assert_eq!(plan.pairs[0].upper_file, "4_upper_a.stl");
        assert_eq!(plan.pairs[0].lower_file, "4_lower_y.stl");
    }

    #[test]
    fn test_empty_input() {
        let plan = plan_pairs(Vec::<String>::new());
        assert!(plan.is_empty());
        assert_eq!(plan.file_count, 0);
    }
}
