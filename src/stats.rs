use crate::model::{Assignments, GroupId, Student, Unplaced};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

/// Largest number of members of `group` sharing the same value of `key`.
pub fn max_repeat<K, F>(a: &Assignments, group: GroupId, key: F) -> usize
where
    K: Eq + Hash,
    F: Fn(&Student) -> K,
{
    let mut counts = HashMap::new();
    for &s in a.students_for(group) {
        *counts.entry(key(a.student(s))).or_insert(0) += 1;
    }
    counts.into_values().max().unwrap_or(0)
}

/// Average over non-empty groups of the largest source group and
/// profession repetitions. Lower means better mixed.
pub fn mixing(a: &Assignments) -> (f64, f64) {
    let open = a.filter_groups(|g| !a.students_for(g).is_empty());
    if open.is_empty() {
        return (0.0, 0.0);
    }
    let (sources, professions) = open.iter().fold((0, 0), |(s, p), &g| {
        (
            s + max_repeat(a, g, |st| st.source_group),
            p + max_repeat(a, g, |st| st.profession.clone()),
        )
    });
    let n = open.len() as f64;
    (sources as f64 / n, professions as f64 / n)
}

/// For each source group, the number of placed students and the number of
/// distinct destination groups they went to.
pub fn source_distribution(a: &Assignments) -> Vec<(u32, usize, usize)> {
    let mut destinations: BTreeMap<u32, (usize, BTreeSet<u32>)> = BTreeMap::new();
    for s in a.all_students() {
        if let Some(number) = a.number_for(s) {
            let entry = destinations.entry(a.student(s).source_group).or_default();
            entry.0 += 1;
            entry.1.insert(number);
        }
    }
    destinations
        .into_iter()
        .map(|(source, (students, groups))| (source, students, groups.len()))
        .collect()
}

pub fn unplaced_counts(a: &Assignments) -> BTreeMap<Unplaced, usize> {
    let mut counts = BTreeMap::new();
    for s in a.unassigned_students() {
        if let Some(reason) = a.unplaced(s) {
            *counts.entry(reason).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, Period, StudentId};
    use crate::testing::student;

    fn sample() -> Assignments {
        let mut a = Assignments::new(
            vec![
                student(0, 1, "Kine", Period::P1, false),
                student(1, 1, "Kine", Period::P1, false),
                student(2, 2, "Kine", Period::P1, false),
                student(3, 1, "Medecin", Period::P1, false),
                student(4, 2, "Medecin", Period::P1, true),
            ],
            Group::standard_table(),
        );
        a.assign_to(StudentId(0), GroupId(0));
        a.assign_to(StudentId(1), GroupId(0));
        a.assign_to(StudentId(2), GroupId(0));
        a.assign_to(StudentId(3), GroupId(1));
        a.mark_unplaced(StudentId(4), Unplaced::Full);
        a
    }

    #[test]
    fn test_max_repeat() {
        let a = sample();
        assert_eq!(max_repeat(&a, GroupId(0), |s| s.source_group), 2);
        assert_eq!(max_repeat(&a, GroupId(0), |s| s.profession.clone()), 3);
        assert_eq!(max_repeat(&a, GroupId(5), |s| s.source_group), 0);
    }

    #[test]
    fn test_mixing() {
        let a = sample();
        assert_eq!(mixing(&a), (1.5, 2.0));
        let empty = Assignments::new(Vec::new(), Group::standard_table());
        assert_eq!(mixing(&empty), (0.0, 0.0));
    }

    #[test]
    fn test_source_distribution() {
        assert_eq!(source_distribution(&sample()), vec![(1, 3, 2), (2, 1, 1)]);
    }

    #[test]
    fn test_unplaced_counts() {
        let counts = unplaced_counts(&sample());
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&Unplaced::Full], 1);
    }
}
