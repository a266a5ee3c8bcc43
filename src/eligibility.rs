use crate::model::group::{accepts_period, is_shared};
use crate::model::{Group, Student};
use std::fmt;

/// Rule preventing a student from joining a group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Exclusion {
    Full,
    Period,
    Stage,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Full => write!(f, "group is full"),
            Exclusion::Period => write!(f, "group not open to this period"),
            Exclusion::Stage => write!(f, "group closed to out-of-region internships"),
        }
    }
}

/// Static rules only: period and internship location. Capacity is
/// checked against the current group size by [`check`].
pub fn admissible(student: &Student, number: u32) -> Result<(), Exclusion> {
    if !accepts_period(number, student.period) {
        return Err(Exclusion::Period);
    }
    if student.stage_far && is_shared(number) {
        return Err(Exclusion::Stage);
    }
    Ok(())
}

pub fn check(student: &Student, group: &Group, size: usize) -> Result<(), Exclusion> {
    if size >= group.capacity {
        return Err(Exclusion::Full);
    }
    admissible(student, group.number)
}

pub fn is_eligible(student: &Student, group: &Group, size: usize) -> bool {
    check(student, group, size).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Period, StudentId};

    fn student(period: Period, stage_far: bool) -> Student {
        Student {
            id: StudentId(0),
            label: "1".into(),
            line: 2,
            source_group: 1,
            profession: "Infirmier".into(),
            period,
            stage_far,
        }
    }

    #[test]
    fn test_period_rules() {
        let groups = Group::standard_table();
        let p1 = student(Period::P1, false);
        let p2 = student(Period::P2, false);
        for g in &groups {
            assert_eq!(
                is_eligible(&p1, g, 0),
                matches!(g.number, 1..=4 | 17..=23),
                "P1 in {g}"
            );
            assert_eq!(
                is_eligible(&p2, g, 0),
                matches!(g.number, 1..=16),
                "P2 in {g}"
            );
        }
        assert_eq!(check(&p1, &groups[4], 0), Err(Exclusion::Period));
        assert_eq!(check(&p2, &groups[16], 0), Err(Exclusion::Period));
    }

    #[test]
    fn test_stage_rule() {
        let groups = Group::standard_table();
        for period in [Period::P1, Period::P2] {
            let s = student(period, true);
            for g in &groups[..4] {
                assert_eq!(check(&s, g, 0), Err(Exclusion::Stage));
            }
        }
        assert!(is_eligible(&student(Period::P1, true), &groups[16], 0));
        assert!(is_eligible(&student(Period::P2, true), &groups[4], 0));
    }

    #[test]
    fn test_capacity_rule() {
        let groups = Group::standard_table();
        let s = student(Period::P1, false);
        assert!(is_eligible(&s, &groups[0], 7));
        assert_eq!(check(&s, &groups[0], 8), Err(Exclusion::Full));
        assert!(is_eligible(&s, &groups[22], 5));
        assert_eq!(check(&s, &groups[22], 6), Err(Exclusion::Full));
        // Capacity is reported before any other rule.
        assert_eq!(check(&s, &groups[4], 7), Err(Exclusion::Full));
    }
}
