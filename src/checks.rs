use crate::eligibility::{self, Exclusion};
use crate::model::{Assignments, GroupId, StudentId};
use eyre::bail;
use std::fmt;

/// Hard constraint found broken after allocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    OverCapacity { group: GroupId, size: usize },
    Period { student: StudentId, group: GroupId },
    Stage { student: StudentId, group: GroupId },
    Membership { student: StudentId },
}

/// Hard constraints checked by [`verify`], as shown in the report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rule {
    Capacity,
    Period,
    Stage,
    Coverage,
}

impl Violation {
    pub fn rule(&self) -> Rule {
        match self {
            Violation::OverCapacity { .. } => Rule::Capacity,
            Violation::Period { .. } => Rule::Period,
            Violation::Stage { .. } => Rule::Stage,
            Violation::Membership { .. } => Rule::Coverage,
        }
    }

    pub fn describe(&self, a: &Assignments) -> String {
        match *self {
            Violation::OverCapacity { group, size } => format!(
                "{} has {size} students (capacity {})",
                a.group(group),
                a.capacity(group)
            ),
            Violation::Period { student, group } => format!(
                "{} student {} placed in {}",
                a.student(student).period,
                a.student(student),
                a.group(group)
            ),
            Violation::Stage { student, group } => format!(
                "out-of-region student {} placed in {}",
                a.student(student),
                a.group(group)
            ),
            Violation::Membership { student } => format!(
                "student {} does not appear exactly once in the group lists",
                a.student(student)
            ),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Capacity => write!(f, "capacity"),
            Rule::Period => write!(f, "period"),
            Rule::Stage => write!(f, "stage"),
            Rule::Coverage => write!(f, "coverage"),
        }
    }
}

/// Check the final mapping against every hard constraint.
pub fn verify(a: &Assignments) -> Vec<Violation> {
    let mut violations = a
        .filter_groups(|g| a.is_over_capacity(g))
        .into_iter()
        .map(|group| Violation::OverCapacity {
            group,
            size: a.size(group),
        })
        .collect::<Vec<_>>();
    for student in a.all_students() {
        let listed = a
            .all_groups()
            .into_iter()
            .map(|g| a.students_for(g).iter().filter(|&&s| s == student).count())
            .sum::<usize>();
        let Some(group) = a.group_for(student) else {
            if listed != 0 {
                violations.push(Violation::Membership { student });
            }
            continue;
        };
        if listed != 1 || !a.students_for(group).contains(&student) {
            violations.push(Violation::Membership { student });
        }
        match eligibility::admissible(a.student(student), a.group(group).number) {
            Err(Exclusion::Period) => violations.push(Violation::Period { student, group }),
            Err(Exclusion::Stage) => violations.push(Violation::Stage { student, group }),
            Err(Exclusion::Full) | Ok(()) => (),
        }
    }
    violations
}

/// Fail if any hard constraint is broken, which denotes a defect in the
/// allocation rather than a problem with the input.
pub fn ensure_valid(a: &Assignments) -> eyre::Result<()> {
    let violations = verify(a);
    if let Some(first) = violations.first() {
        bail!(
            "{} constraint violation(s) after allocation, first one: {}",
            violations.len(),
            first.describe(a)
        );
    }
    Ok(())
}
