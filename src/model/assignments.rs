use super::*;
use crate::eligibility::{self, Exclusion};
use std::fmt;

/// Reason why a student could not be placed in any group.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Unplaced {
    /// No group accepts the student period.
    NoPeriodGroup,
    /// Every group open to the period is closed to out-of-region internships.
    StageExcluded,
    /// Some groups would accept the student but all of them are full.
    Full,
}

impl fmt::Display for Unplaced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unplaced::NoPeriodGroup => write!(f, "no group for this period"),
            Unplaced::StageExcluded => write!(f, "excluded by internship location"),
            Unplaced::Full => write!(f, "all eligible groups full"),
        }
    }
}

#[derive(Debug)]
pub struct Assignments {
    pub students: Vec<Student>,
    pub groups: Vec<Group>,
    assigned_to: Vec<Option<GroupId>>,
    assigned: Vec<Vec<StudentId>>,
    unplaced: Vec<Option<Unplaced>>,
}

impl Assignments {
    pub fn new(students: Vec<Student>, mut groups: Vec<Group>) -> Assignments {
        for (idx, group) in groups.iter_mut().enumerate() {
            group.id = GroupId(idx);
        }
        let slen = students.len();
        let glen = groups.len();
        Assignments {
            students,
            groups,
            assigned_to: vec![None; slen],
            assigned: vec![Vec::new(); glen],
            unplaced: vec![None; slen],
        }
    }

    pub fn student(&self, StudentId(student): StudentId) -> &Student {
        &self.students[student]
    }

    pub fn group(&self, GroupId(group): GroupId) -> &Group {
        &self.groups[group]
    }

    pub fn all_students(&self) -> Vec<StudentId> {
        (0..self.students.len()).map(StudentId).collect()
    }

    pub fn all_groups(&self) -> Vec<GroupId> {
        self.filter_groups(|_| true)
    }

    pub fn filter_groups<F>(&self, condition: F) -> Vec<GroupId>
    where
        F: Fn(GroupId) -> bool,
    {
        (0..self.groups.len())
            .map(GroupId)
            .filter(|&g| condition(g))
            .collect()
    }

    pub fn group_for(&self, StudentId(student): StudentId) -> Option<GroupId> {
        self.assigned_to[student]
    }

    /// Destination group number for a student, if any.
    pub fn number_for(&self, student: StudentId) -> Option<u32> {
        self.group_for(student).map(|g| self.group(g).number)
    }

    /// Members of a group, in the order they joined.
    pub fn students_for(&self, GroupId(group): GroupId) -> &[StudentId] {
        &self.assigned[group]
    }

    pub fn size(&self, group: GroupId) -> usize {
        self.students_for(group).len()
    }

    pub fn capacity(&self, group: GroupId) -> usize {
        self.group(group).capacity
    }

    pub fn is_at_capacity(&self, group: GroupId) -> bool {
        self.size(group) >= self.capacity(group)
    }

    pub fn is_over_capacity(&self, group: GroupId) -> bool {
        self.size(group) > self.capacity(group)
    }

    pub fn check(&self, student: StudentId, group: GroupId) -> Result<(), Exclusion> {
        eligibility::check(self.student(student), self.group(group), self.size(group))
    }

    pub fn is_eligible(&self, student: StudentId, group: GroupId) -> bool {
        eligibility::is_eligible(self.student(student), self.group(group), self.size(group))
    }

    pub fn eligible_groups(&self, student: StudentId) -> Vec<GroupId> {
        self.filter_groups(|g| self.is_eligible(student, g))
    }

    /// Number of members of `group` coming from the same source group as `student`.
    pub fn same_source_count(&self, group: GroupId, student: StudentId) -> usize {
        let source = self.student(student).source_group;
        self.students_for(group)
            .iter()
            .filter(|&&s| self.student(s).source_group == source)
            .count()
    }

    /// Number of members of `group` sharing the profession of `student`.
    pub fn same_profession_count(&self, group: GroupId, student: StudentId) -> usize {
        let profession = &self.student(student).profession;
        self.students_for(group)
            .iter()
            .filter(|&&s| &self.student(s).profession == profession)
            .count()
    }

    pub fn assign_to(&mut self, student: StudentId, group: GroupId) {
        assert!(
            self.group_for(student).is_none(),
            "a group is already assigned to this student"
        );
        if let Err(exclusion) = self.check(student, group) {
            panic!(
                "cannot assign {} to {}: {exclusion}",
                self.student(student),
                self.group(group)
            );
        }
        self.assigned_to[student.0] = Some(group);
        self.unplaced[student.0] = None;
        self.assigned[group.0].push(student);
    }

    /// Classify why no group is currently eligible for `student`, or
    /// return `None` if one is.
    pub fn unplaced_reason(&self, student: StudentId) -> Option<Unplaced> {
        let mut period_ok = false;
        let mut admissible = false;
        for g in self.all_groups() {
            match self.check(student, g) {
                Ok(()) => return None,
                Err(Exclusion::Full) => {
                    if eligibility::admissible(self.student(student), self.group(g).number)
                        .is_ok()
                    {
                        admissible = true;
                    }
                    period_ok |= self.group(g).accepts_period(self.student(student).period);
                }
                Err(Exclusion::Stage) => period_ok = true,
                Err(Exclusion::Period) => (),
            }
        }
        Some(if admissible {
            Unplaced::Full
        } else if period_ok {
            Unplaced::StageExcluded
        } else {
            Unplaced::NoPeriodGroup
        })
    }

    pub fn mark_unplaced(&mut self, student: StudentId, reason: Unplaced) {
        assert!(
            self.group_for(student).is_none(),
            "an assigned student cannot be unplaced"
        );
        self.unplaced[student.0] = Some(reason);
    }

    pub fn unplaced(&self, StudentId(student): StudentId) -> Option<Unplaced> {
        self.unplaced[student]
    }

    pub fn unassigned_students(&self) -> Vec<StudentId> {
        self.assigned_to
            .iter()
            .enumerate()
            .filter_map(|(id, assignment)| assignment.is_none().then_some(StudentId(id)))
            .collect()
    }

    /// Destination group number of every student, in input order.
    pub fn mapping(&self) -> Vec<(StudentId, Option<u32>)> {
        self.all_students()
            .into_iter()
            .map(|s| (s, self.number_for(s)))
            .collect()
    }
}
