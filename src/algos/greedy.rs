use super::Algo;
use crate::model::*;
use tracing::{debug, info, instrument, trace};

/// Single pass allocation: students are taken in input order and each one
/// joins the best group still eligible at that time. Earlier decisions are
/// never revisited, which makes the result a function of the input order.
pub struct Greedy<'a> {
    assignments: &'a mut Assignments,
}

/// Ranking of a candidate group for a student, smaller is better:
/// fill level, members from the same source group, members sharing the
/// profession, then group number.
pub type GroupKey = (usize, usize, usize, u32);

impl<'a> Greedy<'a> {
    pub fn new(assignments: &'a mut Assignments) -> Greedy<'a> {
        Greedy { assignments }
    }

    pub fn key(&self, student: StudentId, group: GroupId) -> GroupKey {
        let a = &self.assignments;
        (
            a.size(group),
            a.same_source_count(group, student),
            a.same_profession_count(group, student),
            a.group(group).number,
        )
    }

    /// Best eligible group for `student` given the current fill of every group.
    pub fn best_group(&self, student: StudentId) -> Option<GroupId> {
        self.assignments
            .eligible_groups(student)
            .into_iter()
            .min_by_key(|&g| self.key(student, g))
    }

    fn place(&mut self, student: StudentId) {
        if let Some(group) = self.best_group(student) {
            trace!(
                student = %self.assignments.student(student),
                group = %self.assignments.group(group).number,
                key = ?self.key(student, group),
                "Assigning student"
            );
            self.assignments.assign_to(student, group);
        } else if let Some(reason) = self.assignments.unplaced_reason(student) {
            debug!(
                student = %self.assignments.student(student),
                period = %self.assignments.student(student).period,
                stage_far = self.assignments.student(student).stage_far,
                %reason,
                "Cannot place student"
            );
            self.assignments.mark_unplaced(student, reason);
        }
    }
}

impl Algo for Greedy<'_> {
    #[instrument(skip_all)]
    fn assign(&mut self) -> eyre::Result<()> {
        for student in self.assignments.all_students() {
            if self.assignments.group_for(student).is_none() {
                self.place(student);
            }
        }
        info!(
            students = self.assignments.students.len(),
            unassigned = self.assignments.unassigned_students().len(),
            "Allocation done"
        );
        Ok(())
    }

    fn get_assignments(&self) -> &Assignments {
        self.assignments
    }
}
