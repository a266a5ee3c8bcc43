use crate::checks::{self, Rule};
use crate::model::{Assignments, Period};
use crate::stats;
use std::io::{self, Write};

/// Write the full validation report.
pub fn write_report<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    writeln!(w, "=== VALIDATION REPORT ===")?;
    writeln!(w)?;
    display_summary(w, a)?;
    display_groups(w, a)?;
    display_unassigned(w, a)?;
    display_constraints(w, a)?;
    display_mixing(w, a)?;
    display_sources(w, a)?;
    display_details(w, a)
}

pub fn display_summary<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    let total = a.students.len();
    let unassigned = a.unassigned_students().len();
    writeln!(w, "SUMMARY:")?;
    writeln!(w, "   Total students: {total}")?;
    writeln!(w, "   Assigned: {}", total - unassigned)?;
    writeln!(w, "   Unassigned: {unassigned}")?;
    for (reason, n) in stats::unplaced_counts(a) {
        writeln!(w, "     - {reason}: {n}")?;
    }
    writeln!(w)
}

pub fn display_groups<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    writeln!(w, "DESTINATION GROUP COUNTS:")?;
    for g in a.all_groups() {
        writeln!(
            w,
            "   Group {:2}: {:2}/{} students [{}]",
            a.group(g).number,
            a.size(g),
            a.capacity(g),
            if a.is_over_capacity(g) {
                "VIOLATION"
            } else if a.is_at_capacity(g) {
                "FULL"
            } else {
                "OK"
            }
        )?;
    }
    writeln!(w)
}

pub fn display_unassigned<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    let unassigned = a.unassigned_students();
    writeln!(w, "UNASSIGNED STUDENTS:")?;
    writeln!(w, "   Total unassigned: {}", unassigned.len())?;
    if unassigned.is_empty() {
        writeln!(w, "   All students successfully assigned")?;
    }
    for s in unassigned {
        let student = a.student(s);
        write!(
            w,
            "   - Line {}: {}, {}, GROUPE {}, Stage={}, {}",
            student.line,
            student.label,
            student.profession,
            student.source_group,
            if student.stage_far { "oui" } else { "non" },
            student.period
        )?;
        if let Some(reason) = a.unplaced(s) {
            write!(w, " ({reason})")?;
        }
        writeln!(w)?;
    }
    writeln!(w)
}

fn period_groups(a: &Assignments, period: Period) -> String {
    a.filter_groups(|g| a.group(g).accepts_period(period))
        .into_iter()
        .map(|g| a.group(g).number.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn display_constraints<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    let violations = checks::verify(a);
    writeln!(w, "CONSTRAINT VERIFICATION:")?;
    for (rule, label) in [
        (Rule::Capacity, "all groups within capacity limits".to_owned()),
        (
            Rule::Period,
            format!(
                "P1 students in {{{}}}, P2 students in {{{}}}",
                period_groups(a, Period::P1),
                period_groups(a, Period::P2)
            ),
        ),
        (
            Rule::Stage,
            "no out-of-region student in groups {1,2,3,4}".to_owned(),
        ),
        (
            Rule::Coverage,
            "every student listed exactly once".to_owned(),
        ),
    ] {
        let broken = violations
            .iter()
            .filter(|v| v.rule() == rule)
            .collect::<Vec<_>>();
        writeln!(
            w,
            "   [{}] {rule}: {label}",
            if broken.is_empty() { "PASS" } else { "FAIL" }
        )?;
        for v in broken {
            writeln!(w, "       VIOLATION: {}", v.describe(a))?;
        }
    }
    writeln!(w)
}

pub fn display_mixing<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    let (sources, professions) = stats::mixing(a);
    writeln!(w, "MIXING METRICS:")?;
    writeln!(
        w,
        "   Average max GROUPE repetition per destination: {sources:.2}"
    )?;
    writeln!(
        w,
        "   Average max Metier repetition per destination: {professions:.2}"
    )?;
    writeln!(w)
}

pub fn display_sources<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    writeln!(w, "SOURCE GROUPE DISTRIBUTION:")?;
    for (source, students, destinations) in stats::source_distribution(a) {
        writeln!(
            w,
            "   {source}: {students} students -> {destinations} unique destinations"
        )?;
    }
    writeln!(w)
}

pub fn display_details<W: Write>(w: &mut W, a: &Assignments) -> io::Result<()> {
    writeln!(w, "GROUP MEMBERS:")?;
    for g in a.filter_groups(|g| !a.students_for(g).is_empty()) {
        writeln!(w, "   Group {}:", a.group(g).number)?;
        for &s in a.students_for(g) {
            let student = a.student(s);
            writeln!(
                w,
                "     - {} ({}, GROUPE {}, {})",
                student.label, student.profession, student.source_group, student.period
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algos::{Algo, Greedy};
    use crate::model::{Group, GroupId, StudentId};
    use crate::testing::{population, student};

    fn report(a: &Assignments) -> String {
        let mut out = Vec::new();
        write_report(&mut out, a).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_sections() {
        let mut a = Assignments::new(population(3, 200), Group::standard_table());
        Greedy::new(&mut a).assign().unwrap();
        let text = report(&a);
        for header in [
            "=== VALIDATION REPORT ===",
            "SUMMARY:",
            "DESTINATION GROUP COUNTS:",
            "UNASSIGNED STUDENTS:",
            "CONSTRAINT VERIFICATION:",
            "MIXING METRICS:",
            "SOURCE GROUPE DISTRIBUTION:",
            "GROUP MEMBERS:",
        ] {
            assert!(text.contains(header), "missing {header}");
        }
        assert!(text.contains("   Total students: 200\n"));
        assert!(text.contains("[PASS] capacity"));
        assert!(text.contains("[PASS] period: P1 students in {1,2,3,4,17,18,19,20,21,22,23}"));
        assert!(text.contains("[PASS] stage"));
        assert!(!text.contains("FAIL"));
        assert!(text.contains("   Group 23: "));
    }

    #[test]
    fn test_report_is_deterministic() {
        let run = || {
            let mut a = Assignments::new(population(5, 150), Group::standard_table());
            Greedy::new(&mut a).assign().unwrap();
            report(&a)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_unassigned_listing() {
        let mut a = Assignments::new(
            vec![student(0, 4, "Kine", Period::P1, true)],
            Group::standard_table().into_iter().take(4).collect(),
        );
        Greedy::new(&mut a).assign().unwrap();
        let mut out = Vec::new();
        display_unassigned(&mut out, &a).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total unassigned: 1"));
        assert!(text.contains(
            "- Line 2: 1, Kine, GROUPE 4, Stage=oui, P1 (excluded by internship location)"
        ));
    }

    #[test]
    fn test_failed_constraint_is_shown() {
        let mut a = Assignments::new(
            vec![student(0, 1, "Kine", Period::P1, false)],
            Group::standard_table(),
        );
        a.assign_to(StudentId(0), GroupId(0));
        a.students[0].stage_far = true;
        let text = report(&a);
        assert!(text.contains("[FAIL] stage"));
        assert!(text.contains("VIOLATION: out-of-region student 1 (line 2) placed in group 1"));
        assert!(text.contains("[PASS] capacity"));
    }
}
