//! Builders shared by the unit tests.

use crate::model::{Period, Student, StudentId};
use rand::prelude::*;

pub fn student(
    id: usize,
    source_group: u32,
    profession: &str,
    period: Period,
    stage_far: bool,
) -> Student {
    Student::new(
        StudentId(id),
        format!("{}", id + 1),
        id + 2,
        source_group,
        profession.into(),
        period,
        stage_far,
    )
}

/// Random population similar in shape to a real promotion.
pub fn population(seed: u64, n: usize) -> Vec<Student> {
    const PROFESSIONS: [&str; 5] =
        ["Infirmier", "Kine", "Medecin", "Pharmacien", "Sage-femme"];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            student(
                i,
                rng.random_range(1..=12),
                PROFESSIONS[rng.random_range(0..PROFESSIONS.len())],
                if rng.random_bool(0.5) {
                    Period::P1
                } else {
                    Period::P2
                },
                rng.random_bool(0.3),
            )
        })
        .collect()
}
