use crate::model::{Assignments, Student};

pub trait Loader {
    fn load(&mut self) -> eyre::Result<Vec<Student>>;
    fn save(&mut self, assignments: &Assignments) -> eyre::Result<()>;
}
