use crate::model::Assignments;

pub trait Algo {
    fn assign(&mut self) -> eyre::Result<()>;
    fn get_assignments(&self) -> &Assignments;
}
