pub use self::assignments::{Assignments, Unplaced};
pub use self::group::{Group, GroupId};
pub use self::student::{Period, Student, StudentId};

mod assignments;
pub mod group;
mod student;
