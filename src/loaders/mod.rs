pub use self::delimited::{Columns, DelimitedLoader};
pub use self::loader::Loader;

mod delimited;
mod loader;
