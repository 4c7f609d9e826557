mod result_set;
mod row;

pub use result_set::{ExecOutcome, ResultSet};
pub use row::CustomDbRow;
