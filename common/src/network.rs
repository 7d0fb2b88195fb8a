pub mod outcome;
pub mod range;
