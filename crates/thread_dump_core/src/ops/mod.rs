pub mod analyze;
pub mod compare;
pub mod diff;
pub mod parse;
