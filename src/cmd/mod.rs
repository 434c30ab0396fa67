pub mod output;
pub mod tag;
