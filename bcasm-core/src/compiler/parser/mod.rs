pub mod parser;
pub mod utils;

pub use parser::Parser;
