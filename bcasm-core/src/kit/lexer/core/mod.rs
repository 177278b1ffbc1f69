//! 词法分析基础设施

pub mod position;
pub mod source;
pub mod stream;

pub use position::{SourceLocation, SourcePosition};
pub use source::SourceFile;
pub use stream::CharStream;
