mod compiler;

pub use compiler::{compile_str, compile_to_html, CompileError, CompileOptions, CompileResult};
