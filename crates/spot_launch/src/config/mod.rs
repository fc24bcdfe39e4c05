//! Launch argument handling and substitution

mod args;
mod substitution;

pub use args::*;
pub use substitution::*;
