pub mod assembler;
pub mod escalator;
