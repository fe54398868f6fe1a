pub mod loader;
pub mod normalizer;
pub mod parser;
pub mod script;
