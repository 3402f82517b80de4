pub mod engine;
pub mod frequency;
pub mod model;
pub mod tokenizer;
pub mod types;
