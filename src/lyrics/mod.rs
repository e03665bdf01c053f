//! Reference lyric parsing

pub mod tokenizer;

pub use tokenizer::{normalize_word, tokenize, ReferenceText};
