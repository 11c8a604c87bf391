mod analyzer;
mod common;
