pub mod columns;
pub mod export;
pub mod loader;
pub mod parser;
