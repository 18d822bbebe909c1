pub mod conversion;
pub mod detection;
pub mod symbol;

pub use symbol::{PAD, PUNCTUATIONS, SP, START_PAD, SYMBOLS, SymbolTable, UNK};
