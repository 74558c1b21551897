pub mod choice;
pub mod filter;
pub mod transaction;
