pub mod board;
pub mod fetch;
pub mod filter;
