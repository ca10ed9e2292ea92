pub mod catalog;
pub mod geo;
pub mod position;
