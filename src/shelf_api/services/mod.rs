pub mod catalog;
pub mod movie;
pub mod shelf;
