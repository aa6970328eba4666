pub mod classify;
pub mod sort;
pub mod tables;
