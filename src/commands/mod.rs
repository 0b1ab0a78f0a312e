pub mod audit;
pub mod form;
pub mod simulate;
