pub mod selectors;
pub mod track;
