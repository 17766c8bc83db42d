pub mod flux;
pub mod spec;
