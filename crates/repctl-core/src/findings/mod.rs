pub mod model;
pub mod project;
