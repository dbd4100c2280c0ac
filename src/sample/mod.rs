pub mod prepare;
pub mod runner;
pub mod sample_model;
