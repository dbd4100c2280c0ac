pub mod matcher;
pub mod screen_model;
