pub mod csv_line;
pub mod decoder;
pub mod dialect;
pub mod encode;
pub mod error;
pub mod record;
pub mod structured;
