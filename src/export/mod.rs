pub mod csv;
pub mod sink;
pub mod snapshot;
