pub mod loader;
pub mod region;
pub mod roi_mean;
