pub mod debounce;
pub mod layout;
pub mod palette;
pub mod session;
pub mod settings;
