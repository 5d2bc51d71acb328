pub mod grapher_window;
