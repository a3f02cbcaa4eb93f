pub mod settings;
pub mod translator;
pub mod window;
