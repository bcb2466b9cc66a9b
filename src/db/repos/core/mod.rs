pub mod people;
pub mod settings;
