pub mod quiz;
pub mod transcript;
