pub mod hires;
pub mod profile;
