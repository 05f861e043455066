//! Farm profiles and CSV loading

mod data;
pub mod loader;

pub use data::FarmProfile;
pub use loader::{load_profiles, load_profiles_from_reader};
