pub mod crud;
pub mod import;
pub mod keywords;
pub mod scoring;
