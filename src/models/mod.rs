pub mod answer;
pub mod idea;
pub mod question;
pub mod setting;
pub mod user;
