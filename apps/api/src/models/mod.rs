pub mod application;
pub mod prep;
pub mod user;
