// Google OAuth login. Tokens are only ever kept in the mock store.

pub mod google;
pub mod handlers;
pub mod pending;
