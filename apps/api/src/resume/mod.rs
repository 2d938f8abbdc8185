// Resume intake: plain-text saves from the dashboard and file uploads.

pub mod extract;
pub mod handlers;
