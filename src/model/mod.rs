pub mod location;
pub mod position;
pub mod session;
pub mod shift;
