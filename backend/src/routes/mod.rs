pub mod histogram;
pub mod map;
pub mod preview;
pub mod session;
