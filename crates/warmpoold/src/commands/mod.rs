pub mod replay;
pub mod target;
pub mod watch;
