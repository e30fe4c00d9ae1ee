pub mod preview;
pub mod sensors;
