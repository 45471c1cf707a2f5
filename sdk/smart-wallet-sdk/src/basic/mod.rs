pub mod actions;
pub mod wallet;
