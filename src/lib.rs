pub mod pipe;
pub mod sim;
