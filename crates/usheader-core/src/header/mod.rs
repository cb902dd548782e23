pub mod order;
pub mod serialize;
