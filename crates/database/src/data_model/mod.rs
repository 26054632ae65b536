pub mod block;
pub mod mission;
