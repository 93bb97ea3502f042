pub mod lower;
pub mod model;
pub mod verify;
