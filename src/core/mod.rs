pub mod coordinator;
pub mod direction;
pub mod gateway;
pub mod languages;
pub mod visibility;
