pub mod duration;
pub mod metadata;
pub mod processor;
pub mod roles;
pub mod walker;
