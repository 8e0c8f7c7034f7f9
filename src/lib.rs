pub mod catalog;
pub mod config;
pub mod entities;
pub mod physics;
