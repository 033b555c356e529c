// src/models/mod.rs

pub mod quiz;
pub mod session;
pub mod view;
