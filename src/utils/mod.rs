// src/utils/mod.rs

pub mod extract;
pub mod gemini;
pub mod grading;
pub mod html;
pub mod render;
