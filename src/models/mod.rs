// src/models/mod.rs

pub mod quiz;
pub mod user;
