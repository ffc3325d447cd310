//! Route modules for Studydeck Server

pub mod generate;
pub mod health;
pub mod upload;
