//! Core types used throughout the facade

pub mod message;
pub mod request;
pub mod response;
pub mod stream;
