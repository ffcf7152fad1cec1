//! Transport layers

pub mod http;
