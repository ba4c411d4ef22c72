#![allow(dead_code)]

pub mod mlscope_env;
pub mod server;
