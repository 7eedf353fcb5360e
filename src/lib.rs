#![allow(clippy::needless_return)]
#![allow(clippy::len_zero)]
// src/lib.rs

pub mod blockchain;
pub mod cli;
pub mod core;
pub mod service;
pub mod view;
