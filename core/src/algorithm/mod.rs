//! Instrumented algorithm families and their selection interface
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod dp;
pub mod graph;
pub mod sorting;
pub mod string_matching;
pub mod traits;
pub mod tree;

pub use self::traits::*;
