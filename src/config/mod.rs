//! 静态配置（启动时加载一次）

mod r#impl;
mod structs;

pub use structs::*;
