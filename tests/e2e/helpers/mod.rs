//! 测试辅助工具模块

mod assertions;

pub use assertions::*;
