//! 声明解析模块
//!
//! 提供语言语法注册表和签名过滤

pub mod grammar;
pub mod signature;

// 重新导出核心类型
pub use grammar::Language;
pub use signature::{SignatureDiff, filter_signatures};
