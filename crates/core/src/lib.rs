// Pragma Core - 基础设施
//!
//! 职责：
//! - 可复现的随机源（显式注入，不使用全局状态）
//! - 惰性计算缓存
//! - 交互标识符生成
//!
//! 架构：
//! - RandomSource: 带种子的随机数来源
//! - MemoCache: get-or-compute 缓存（无淘汰）
//! - IdGenerator: 单次运行内递增的标识符

mod ids;
mod memo;
mod random;

pub use ids::*;
pub use memo::*;
pub use random::*;
