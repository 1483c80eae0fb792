//! Pragma Probability - 概率分布与决策规则
//!
//! 职责：
//! - 任意离散域上的归一化分布（采样、argmax、soft-argmax、熵）
//! - 直接作用于数值向量的无状态工具函数
//! - 硬/软决策规则
//!
//! 设计原则：
//! - 数值边界情况（零和、NaN）有确定的退化行为，不报错
//! - 所有随机性来自调用方注入的 RandomSource

pub mod decision;
pub mod distribution;
pub mod error;
pub mod utils;

pub use decision::DecisionRule;
pub use distribution::Distribution;
pub use error::{ProbabilityError, Result};
