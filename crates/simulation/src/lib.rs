//! Pragma Simulation - 智能体与交互驱动
//!
//! 职责：
//! - Speaker / Listener 能力（trait），由具体智能体组合实现
//! - 回合制交互：角色轮换、停止条件、逐回合记录
//! - 模拟配置（YAML + 环境变量）
//! - 单次运行：生成词典 → 变异 → 交互 → 报告
//!
//! 设计原则：
//! - 每次运行持有独立的 RandomSource / IdGenerator / 缓存
//! - 并行执行由调用方负责（见 bin）

pub mod agent;
pub mod config;
pub mod error;
pub mod interaction;
pub mod runner;

pub use agent::{Interlocutor, LexiconAgent, Listener, Speaker};
pub use config::{
    AgentConfig, ConfigError, InteractionConfig, LexiconConfig, LexiconSource, MutationConfig,
    SimulationConfig,
};
pub use error::{Result, SimulationError};
pub use interaction::{Interaction, InteractionSummary, StopCondition, StopReason, TurnRecord};
pub use runner::{build_lexicon, run_once, RunReport};
