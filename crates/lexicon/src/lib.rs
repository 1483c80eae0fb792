//! Pragma Lexicon - 词典与语用推理引擎
//!
//! 职责：
//! - 信号 × 指称 关联矩阵（行主序）
//! - n 阶语用说话者/听话者矩阵（三种模型族）
//! - 不对称度、歧义度指标
//! - 随机变异算子与生成器
//! - 基于二进制特征表示的结构化词典
//!
//! 架构：
//! - Lexicon: 不可变矩阵值，所有变换返回新实例
//! - PragmaticModel: Frank–Goodman / Blokpoel et al. / Franke–Degen
//! - StructuredLexicon: 特征表示 + 映射函数 → Lexicon

pub mod error;
pub mod generate;
pub mod lexicon;
pub mod metrics;
pub mod mutation;
pub mod pragmatics;
pub mod structured;

pub use error::{LexiconError, Result};
pub use lexicon::Lexicon;
pub use pragmatics::PragmaticModel;
pub use structured::{MappingFunction, Representation, StructuredLexicon};
