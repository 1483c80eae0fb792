//! Pragma 模拟配置
//!
//! 支持 YAML 配置文件和环境变量（PRAGMA_SEED / PRAGMA_RUNS）

use pragma_core::RandomSource;
use pragma_lexicon::{Lexicon, MappingFunction, PragmaticModel};
use pragma_probability::DecisionRule;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 模拟主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 基础随机种子，每次运行由它派生独立种子
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// 运行次数
    #[serde(default = "default_runs")]
    pub runs: u64,

    /// 词典生成
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// 智能体推理
    #[serde(default)]
    pub agent: AgentConfig,

    /// 施加在智能体 B 词典副本上的变异
    #[serde(default)]
    pub mutation: MutationConfig,

    /// 交互停止条件
    #[serde(default)]
    pub interaction: InteractionConfig,
}

fn default_seed() -> u64 {
    pragma_core::DEFAULT_SEED
}

fn default_runs() -> u64 {
    10
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            runs: default_runs(),
            lexicon: LexiconConfig::default(),
            agent: AgentConfig::default(),
            mutation: MutationConfig::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

/// 词典配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// 信号数
    #[serde(default = "default_vocabulary_size")]
    pub vocabulary_size: usize,

    /// 指称数
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// 生成方式
    #[serde(default)]
    pub source: LexiconSource,
}

fn default_vocabulary_size() -> usize {
    6
}

fn default_context_size() -> usize {
    4
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            vocabulary_size: default_vocabulary_size(),
            context_size: default_context_size(),
            source: LexiconSource::default(),
        }
    }
}

/// 词典生成方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LexiconSource {
    /// 一致词典，每个信号恰好覆盖 `ambiguity` 个指称
    ConsistentAmbiguity { ambiguity: usize },

    /// 每个单元以概率 `density` 为 1
    RandomBinary { density: f64 },

    /// 由随机比特表示经映射函数得到
    Structured {
        representation_length: usize,
        #[serde(default)]
        mapping: MappingFunction,
        /// 缺省时保留连续值
        #[serde(default)]
        threshold: Option<f64>,
    },
}

impl Default for LexiconSource {
    fn default() -> Self {
        LexiconSource::ConsistentAmbiguity { ambiguity: 2 }
    }
}

/// 智能体配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// 语用推理阶数
    #[serde(default = "default_order")]
    pub order: usize,

    #[serde(default)]
    pub model: PragmaticModel,

    #[serde(default)]
    pub decision: DecisionRule,
}

fn default_order() -> usize {
    1
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            model: PragmaticModel::default(),
            decision: DecisionRule::default(),
        }
    }
}

/// 变异算子
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "kebab-case")]
pub enum MutationConfig {
    /// 两个智能体共享同一词典
    #[default]
    None,

    /// 单元翻转为 1 - v
    Flip { rate: f64 },

    /// 每行交换若干对镜像指称
    MixReferents { rate: f64 },

    /// 每个信号把若干 0 单元置为 1
    Additive { rate: f64 },

    /// 每个信号清除若干 >= threshold 的单元
    Removal {
        rate: f64,
        #[serde(default = "default_removal_threshold")]
        threshold: f64,
    },
}

fn default_removal_threshold() -> f64 {
    1.0
}

impl MutationConfig {
    /// 对词典施加变异，返回新词典
    pub fn apply(&self, lexicon: &Lexicon, rng: &mut RandomSource) -> Lexicon {
        match self {
            MutationConfig::None => lexicon.clone(),
            MutationConfig::Flip { rate } => lexicon.mutate(*rate, rng),
            MutationConfig::MixReferents { rate } => lexicon.mix_referents(*rate, rng),
            MutationConfig::Additive { rate } => lexicon.additive_binary_mutation(*rate, rng),
            MutationConfig::Removal { rate, threshold } => {
                lexicon.removal_binary_mutation(*rate, *threshold, rng)
            }
        }
    }

    fn rate(&self) -> Option<f64> {
        match self {
            MutationConfig::None => None,
            MutationConfig::Flip { rate }
            | MutationConfig::MixReferents { rate }
            | MutationConfig::Additive { rate }
            | MutationConfig::Removal { rate, .. } => Some(*rate),
        }
    }
}

/// 交互配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// 最大回合数
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// 连续成功该次数后提前结束
    #[serde(default)]
    pub success_streak: Option<usize>,
}

fn default_max_turns() -> usize {
    100
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            success_streak: None,
        }
    }
}

impl SimulationConfig {
    /// 从 YAML 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        debug!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 用任意键值来源覆盖 seed / runs
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PRAGMA_SEED") {
            self.seed = parse_override("PRAGMA_SEED", &value)?;
            debug!("PRAGMA_SEED overrides seed to {}", self.seed);
        }
        if let Some(value) = lookup("PRAGMA_RUNS") {
            self.runs = parse_override("PRAGMA_RUNS", &value)?;
            debug!("PRAGMA_RUNS overrides runs to {}", self.runs);
        }
        Ok(())
    }

    /// 检查参数取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lexicon = &self.lexicon;
        if lexicon.vocabulary_size == 0 || lexicon.context_size == 0 {
            return Err(ConfigError::Invalid(
                "lexicon needs at least one signal and one referent".to_string(),
            ));
        }

        match &lexicon.source {
            LexiconSource::ConsistentAmbiguity { ambiguity } => {
                if lexicon.vocabulary_size < lexicon.context_size {
                    return Err(ConfigError::Invalid(format!(
                        "consistent lexicon needs vocabulary_size >= context_size, got {} < {}",
                        lexicon.vocabulary_size, lexicon.context_size
                    )));
                }
                if *ambiguity == 0 {
                    return Err(ConfigError::Invalid("ambiguity must be at least 1".to_string()));
                }
            }
            LexiconSource::RandomBinary { density } => check_unit("density", *density)?,
            LexiconSource::Structured {
                representation_length,
                threshold,
                ..
            } => {
                if *representation_length == 0 {
                    return Err(ConfigError::Invalid(
                        "representation_length must be at least 1".to_string(),
                    ));
                }
                if let Some(t) = threshold {
                    check_unit("threshold", *t)?;
                }
            }
        }

        if let Some(rate) = self.mutation.rate() {
            check_unit("mutation rate", rate)?;
        }

        if let DecisionRule::SoftArgMax { beta } = self.agent.decision {
            if !beta.is_finite() {
                return Err(ConfigError::Invalid(format!("soft-argmax beta {beta} is not finite")));
            }
        }

        if self.interaction.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be at least 1".to_string()));
        }
        if self.interaction.success_streak == Some(0) {
            return Err(ConfigError::Invalid("success_streak must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key}={value} is not a valid number")))
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} {value} is outside [0, 1]")))
    }
}
