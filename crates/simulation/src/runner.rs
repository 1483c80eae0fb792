//! Runner - 单次模拟运行
//!
//! 流程：生成基础词典 → 为智能体 B 变异副本 → 交互 → 汇总报告。
//! 每次运行由 (seed, run) 派生独立的 RandomSource，结果可复现。

use crate::agent::LexiconAgent;
use crate::config::{LexiconConfig, LexiconSource, SimulationConfig};
use crate::error::Result;
use crate::interaction::{Interaction, InteractionSummary, StopCondition};
use pragma_core::{IdGenerator, RandomSource};
use pragma_lexicon::{Lexicon, PragmaticModel, StructuredLexicon};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 单次运行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run: u64,
    /// 本次运行实际使用的种子
    pub seed: u64,
    pub model: PragmaticModel,
    pub order: usize,
    /// 基础词典的平均歧义度（阈值 1.0）
    pub mean_ambiguity: f64,
    /// 基础词典是否一致
    pub consistent: bool,
    pub summary: InteractionSummary,
}

/// 按配置生成基础词典
pub fn build_lexicon(
    config: &LexiconConfig,
    model: PragmaticModel,
    rng: &mut RandomSource,
) -> Result<Lexicon> {
    let (v, c) = (config.vocabulary_size, config.context_size);
    let lexicon = match &config.source {
        LexiconSource::ConsistentAmbiguity { ambiguity } => {
            Lexicon::generate_consistent_ambiguity_mapping(*ambiguity, v, c, rng)?
        }
        LexiconSource::RandomBinary { density } => {
            Lexicon::generate_random_binary(*density, v, c, rng)?
        }
        LexiconSource::Structured {
            representation_length,
            mapping,
            threshold,
        } => match threshold {
            Some(t) => {
                StructuredLexicon::generate_binary(*representation_length, v, c, *mapping, *t, rng)
            }
            None => StructuredLexicon::generate_graded(*representation_length, v, c, *mapping, rng),
        }
        .into_lexicon(),
    };
    Ok(lexicon.with_model(model))
}

/// 执行第 `run` 次运行
pub fn run_once(config: &SimulationConfig, run: u64) -> Result<RunReport> {
    config.validate()?;

    let mut rng = RandomSource::for_run(config.seed, run);
    let mut ids = IdGenerator::new();
    let seed = rng.seed();

    let base = build_lexicon(&config.lexicon, config.agent.model, &mut rng)?;
    let mutated = config.mutation.apply(&base, &mut rng);
    debug!(
        "Run {}: base lexicon density {:.3}, mutated density {:.3}",
        run,
        base.density(),
        mutated.density()
    );

    let mean_ambiguity = base.mean_ambiguity(1.0);
    let consistent = base.is_consistent();

    let agent = &config.agent;
    let agent_a = LexiconAgent::new(ids.next_agent(), base, agent.order, agent.decision);
    let agent_b = LexiconAgent::new(ids.next_agent(), mutated, agent.order, agent.decision);

    let stop = StopCondition {
        max_turns: config.interaction.max_turns,
        success_streak: config.interaction.success_streak,
    };
    let summary = Interaction::new(agent_a, agent_b, stop)?.run(&mut rng, &mut ids)?;

    info!(
        "Run {} (seed {:#x}) done: success rate {:.3}, asymmetry {:.3}",
        run, seed, summary.success_rate, summary.asymmetry
    );

    Ok(RunReport {
        run,
        seed,
        model: agent.model,
        order: agent.order,
        mean_ambiguity,
        consistent,
        summary,
    })
}
