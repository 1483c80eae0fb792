//! Agent - 说话者/听话者能力
//!
//! 说话者：对意图指称 j，取 n 阶说话者矩阵的第 j 列作为信号分布；
//! 听话者：对信号 i，取 n 阶听话者矩阵的第 i 行作为指称分布。
//! 再由决策规则（采样 / argmax / soft-argmax）给出唯一选择。

use crate::error::{Result, SimulationError};
use pragma_core::{AgentId, MemoCache, RandomSource};
use pragma_lexicon::Lexicon;
use pragma_probability::DecisionRule;
use tracing::debug;

/// 说话者能力
pub trait Speaker {
    /// 为意图指称选择一个信号
    fn produce_signal(&mut self, referent: usize, rng: &mut RandomSource) -> Result<usize>;
}

/// 听话者能力
pub trait Listener {
    /// 为收到的信号选择一个指称
    fn interpret_signal(&mut self, signal: usize, rng: &mut RandomSource) -> Result<usize>;
}

/// 可轮换角色的交互参与者
pub trait Interlocutor: Speaker + Listener {
    fn id(&self) -> AgentId;

    fn lexicon(&self) -> &Lexicon;
}

/// 基于词典的智能体
#[derive(Debug, Clone)]
pub struct LexiconAgent {
    /// 标识符
    id: AgentId,

    /// 基础词典
    lexicon: Lexicon,

    /// 语用推理阶数
    order: usize,

    /// 决策规则
    decision: DecisionRule,

    /// 阶数 -> 说话者矩阵
    speaker_cache: MemoCache<usize, Lexicon>,

    /// 阶数 -> 听话者矩阵
    listener_cache: MemoCache<usize, Lexicon>,
}

impl LexiconAgent {
    /// 创建新的智能体
    pub fn new(id: AgentId, lexicon: Lexicon, order: usize, decision: DecisionRule) -> Self {
        Self {
            id,
            lexicon,
            order,
            decision,
            speaker_cache: MemoCache::new(),
            listener_cache: MemoCache::new(),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// 切换推理阶数（已计算的矩阵保留在缓存中）
    pub fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    pub fn decision(&self) -> DecisionRule {
        self.decision
    }

    /// 替换词典并清空缓存
    pub fn replace_lexicon(&mut self, lexicon: Lexicon) {
        debug!("{} replaces its lexicon", self.id);
        self.lexicon = lexicon;
        self.speaker_cache.clear();
        self.listener_cache.clear();
    }

    /// 当前阶数的说话者矩阵
    pub fn speaker_matrix(&mut self) -> &Lexicon {
        let lexicon = &self.lexicon;
        self.speaker_cache
            .get_or_compute(self.order, |n| lexicon.set_order_as_speaker(*n))
    }

    /// 当前阶数的听话者矩阵
    pub fn listener_matrix(&mut self) -> &Lexicon {
        let lexicon = &self.lexicon;
        self.listener_cache
            .get_or_compute(self.order, |n| lexicon.set_order_as_listener(*n))
    }

    /// (说话者缓存, 听话者缓存) 的 (命中, 未命中)
    pub fn cache_stats(&self) -> ((u64, u64), (u64, u64)) {
        (self.speaker_cache.stats(), self.listener_cache.stats())
    }
}

impl Speaker for LexiconAgent {
    fn produce_signal(&mut self, referent: usize, rng: &mut RandomSource) -> Result<usize> {
        let decision = self.decision;
        let distribution = self.speaker_matrix().column_distribution(referent)?;
        decision.choose_index(&distribution, rng).ok_or_else(|| {
            SimulationError::NoChoice(format!("{} has no signal for referent {referent}", self.id))
        })
    }
}

impl Listener for LexiconAgent {
    fn interpret_signal(&mut self, signal: usize, rng: &mut RandomSource) -> Result<usize> {
        let decision = self.decision;
        let distribution = self.listener_matrix().row_distribution(signal)?;
        decision.choose_index(&distribution, rng).ok_or_else(|| {
            SimulationError::NoChoice(format!("{} has no referent for signal {signal}", self.id))
        })
    }
}

impl Interlocutor for LexiconAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pragma_lexicon::LexiconError;

    fn identity() -> Lexicon {
        Lexicon::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_unambiguous_agent_is_exact() {
        let mut agent = LexiconAgent::new(AgentId(0), identity(), 1, DecisionRule::ArgMax);
        let mut rng = RandomSource::new(1);

        for referent in 0..3 {
            let signal = agent.produce_signal(referent, &mut rng).unwrap();
            assert_eq!(signal, referent);
            assert_eq!(agent.interpret_signal(signal, &mut rng).unwrap(), referent);
        }
    }

    #[test]
    fn test_pragmatic_speaker_avoids_ambiguous_signal() {
        // s0 covers r0 and r1, s1 covers only r1
        let lexicon = Lexicon::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();
        let mut agent = LexiconAgent::new(AgentId(0), lexicon, 1, DecisionRule::ArgMax);
        let mut rng = RandomSource::new(2);

        // order-1 speaker column for r1 is [0.25, 0.75]
        assert_eq!(agent.produce_signal(1, &mut rng).unwrap(), 1);
        assert_eq!(agent.produce_signal(0, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_matrices_are_memoized() {
        let mut agent = LexiconAgent::new(AgentId(3), identity(), 2, DecisionRule::Sample);
        let mut rng = RandomSource::new(3);

        for _ in 0..5 {
            agent.produce_signal(0, &mut rng).unwrap();
            agent.interpret_signal(0, &mut rng).unwrap();
        }

        let ((speaker_hits, speaker_misses), (listener_hits, listener_misses)) =
            agent.cache_stats();
        assert_eq!((speaker_hits, speaker_misses), (4, 1));
        assert_eq!((listener_hits, listener_misses), (4, 1));

        agent.replace_lexicon(identity());
        assert_eq!(agent.cache_stats(), ((0, 0), (0, 0)));
    }

    #[test]
    fn test_out_of_range_referent() {
        let mut agent = LexiconAgent::new(AgentId(0), identity(), 0, DecisionRule::ArgMax);
        let mut rng = RandomSource::new(4);
        let err = agent.produce_signal(9, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Lexicon(LexiconError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_set_order_changes_matrix() {
        let lexicon = Lexicon::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();
        let mut agent = LexiconAgent::new(AgentId(0), lexicon.clone(), 0, DecisionRule::ArgMax);

        let literal = agent.speaker_matrix().clone();
        agent.set_order(1);
        let pragmatic = agent.speaker_matrix().clone();

        assert_eq!(literal, lexicon.set_order_as_speaker(0));
        assert_eq!(pragmatic, lexicon.set_order_as_speaker(1));
        assert_eq!(agent.order(), 1);
    }
}
