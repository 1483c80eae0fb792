//! Interaction - turn-based communication between two agents
//!
//! Agent A speaks on even turns, agent B on odd turns. Each turn the
//! speaker gets a referent drawn uniformly from the shared context, chooses
//! a signal, and the listener interprets it. The turn succeeds when the
//! interpretation equals the intention.

use crate::agent::Interlocutor;
use crate::error::{Result, SimulationError};
use pragma_core::{AgentId, IdGenerator, InteractionId, RandomSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// When to stop an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopCondition {
    /// Hard limit on turns
    pub max_turns: usize,

    /// Stop after this many consecutive successes
    pub success_streak: Option<usize>,
}

impl Default for StopCondition {
    fn default() -> Self {
        Self {
            max_turns: 100,
            success_streak: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxTurns,
    SuccessStreak,
}

/// One turn of data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: InteractionId,
    pub turn: usize,
    pub speaker: AgentId,
    pub listener: AgentId,
    pub intention: usize,
    pub signal: usize,
    pub interpretation: usize,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSummary {
    pub turns: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Fraction of lexicon cells on which the two agents disagree
    pub asymmetry: f64,
    pub stopped_by: StopReason,
    pub records: Vec<TurnRecord>,
}

/// Two agents and the rules for talking
#[derive(Debug)]
pub struct Interaction<A, B> {
    agent_a: A,
    agent_b: B,
    stop: StopCondition,
}

impl<A, B> Interaction<A, B>
where
    A: Interlocutor,
    B: Interlocutor,
{
    /// Both agents must share vocabulary and context sizes.
    pub fn new(agent_a: A, agent_b: B, stop: StopCondition) -> Result<Self> {
        let (a, b) = (agent_a.lexicon().shape(), agent_b.lexicon().shape());
        if a != b {
            return Err(SimulationError::IncompatibleAgents(format!(
                "{} has a {a:?} lexicon, {} has {b:?}",
                agent_a.id(),
                agent_b.id()
            )));
        }
        if a.1 == 0 {
            return Err(SimulationError::IncompatibleAgents(
                "agents share no referents".to_string(),
            ));
        }

        Ok(Self {
            agent_a,
            agent_b,
            stop,
        })
    }

    pub fn agents(&self) -> (&A, &B) {
        (&self.agent_a, &self.agent_b)
    }

    pub fn into_agents(self) -> (A, B) {
        (self.agent_a, self.agent_b)
    }

    fn turn(
        &mut self,
        turn: usize,
        rng: &mut RandomSource,
        ids: &mut IdGenerator,
    ) -> Result<TurnRecord> {
        let context_size = self.agent_a.lexicon().context_size();
        let intention = rng.below(context_size);

        let (speaker, listener, signal, interpretation) = if turn % 2 == 0 {
            let signal = self.agent_a.produce_signal(intention, rng)?;
            let interpretation = self.agent_b.interpret_signal(signal, rng)?;
            (self.agent_a.id(), self.agent_b.id(), signal, interpretation)
        } else {
            let signal = self.agent_b.produce_signal(intention, rng)?;
            let interpretation = self.agent_a.interpret_signal(signal, rng)?;
            (self.agent_b.id(), self.agent_a.id(), signal, interpretation)
        };

        Ok(TurnRecord {
            id: ids.next_interaction(),
            turn,
            speaker,
            listener,
            intention,
            signal,
            interpretation,
            success: intention == interpretation,
        })
    }

    /// Play turns until a stop condition holds.
    pub fn run(
        &mut self,
        rng: &mut RandomSource,
        ids: &mut IdGenerator,
    ) -> Result<InteractionSummary> {
        let mut records = Vec::with_capacity(self.stop.max_turns.min(1024));
        let mut streak = 0;
        let mut stopped_by = StopReason::MaxTurns;

        for turn in 0..self.stop.max_turns {
            let record = self.turn(turn, rng, ids)?;
            debug!(
                "Turn {} {}: {} -> r{} as s{} -> r{}",
                turn,
                record.id,
                record.speaker,
                record.intention,
                record.signal,
                record.interpretation
            );

            streak = if record.success { streak + 1 } else { 0 };
            records.push(record);

            if self.stop.success_streak.is_some_and(|k| streak >= k) {
                stopped_by = StopReason::SuccessStreak;
                break;
            }
        }

        let turns = records.len();
        let successes = records.iter().filter(|r| r.success).count();
        let success_rate = if turns == 0 {
            0.0
        } else {
            successes as f64 / turns as f64
        };
        let asymmetry = self
            .agent_a
            .lexicon()
            .asymmetry_with(self.agent_b.lexicon(), 0.0)?;

        info!(
            "Interaction finished after {} turns ({:?}), success rate {:.3}",
            turns, stopped_by, success_rate
        );

        Ok(InteractionSummary {
            turns,
            successes,
            success_rate,
            asymmetry,
            stopped_by,
            records,
        })
    }
}
