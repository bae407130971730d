//! Actor-critic learning in a repeated public goods investment game.
//!
//! A group plays `T` rounds. Each round every member draws an action from a
//! Gaussian policy around its mean `theta`, receives a subjective reward
//! computed with its perceived quality `p`, and accumulates an objective
//! payoff computed with its real quality `q`. The critic keeps a single
//! reward estimate `w`; only the actor uses an eligibility trace, since the
//! game has one state.

use rand::Rng;
use rand_distr::StandardNormal;

use super::phenotype::Phenotype;
use crate::schema::{GameConfig, LearningConfig};

/// TD errors are clamped to `[-TD_ERROR_LIMIT, TD_ERROR_LIMIT]`.
pub const TD_ERROR_LIMIT: f64 = 0.5;

/// Eligibility traces are clamped to `±TRACE_LIMIT / sigma`.
pub const TRACE_LIMIT: f64 = 5.0;

/// One interaction group over the rounds of a generation.
#[derive(Debug, Clone)]
pub struct ActorCriticGroup {
    game: GameConfig,
    learning: LearningConfig,
    rounds: usize,
    members: Vec<Phenotype>,
}

impl ActorCriticGroup {
    pub fn new(
        game: GameConfig,
        learning: LearningConfig,
        rounds: usize,
        members: Vec<Phenotype>,
    ) -> Self {
        Self {
            game,
            learning,
            rounds,
            members,
        }
    }

    pub fn members(&self) -> &[Phenotype] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Phenotype> {
        self.members
    }

    /// Run all rounds, leaving each member's payoff as its per-round mean.
    ///
    /// Draws one standard normal per member per round, in member order.
    pub fn interact<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for m in &mut self.members {
            m.payoff = 0.0;
        }
        if self.members.is_empty() {
            return;
        }

        let sigma = self.learning.sigma;
        for _ in 0..self.rounds {
            for m in &mut self.members {
                m.action = m.theta + sigma * rng.sample::<f64, _>(StandardNormal);
            }
            self.update_rewards();
            for m in &mut self.members {
                learn(m, &self.learning);
            }
        }

        if self.rounds > 0 {
            let rounds = self.rounds as f64;
            for m in &mut self.members {
                m.payoff /= rounds;
            }
        }
    }

    fn update_rewards(&mut self) {
        let mean_action =
            self.members.iter().map(|m| m.action).sum::<f64>() / self.members.len() as f64;
        let benefit = self.game.benefit(mean_action);
        for m in &mut self.members {
            m.reward = benefit - self.game.cost(m.action, m.p);
            m.payoff += benefit - self.game.cost(m.action, m.q);
        }
    }
}

/// One actor-critic update from the member's current action and reward.
pub(crate) fn learn(m: &mut Phenotype, learning: &LearningConfig) {
    let sigma = learning.sigma;

    m.delta = (m.reward - m.w).clamp(-TD_ERROR_LIMIT, TD_ERROR_LIMIT);
    m.w += learning.alpha_w * m.delta;

    m.elig = (m.action - m.theta) / (sigma * sigma);
    let trace_limit = TRACE_LIMIT / sigma;
    m.ztheta = (learning.lambda_theta * m.ztheta + m.elig).clamp(-trace_limit, trace_limit);

    m.theta += learning.alpha_theta * m.ztheta * m.delta;
}
