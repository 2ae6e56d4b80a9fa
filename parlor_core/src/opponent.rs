use crate::rps::{MoveKind, Outcome, RuleSet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// 电脑出招的能力接口，由对局流程在每回合调用
pub trait MoveSelector {
    /// 轮到电脑出招时调用，返回本回合的出招
    fn select_move(&mut self) -> MoveKind;

    /// 每回合分出结果后调用，`outcome` 站在电脑自己的视角
    fn record_round_outcome(&mut self, choice: MoveKind, outcome: Outcome);

    /// 每场比赛结束后调用
    fn recompute_weights(&mut self);
}

/// 历史记录中的一条：电脑本回合的出招和结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub choice: MoveKind,
    pub outcome: Outcome,
}

/// 自适应对手 (AdaptiveOpponent)
///
/// 每个出招都有一个权重，出招时从展开后的候选池里均匀抽取，
/// 因此某个出招被选中的概率与它的权重成正比。
/// 每场比赛结束后根据整个会话的历史重新计算权重：
/// - 赢一次加一分，输一次减一分，平局不计分。
/// - 出现过的出招，新权重 = max(得分, 1)。
/// - 从没出过的出招，保留原来的权重。
///
/// 所有权重始终不小于 1，任何出招都不会变得不可达。
pub struct AdaptiveOpponent<R> {
    // 按配置顺序排列的权重表
    weights: Vec<(MoveKind, u32)>,
    // 每个出招按权重重复展开的候选池
    choices: Vec<MoveKind>,
    current: Option<MoveKind>,
    // 会话级别的历史，比赛之间不清空
    history: Vec<HistoryEntry>,
    rng: R,
}

impl<R: Rng> AdaptiveOpponent<R> {
    /// # Panics
    /// 出招集合为空或者有重复时会 panic。
    pub fn new(moves: impl IntoIterator<Item = MoveKind>, rng: R) -> Self {
        let mut weights: Vec<(MoveKind, u32)> = Vec::new();
        for mv in moves {
            assert!(weights.iter().all(|(m, _)| *m != mv), "出招 {} 重复", mv);
            weights.push((mv, 1));
        }
        assert!(!weights.is_empty(), "出招集合不能为空");

        let mut opponent = AdaptiveOpponent {
            weights,
            choices: Vec::new(),
            current: None,
            history: Vec::new(),
            rng,
        };
        opponent.update_choices();
        opponent
    }

    pub fn from_rules(rules: &RuleSet, rng: R) -> Self {
        AdaptiveOpponent::new(rules.moves().cloned(), rng)
    }

    pub fn moves(&self) -> impl Iterator<Item = &MoveKind> {
        self.weights.iter().map(|(mv, _)| mv)
    }

    pub fn weight(&self, mv: &MoveKind) -> Option<u32> {
        self.weights.iter().find(|(m, _)| m == mv).map(|(_, w)| *w)
    }

    pub fn weights(&self) -> &[(MoveKind, u32)] {
        &self.weights
    }

    /// 直接设置某个出招的权重，小于 1 的值按 1 处理
    pub fn set_weight(&mut self, mv: &MoveKind, weight: u32) {
        let idx = self.index_of(mv);
        self.weights[idx].1 = weight.max(1);
        self.update_choices();
    }

    pub fn choice_pool(&self) -> &[MoveKind] {
        &self.choices
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn current_move(&self) -> Option<&MoveKind> {
        self.current.as_ref()
    }

    fn index_of(&self, mv: &MoveKind) -> usize {
        match self.weights.iter().position(|(m, _)| m == mv) {
            Some(idx) => idx,
            None => panic!("未配置的出招: {}", mv),
        }
    }

    /// 按出招统计净胜分，只包含历史中出现过的出招
    fn points(&self) -> HashMap<&MoveKind, i64> {
        self.history.iter().fold(HashMap::new(), |mut points, entry| {
            let score = points.entry(&entry.choice).or_insert(0);
            match entry.outcome {
                Outcome::Win => *score += 1,
                Outcome::Loss => *score -= 1,
                Outcome::Tie => {}
            }
            points
        })
    }

    fn update_choices(&mut self) {
        self.choices = self
            .weights
            .iter()
            .flat_map(|(mv, w)| std::iter::repeat_n(mv.clone(), *w as usize))
            .collect();
    }
}

impl<R: Rng> MoveSelector for AdaptiveOpponent<R> {
    fn select_move(&mut self) -> MoveKind {
        // 权重都不小于 1，候选池不会为空
        let idx = self.rng.random_range(0..self.choices.len());
        let choice = self.choices[idx].clone();
        self.current = Some(choice.clone());
        choice
    }

    fn record_round_outcome(&mut self, choice: MoveKind, outcome: Outcome) {
        self.index_of(&choice);
        self.history.push(HistoryEntry { choice, outcome });
    }

    fn recompute_weights(&mut self) {
        let new_weights: Vec<u32> = {
            let points = self.points();
            self.weights
                .iter()
                .map(|(mv, old)| match points.get(mv) {
                    Some(&score) => score.max(1) as u32,
                    None => *old,
                })
                .collect()
        };

        for ((_, weight), new) in self.weights.iter_mut().zip(new_weights) {
            *weight = new;
        }
        self.update_choices();

        debug!(
            "根据 {} 条历史记录更新权重: {:?}",
            self.history.len(),
            self.weights
        );
    }
}

// --- 单元测试 ---
