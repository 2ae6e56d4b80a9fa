use crate::opponent::MoveSelector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

// --- 核心数据结构定义 ---

/// 出招 (MoveKind)
/// 出招集合由规则配置决定，这里只保存出招的名字。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveKind(String);

impl MoveKind {
    pub fn new(name: impl Into<String>) -> MoveKind {
        MoveKind(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MoveKind {
    fn from(name: &str) -> Self {
        MoveKind::new(name)
    }
}

/// 一回合的结果，总是站在某一方的视角记录
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    /// 换到对手视角
    pub fn invert(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// 对局双方
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Side {
    Human,
    Computer,
}

/// 单个出招的规则：它能打败哪些出招
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRule {
    pub name: MoveKind,
    #[serde(default)]
    pub beats: Vec<MoveKind>,
}

/// 规则集 (RuleSet)
/// 出招的顺序就是配置文件里的顺序，对手的候选池也按这个顺序展开。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_winning_score")]
    pub winning_score: u32,
    pub moves: Vec<MoveRule>,
}

fn default_winning_score() -> u32 {
    5
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("无法读取规则文件: {0}")]
    Io(#[from] std::io::Error),
    #[error("规则文件格式错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("规则集中没有任何出招")]
    Empty,
    #[error("出招名字不能为空")]
    BlankName,
    #[error("出招 `{0}` 的名字首尾不能有空白")]
    PaddedName(MoveKind),
    #[error("出招 `{0}` 重复定义（不区分大小写）")]
    DuplicateMove(MoveKind),
    #[error("出招 `{owner}` 引用了未定义的出招 `{target}`")]
    UnknownMove { owner: MoveKind, target: MoveKind },
    #[error("出招 `{0}` 不能打败自己")]
    SelfDefeat(MoveKind),
    #[error("出招 `{0}` 和 `{1}` 互相克制")]
    MutualDefeat(MoveKind, MoveKind),
    #[error("获胜分数必须至少为 1")]
    ZeroWinningScore,
}

// --- 实现辅助功能 ---

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Tie => "T",
        })
    }
}

impl RuleSet {
    /// 石头剪刀布蜥蜴史波克，默认规则
    pub fn rpsls() -> RuleSet {
        RuleSet::from_table(&[
            ("rock", &["scissors", "lizard"]),
            ("paper", &["rock", "spock"]),
            ("scissors", &["paper", "lizard"]),
            ("spock", &["scissors", "rock"]),
            ("lizard", &["paper", "spock"]),
        ])
    }

    /// 经典的三招石头剪刀布
    pub fn classic() -> RuleSet {
        RuleSet::from_table(&[
            ("rock", &["scissors"]),
            ("paper", &["rock"]),
            ("scissors", &["paper"]),
        ])
    }

    fn from_table(table: &[(&str, &[&str])]) -> RuleSet {
        let moves = table
            .iter()
            .map(|(name, beats)| MoveRule {
                name: MoveKind::from(*name),
                beats: beats.iter().map(|b| MoveKind::from(*b)).collect(),
            })
            .collect();
        RuleSet { winning_score: default_winning_score(), moves }
    }

    /// 解析并校验 JSON 格式的规则
    pub fn from_json_str(json: &str) -> Result<RuleSet, RuleError> {
        let rules: RuleSet = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<RuleSet, RuleError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let rules = RuleSet::from_json_str(&text)?;
        info!("从 {} 载入了 {} 个出招", path.as_ref().display(), rules.moves.len());
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.moves.is_empty() {
            return Err(RuleError::Empty);
        }
        if self.winning_score == 0 {
            return Err(RuleError::ZeroWinningScore);
        }

        // 玩家输入会去掉首尾空白并忽略大小写，名字必须在这种比较下仍然可以区分
        for (i, rule) in self.moves.iter().enumerate() {
            let name = rule.name.name();
            if name.is_empty() {
                return Err(RuleError::BlankName);
            }
            if name.trim() != name {
                return Err(RuleError::PaddedName(rule.name.clone()));
            }
            if self.moves[..i].iter().any(|r| r.name.name().eq_ignore_ascii_case(name)) {
                return Err(RuleError::DuplicateMove(rule.name.clone()));
            }
        }

        for rule in &self.moves {
            for target in &rule.beats {
                if *target == rule.name {
                    return Err(RuleError::SelfDefeat(rule.name.clone()));
                }
                if !self.contains(target) {
                    return Err(RuleError::UnknownMove {
                        owner: rule.name.clone(),
                        target: target.clone(),
                    });
                }
                if self.beats(target, &rule.name) {
                    return Err(RuleError::MutualDefeat(rule.name.clone(), target.clone()));
                }
            }
        }

        Ok(())
    }

    /// 按配置顺序返回所有出招
    pub fn moves(&self) -> impl Iterator<Item = &MoveKind> {
        self.moves.iter().map(|r| &r.name)
    }

    pub fn contains(&self, mv: &MoveKind) -> bool {
        self.moves.iter().any(|r| r.name == *mv)
    }

    /// 解析玩家输入，忽略大小写和首尾空白
    pub fn parse_move(&self, input: &str) -> Option<MoveKind> {
        let input = input.trim();
        self.moves()
            .find(|mv| mv.name().eq_ignore_ascii_case(input))
            .cloned()
    }

    pub fn beats(&self, attacker: &MoveKind, defender: &MoveKind) -> bool {
        self.moves
            .iter()
            .find(|r| r.name == *attacker)
            .is_some_and(|r| r.beats.contains(defender))
    }

    /// 站在 `mine` 一方的视角判断胜负
    pub fn outcome(&self, mine: &MoveKind, theirs: &MoveKind) -> Outcome {
        if self.beats(mine, theirs) {
            Outcome::Win
        } else if self.beats(theirs, mine) {
            Outcome::Loss
        } else {
            Outcome::Tie
        }
    }
}

// --- 对局流程 ---

/// 一回合的完整记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub human_move: MoveKind,
    pub computer_move: MoveKind,
    pub winner: Option<Side>,
}

impl RoundRecord {
    /// 站在玩家视角的本回合结果
    pub fn human_outcome(&self) -> Outcome {
        match self.winner {
            Some(Side::Human) => Outcome::Win,
            Some(Side::Computer) => Outcome::Loss,
            None => Outcome::Tie,
        }
    }
}

/// 每回合结束后返回给界面层的报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: RoundRecord,
    pub human_score: u32,
    pub computer_score: u32,
    /// 本回合结束了整场比赛时为 Some
    pub match_winner: Option<Side>,
}

/// 一次游戏会话：可以连续进行多场比赛，对手的历史在整个会话中累积
pub struct RpsSession<S: MoveSelector> {
    rules: RuleSet,
    opponent: S,
    human_score: u32,
    computer_score: u32,
    rounds: Vec<RoundRecord>,
    matches_played: u32,
}

impl<S: MoveSelector> RpsSession<S> {
    pub fn new(rules: RuleSet, opponent: S) -> Self {
        assert!(rules.winning_score >= 1, "获胜分数必须至少为 1");
        RpsSession {
            rules,
            opponent,
            human_score: 0,
            computer_score: 0,
            rounds: Vec::new(),
            matches_played: 0,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn opponent(&self) -> &S {
        &self.opponent
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.human_score, self.computer_score)
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    /// 本次会话所有回合，按时间顺序
    pub fn round_log(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn match_winner(&self) -> Option<Side> {
        if self.human_score >= self.rules.winning_score {
            Some(Side::Human)
        } else if self.computer_score >= self.rules.winning_score {
            Some(Side::Computer)
        } else {
            None
        }
    }

    pub fn is_match_over(&self) -> bool {
        self.match_winner().is_some()
    }

    /// 进行一回合。
    ///
    /// # Panics
    /// 比赛已经结束，或者玩家的出招不在规则集中时会 panic。
    pub fn play_round(&mut self, human_move: MoveKind) -> RoundReport {
        assert!(!self.is_match_over(), "比赛已经结束，请先开始下一场");
        assert!(self.rules.contains(&human_move), "未配置的出招: {}", human_move);

        let computer_move = self.opponent.select_move();
        let human_outcome = self.rules.outcome(&human_move, &computer_move);

        let winner = match human_outcome {
            Outcome::Win => {
                self.human_score += 1;
                Some(Side::Human)
            }
            Outcome::Loss => {
                self.computer_score += 1;
                Some(Side::Computer)
            }
            Outcome::Tie => None,
        };

        // 对手的历史记录站在电脑自己的视角
        self.opponent.record_round_outcome(computer_move.clone(), human_outcome.invert());

        let round = RoundRecord { human_move, computer_move, winner };
        self.rounds.push(round.clone());

        let match_winner = self.match_winner();
        if let Some(side) = match_winner {
            self.matches_played += 1;
            info!("第 {} 场比赛结束，胜者: {:?}", self.matches_played, side);
            self.opponent.recompute_weights();
        }

        RoundReport {
            round,
            human_score: self.human_score,
            computer_score: self.computer_score,
            match_winner,
        }
    }

    /// 开始下一场比赛：只清零比分，回合记录保留
    pub fn start_next_match(&mut self) {
        self.human_score = 0;
        self.computer_score = 0;
    }
}

// --- 单元测试 ---
