use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- 核心数据结构定义 ---

/// 棋子标记
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Marker {
    Human,    // X
    Computer, // O
}

impl Marker {
    pub fn symbol(self) -> char {
        match self {
            Marker::Human => 'X',
            Marker::Computer => 'O',
        }
    }

    pub fn opponent(self) -> Marker {
        match self {
            Marker::Human => Marker::Computer,
            Marker::Computer => Marker::Human,
        }
    }
}

/// 所有能连成一线的三个格子，格子编号 1..=9，从左上角开始按行编号
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [1, 2, 3], [4, 5, 6], [7, 8, 9], // 横
    [1, 4, 7], [2, 5, 8], [3, 6, 9], // 竖
    [1, 5, 9], [3, 5, 7],            // 对角线
];

pub const CENTER_SQUARE: usize = 5;

/// 井字棋棋盘
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [Option<Marker>; 9],
}

impl Board {
    pub fn new() -> Board {
        Board::default()
    }

    pub fn get(&self, square: usize) -> Option<Marker> {
        assert!((1..=9).contains(&square), "格子编号必须在 1 到 9 之间");
        self.squares[square - 1]
    }

    /// 在空格子上落子
    ///
    /// # Panics
    /// 格子编号越界或者格子已被占用时会 panic。
    pub fn mark(&mut self, square: usize, marker: Marker) {
        assert!(self.get(square).is_none(), "格子 {} 已经有棋子了", square);
        self.squares[square - 1] = Some(marker);
    }

    pub fn unused_squares(&self) -> Vec<usize> {
        (1..=9).filter(|&sq| self.squares[sq - 1].is_none()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    fn count_markers(&self, line: &[usize; 3], marker: Option<Marker>) -> usize {
        line.iter().filter(|&&sq| self.squares[sq - 1] == marker).count()
    }

    pub fn winner(&self) -> Option<Marker> {
        WINNING_LINES.iter().find_map(|line| {
            [Marker::Human, Marker::Computer]
                .into_iter()
                .find(|&m| self.count_markers(line, Some(m)) == 3)
        })
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// `marker` 再下一步就能连成一线的空格子，每条线一项。
    /// 同时补全两条线的格子会出现两次，随机选择时被选中的机会也加倍。
    pub fn completing_squares(&self, marker: Marker) -> Vec<usize> {
        WINNING_LINES
            .iter()
            .filter(|line| {
                self.count_markers(line, Some(marker)) == 2 && self.count_markers(line, None) == 1
            })
            .filter_map(|line| line.iter().copied().find(|&sq| self.squares[sq - 1].is_none()))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cell = |sq: usize| self.squares[sq - 1].map_or(' ', Marker::symbol);
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----+-----+-----")?;
            }
            let base = row * 3;
            writeln!(f, "     |     |")?;
            writeln!(f, "  {}  |  {}  |  {}", cell(base + 1), cell(base + 2), cell(base + 3))?;
            writeln!(f, "     |     |")?;
        }
        Ok(())
    }
}

// --- 电脑策略 ---

/// 电脑选择落子的格子
///
/// 优先级：能直接获胜的格子 > 需要封堵的格子 > 任意空格子。
/// 候选格子里如果有中心格就选中心，否则随机选一个。
///
/// # Panics
/// 棋盘已满时会 panic。
pub fn choose_square<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> usize {
    let attack = board.completing_squares(Marker::Computer);
    let defend = board.completing_squares(Marker::Human);

    let candidates = if !attack.is_empty() {
        attack
    } else if !defend.is_empty() {
        defend
    } else {
        board.unused_squares()
    };

    if candidates.contains(&CENTER_SQUARE) {
        return CENTER_SQUARE;
    }

    match candidates.choose(rng) {
        Some(&sq) => sq,
        None => panic!("棋盘已满，无处落子"),
    }
}

// --- 比赛计分 ---

/// 多局比赛的比分，先赢满 `games_to_win` 局的一方获胜
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesScore {
    pub human: u32,
    pub computer: u32,
    pub games_to_win: u32,
}

impl SeriesScore {
    pub fn new(games_to_win: u32) -> SeriesScore {
        assert!(games_to_win >= 1, "获胜局数必须至少为 1");
        SeriesScore { human: 0, computer: 0, games_to_win }
    }

    /// 记录一局的结果，平局不计分
    pub fn record(&mut self, winner: Option<Marker>) {
        match winner {
            Some(Marker::Human) => self.human += 1,
            Some(Marker::Computer) => self.computer += 1,
            None => {}
        }
    }

    pub fn champion(&self) -> Option<Marker> {
        if self.human >= self.games_to_win {
            Some(Marker::Human)
        } else if self.computer >= self.games_to_win {
            Some(Marker::Computer)
        } else {
            None
        }
    }
}

/// 把列表拼成 "1, 2, or 3" 的形式
pub fn join_or<T: fmt::Display>(items: &[T], delimiter: &str, last_word: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} {} {}", first, last_word, second),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|x| x.to_string()).collect();
            format!("{}{}{} {}", head.join(delimiter), delimiter, last_word, last)
        }
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use Marker::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(human: &[usize], computer: &[usize]) -> Board {
        let mut b = Board::new();
        for &sq in human {
            b.mark(sq, Human);
        }
        for &sq in computer {
            b.mark(sq, Computer);
        }
        b
    }

    #[test]
    fn test_new_board_is_empty() {
        let b = Board::new();
        assert_eq!(b.unused_squares(), (1..=9).collect::<Vec<_>>());
        assert!(!b.is_full());
        assert_eq!(b.winner(), None);
    }

    #[test]
    fn test_detects_winner() {
        assert_eq!(board(&[1, 5, 9], &[2, 3]).winner(), Some(Human));
        assert_eq!(board(&[1, 2], &[3, 5, 7]).winner(), Some(Computer));
        assert_eq!(board(&[1, 2], &[4, 5]).winner(), None);
    }

    #[test]
    fn test_full_board_tie() {
        // X O X / X O O / O X X
        let b = board(&[1, 3, 4, 8, 9], &[2, 5, 6, 7]);
        assert!(b.is_full());
        assert_eq!(b.winner(), None);
        assert!(b.is_over());
    }

    #[test]
    #[should_panic]
    fn test_mark_occupied_square_panics() {
        let mut b = board(&[1], &[]);
        b.mark(1, Computer);
    }

    #[test]
    fn test_computer_attacks_first() {
        // 电脑可以在 3 号格获胜，同时人类威胁 6 号格
        let b = board(&[4, 5, 9], &[1, 2]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(choose_square(&b, &mut rng), 3);
    }

    #[test]
    fn test_computer_blocks_threat() {
        let b = board(&[1, 2], &[5]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(choose_square(&b, &mut rng), 3);
    }

    #[test]
    fn test_computer_prefers_center() {
        let b = board(&[1], &[]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(choose_square(&b, &mut rng), CENTER_SQUARE);

        // 中心格在封堵候选里也会被优先选择
        let b = board(&[1, 9], &[2]);
        assert_eq!(choose_square(&b, &mut rng), CENTER_SQUARE);
    }

    #[test]
    fn test_fork_square_is_listed_per_line() {
        // 1 号格同时补全 1-2-3 和 1-4-7
        let b = board(&[5, 6, 8], &[2, 3, 4, 7]);
        assert_eq!(b.completing_squares(Computer), vec![1, 1]);
        assert_eq!(b.completing_squares(Human), Vec::<usize>::new());
    }

    #[test]
    fn test_fork_square_doubles_its_chance() {
        // 电脑可以在 1 号格（两条线）或 9 号格（一条线）获胜
        let b = board(&[5, 8], &[2, 3, 4, 6, 7]);
        assert_eq!(b.completing_squares(Computer), vec![1, 1, 9]);

        let mut rng = StdRng::seed_from_u64(17);
        let draws = 3_000;
        let ones = (0..draws).filter(|_| choose_square(&b, &mut rng) == 1).count();
        let frequency = ones as f64 / draws as f64;
        assert!((frequency - 2.0 / 3.0).abs() < 0.05, "square 1 frequency was {}", frequency);
    }

    #[test]
    fn test_computer_picks_unused_square() {
        let b = board(&[5], &[]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let sq = choose_square(&b, &mut rng);
            assert!(b.unused_squares().contains(&sq));
        }
    }

    #[test]
    fn test_series_score() {
        let mut score = SeriesScore::new(2);
        score.record(Some(Human));
        score.record(None);
        score.record(Some(Computer));
        assert_eq!(score.champion(), None);
        score.record(Some(Computer));
        assert_eq!(score.champion(), Some(Computer));
    }

    #[test]
    fn test_join_or() {
        assert_eq!(join_or::<usize>(&[], ", ", "or"), "");
        assert_eq!(join_or(&[1], ", ", "or"), "1");
        assert_eq!(join_or(&[1, 2], ", ", "or"), "1 or 2");
        assert_eq!(join_or(&[1, 2, 3], ", ", "or"), "1, 2, or 3");
        assert_eq!(join_or(&["a", "b", "c"], "; ", "and"), "a; b; and c");
    }

    #[test]
    fn test_board_display() {
        let text = board(&[1], &[5]).to_string();
        assert!(text.contains("  X  |     |  "));
        assert!(text.contains("     |  O  |  "));
        assert_eq!(text.lines().count(), 11);
    }
}
