use crate::console::Console;
use crossterm::style::Stylize;
use parlor_core::{AdaptiveOpponent, MoveKind, RoundRecord, RpsSession, RuleSet, Side};
use rand::Rng;
use std::io::{self, BufRead, Write};
use tracing::info;

const LINE: &str = "------------------------------------";

/// 石头剪刀布：可以连续进行多场比赛，电脑在每场结束后调整出招权重
pub fn run<R: BufRead, W: Write, G: Rng>(
    console: &mut Console<R, W>,
    rules: RuleSet,
    rng: G,
) -> io::Result<()> {
    let opponent = AdaptiveOpponent::from_rules(&rules, rng);
    let mut session = RpsSession::new(rules, opponent);
    let winning_score = session.rules().winning_score;

    console.say("欢迎来玩石头剪刀布！")?;
    console.say(format!("每回合一分，先拿到 {} 分的一方获胜。", winning_score))?;
    console.show(format!("{}\n", LINE))?;

    loop {
        while !session.is_match_over() {
            let names: Vec<&str> = session.rules().moves().map(MoveKind::name).collect();
            let question = format!("请出招 ({})", names.join(", "));
            let rules = session.rules();
            let human = console.ask(&question, |s| rules.parse_move(s), "无效的出招，请重新选择。")?;

            let report = session.play_round(human);
            console.say(format!("你出了: {}", report.round.human_move))?;
            console.say(format!("电脑出了: {}", report.round.computer_move))?;
            match report.round.winner {
                Some(Side::Human) => console.say("你赢了这一回合！".green())?,
                Some(Side::Computer) => console.say("电脑赢了这一回合！".red())?,
                None => console.say("平局。".yellow())?,
            }
            console.say(format!("你的得分: {}", report.human_score))?;
            console.say(format!("电脑得分: {}", report.computer_score))?;
            console.show(format!("{}\n", LINE))?;
        }

        match session.match_winner() {
            Some(Side::Human) => console.say(format!("你以 {} 分赢得了比赛！", winning_score).green())?,
            _ => console.say(format!("电脑以 {} 分赢得了比赛！", winning_score).red())?,
        }
        info!("电脑当前的出招权重: {:?}", session.opponent().weights());

        if console.confirm("要查看出招历史吗?")? {
            console.show(history_table(session.round_log()))?;
        }

        session.start_next_match();

        if !console.confirm("再来一场吗?")? {
            break;
        }
        console.clear()?;
    }

    console.say("谢谢你来玩石头剪刀布！")
}

/// 出招历史表格，结果一栏站在玩家视角
fn history_table(rounds: &[RoundRecord]) -> String {
    let mut table = format!("{}\n回合  | 玩家     | 电脑     | 结果\n", LINE);
    for (i, round) in rounds.iter().enumerate() {
        table.push_str(&format!(
            "{:>3}   | {:<8} | {:<8} | {}\n",
            i + 1,
            round.human_move.name(),
            round.computer_move.name(),
            round.human_outcome()
        ));
    }
    table.push_str(LINE);
    table.push('\n');
    table
}

// --- 单元测试 ---
