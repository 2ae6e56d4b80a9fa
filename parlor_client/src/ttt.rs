use crate::console::Console;
use crossterm::style::Stylize;
use parlor_core::tictactoe::{self, Board, Marker, SeriesScore, join_or};
use rand::Rng;
use std::io::{self, BufRead, Write};
use tracing::debug;

const FIRST_PLAYER_OPTIONS: [&str; 2] = ["player", "computer"];

/// 井字棋：多局制比赛，先赢满 `games_to_win` 局的一方获胜
pub fn run<R: BufRead, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    games_to_win: u32,
    rng: &mut G,
) -> io::Result<()> {
    console.clear()?;
    console.say("欢迎来玩井字棋！")?;

    loop {
        let mut score = SeriesScore::new(games_to_win);

        loop {
            let winner = play_game(console, rng)?;
            score.record(winner);

            console.say(format!("先赢 {} 局的一方赢得比赛。", score.games_to_win))?;
            console.say(format!("玩家: {} 胜", score.human))?;
            console.say(format!("电脑: {} 胜", score.computer))?;

            if let Some(champion) = score.champion() {
                match champion {
                    Marker::Human => console.say("你赢得了整场比赛！".green())?,
                    Marker::Computer => console.say("电脑赢得了整场比赛！".red())?,
                }
                break;
            }

            if !console.confirm("再来一局吗?")? {
                break;
            }
        }

        if !console.confirm("再来一场比赛吗?")? {
            break;
        }
    }

    console.say("谢谢你来玩井字棋！再见！")
}

/// 进行一局，返回胜者，平局返回 None
fn play_game<R: BufRead, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    rng: &mut G,
) -> io::Result<Option<Marker>> {
    let mut board = Board::new();
    let question = format!("谁先走? ({})", join_or(&FIRST_PLAYER_OPTIONS, ", ", "or"));
    let first = console.choose(&question, &FIRST_PLAYER_OPTIONS)?;
    let mut current = if first == "player" { Marker::Human } else { Marker::Computer };

    while !board.is_over() {
        display_board(console, &board)?;

        let square = match current {
            Marker::Human => {
                let unused = board.unused_squares();
                let question = format!("请选择格子: {}", join_or(&unused, ", ", "or"));
                console.ask(
                    &question,
                    |s| s.parse::<usize>().ok().filter(|sq| unused.contains(sq)),
                    "这个格子不能选，请重新选择。",
                )?
            }
            Marker::Computer => {
                let square = tictactoe::choose_square(&board, rng);
                debug!("电脑选择了 {} 号格子", square);
                square
            }
        };

        board.mark(square, current);
        current = current.opponent();
    }

    display_board(console, &board)?;
    let winner = board.winner();
    match winner {
        Some(Marker::Human) => console.say("你赢了！".green())?,
        Some(Marker::Computer) => console.say("电脑赢了！".red())?,
        None => console.say("平局！".yellow())?,
    }
    Ok(winner)
}

fn display_board<R: BufRead, W: Write>(console: &mut Console<R, W>, board: &Board) -> io::Result<()> {
    console.clear()?;
    console.say(format!(
        "你是 {}，电脑是 {}",
        Marker::Human.symbol(),
        Marker::Computer.symbol()
    ))?;
    console.show(format!("\n{}\n", board))
}

// --- 单元测试 ---
