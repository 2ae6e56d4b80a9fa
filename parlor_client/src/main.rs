mod console;
mod rps;
mod ttt;
mod twenty_one;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use console::Console;
use parlor_core::RuleSet;

#[derive(Parser)]
#[command(name = "parlor", version, about = "控制台回合制小游戏合集")]
struct Cli {
    #[command(subcommand)]
    game: Game,
}

#[derive(Subcommand)]
enum Game {
    /// 石头剪刀布，默认带蜥蜴和史波克
    Rps {
        /// JSON 格式的规则文件
        #[arg(long)]
        rules: Option<PathBuf>,
        /// 只用石头、剪刀、布三种出招
        #[arg(long, conflicts_with = "rules")]
        classic: bool,
        /// 赢得一场比赛需要的分数，覆盖规则文件中的设置
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        winning_score: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// 井字棋
    Ttt {
        /// 赢得比赛需要赢的局数
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
        games_to_win: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// 二十一点
    TwentyOne {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 日志写到 stderr，避免和游戏画面混在一起
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut console = Console::new(io::stdin().lock(), io::stdout());

    match cli.game {
        Game::Rps { rules, classic, winning_score, seed } => {
            let mut rules = match rules {
                Some(path) => RuleSet::from_json_file(path)?,
                None if classic => RuleSet::classic(),
                None => RuleSet::rpsls(),
            };
            if let Some(score) = winning_score {
                rules.winning_score = score;
            }
            rps::run(&mut console, rules, make_rng(seed))?;
        }
        Game::Ttt { games_to_win, seed } => {
            ttt::run(&mut console, games_to_win, &mut make_rng(seed))?;
        }
        Game::TwentyOne { seed } => {
            twenty_one::run(&mut console, &mut make_rng(seed))?;
        }
    }

    Ok(())
}

/// 指定种子时使用可复现的随机数，否则从系统熵源初始化
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!("使用随机数种子 {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}
