use crate::console::Console;
use crossterm::style::Stylize;
use parlor_core::twenty_one::{Phase, TableResult, TwentyOneGame};
use rand::Rng;
use std::io::{self, BufRead, Write};
use tracing::debug;

const PLAYER_CHOICES: [&str; 2] = ["h", "s"];

/// 二十一点：玩家对庄家，每局结束后可以再来一局
pub fn run<R: BufRead, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    rng: &mut G,
) -> io::Result<()> {
    console.say("欢迎来玩二十一点！")?;

    loop {
        let mut game = TwentyOneGame::new(rng);
        console.say(format!("你的手牌: {} (点数: {})", game.player(), game.player().score()))?;
        console.say(format!("庄家的手牌: {}", game.dealer().hidden_display()))?;

        while game.phase() == Phase::PlayerTurn {
            let choice = console.choose("轮到你了，要牌 (h) 还是停牌 (s)?", &PLAYER_CHOICES)?;
            if choice == "h" {
                let card = game.player_hit();
                console.say(format!("玩家要牌，拿到了 {}", card))?;
                console.say(format!("你的手牌: {} (点数: {})", game.player(), game.player().score()))?;
            } else {
                console.say("玩家停牌。")?;
                game.player_stay();
            }
        }

        if game.phase() == Phase::DealerTurn {
            for card in game.play_dealer() {
                console.say(format!("庄家要牌，拿到了 {}", card))?;
            }
            if !game.dealer().is_busted() {
                console.say("庄家停牌。")?;
            }
        }

        console.say("结果:")?;
        console.say(format!("你的手牌: {} (点数: {})", game.player(), game.player().score()))?;
        console.say(format!("庄家的手牌: {} (点数: {})", game.dealer(), game.dealer().score()))?;

        let result = game.result();
        debug!("本局结果: {:?}", result);
        match result {
            Some(TableResult::PlayerBusted) => console.say("你爆牌了，庄家获胜。".red())?,
            Some(TableResult::DealerBusted) => console.say("庄家爆牌了，你赢了！".green())?,
            Some(TableResult::PlayerWins) => console.say("你赢了！".green())?,
            Some(TableResult::DealerWins) => console.say("庄家获胜。".red())?,
            Some(TableResult::Push) | None => console.say("平局。".yellow())?,
        }

        if !console.confirm("再来一局吗?")? {
            break;
        }
    }

    console.say("谢谢你来玩二十一点！")
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_stay_then_quit() {
        let mut console = Console::new("x\ns\nn\n".as_bytes(), Vec::new());
        let mut rng = StdRng::seed_from_u64(4);
        run(&mut console, &mut rng).unwrap();

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("one other card"));
        assert!(out.contains("无效的输入，请重新输入 (h, s)"));
        assert!(out.contains("玩家停牌。"));
        assert!(out.contains("结果:"));
        assert!(out.contains("谢谢你来玩二十一点！"));
    }

    #[test]
    fn test_two_rounds() {
        let mut console = Console::new("s\ny\ns\nn\n".as_bytes(), Vec::new());
        let mut rng = StdRng::seed_from_u64(12);
        run(&mut console, &mut rng).unwrap();

        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out.matches("结果:").count(), 2);
    }
}
