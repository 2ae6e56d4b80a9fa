use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// 控制台输入输出，读写对象可以替换成内存缓冲方便测试
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// 输出一行提示信息
    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "=> {}", message)
    }

    /// 原样输出（棋盘、表格等多行内容）
    pub fn show(&mut self, text: impl Display) -> io::Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))
    }

    // 读一行输入，已转为小写并去掉首尾空白
    fn read_line(&mut self) -> io::Result<String> {
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "输入已结束"));
        }
        Ok(line.trim().to_lowercase())
    }

    /// 反复提问，直到 `parse` 接受输入为止
    pub fn ask<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Option<T>,
        retry_hint: &str,
    ) -> io::Result<T> {
        self.say(question)?;
        loop {
            let answer = self.read_line()?;
            if let Some(value) = parse(&answer) {
                return Ok(value);
            }
            self.say(retry_hint)?;
        }
    }

    /// 从固定选项中选择一个
    pub fn choose(&mut self, question: &str, choices: &[&str]) -> io::Result<String> {
        let hint = format!("无效的输入，请重新输入 ({})", choices.join(", "));
        self.ask(
            question,
            |answer| choices.iter().find(|c| **c == answer).map(|c| c.to_string()),
            &hint,
        )
    }

    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.choose(&format!("{} (y/n)", question), &["y", "n"])?;
        Ok(answer == "y")
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

// --- 单元测试 ---
