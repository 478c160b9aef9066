//! 交互式确认提示
//!
//! `all` 模式在配置完成后询问是否启动驱动，回车默认为是。
//! 读取端抽象成 `BufRead`，三值解析（是/否/空输入），
//! 测试用内存 reader 即可，不需要真实终端。

use std::io::{self, BufRead, Write};

/// 一次确认读取的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// 空输入，取提示的默认值
    Default,
}

impl Answer {
    /// 在默认为"是"的提示下是否继续
    pub fn accepted(self) -> bool {
        !matches!(self, Answer::No)
    }
}

/// 解析一行输入
///
/// 只有显式的 n/N/no 算拒绝，与上游 `[Y/n]` 语义一致；
/// 空输入是独立的第三态，由提示方决定默认值。
pub fn parse_answer(line: &str) -> Answer {
    match line.trim() {
        "" => Answer::Default,
        "n" | "N" | "no" | "No" | "NO" => Answer::No,
        _ => Answer::Yes,
    }
}

/// 打印提示并读取一行回答
pub fn ask(
    question: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Answer> {
    write!(output, "{} [Y/n] ", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_answer(&line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_explicit_yes() {
        assert_eq!(parse_answer("y\n"), Answer::Yes);
        assert_eq!(parse_answer("yes"), Answer::Yes);
        assert_eq!(parse_answer("Y"), Answer::Yes);
    }

    #[test]
    fn test_parse_explicit_no() {
        assert_eq!(parse_answer("n\n"), Answer::No);
        assert_eq!(parse_answer("No"), Answer::No);
        assert_eq!(parse_answer("  N  "), Answer::No);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_answer(""), Answer::Default);
        assert_eq!(parse_answer("\n"), Answer::Default);
        assert_eq!(parse_answer("   "), Answer::Default);
    }

    #[test]
    fn test_unrecognized_input_counts_as_yes() {
        // 上游 [Y/n] 语义：只有显式 n 才拒绝
        assert_eq!(parse_answer("sure"), Answer::Yes);
    }

    #[test]
    fn test_default_accepts() {
        assert!(Answer::Default.accepted());
        assert!(Answer::Yes.accepted());
        assert!(!Answer::No.accepted());
    }

    #[test]
    fn test_ask_writes_prompt_and_reads_answer() {
        let mut input = Cursor::new(b"n\n".to_vec());
        let mut output = Vec::new();

        let answer = ask("Start the driver?", &mut input, &mut output).unwrap();
        assert_eq!(answer, Answer::No);
        assert_eq!(String::from_utf8(output).unwrap(), "Start the driver? [Y/n] ");
    }

    #[test]
    fn test_ask_eof_is_default() {
        // 输入端关闭（EOF）时当作空输入
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert_eq!(
            ask("Continue?", &mut input, &mut output).unwrap(),
            Answer::Default
        );
    }
}
