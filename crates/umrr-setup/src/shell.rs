//! 外部命令调用与失败分类
//!
//! 配置流程的每一步都是一次特权 OS 命令调用（`ip`、`slcand`、`pkill`）。
//! 原始流程对部分失败做整体抑制（"接口已 down 就算了"），这里改为
//! 显式策略：每次调用声明自己的 [`FailurePolicy`]，运行器按策略把
//! 非零退出分类为良性无操作或致命错误，良性失败记录 warn 日志后继续。

use std::process::Command;

use tracing::{debug, warn};

use crate::SetupError;

/// 非零退出码的分类策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 任何非零退出都致命，中止整个流程
    Fatal,
    /// 表内的退出码视为良性无操作（如 pkill 的 1 = 无匹配进程）
    BenignExit(&'static [i32]),
    /// 所有失败都视为良性（如对可能不存在的接口执行 down）
    AlwaysBenign,
}

impl FailurePolicy {
    /// 判断给定退出码在此策略下是否良性
    pub fn is_benign(&self, code: i32) -> bool {
        match self {
            FailurePolicy::Fatal => false,
            FailurePolicy::BenignExit(codes) => codes.contains(&code),
            FailurePolicy::AlwaysBenign => true,
        }
    }
}

/// 一次外部命令调用的完整描述
#[derive(Debug)]
pub struct ExternalCommand {
    /// 步骤名，用于日志和错误报告
    pub step: &'static str,
    pub program: &'static str,
    pub args: Vec<String>,
    pub policy: FailurePolicy,
}

/// 调用结果
///
/// 良性失败不是错误，但调用方可以知道这一步实际没有生效。
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// 命令成功退出
    Success,
    /// 命令失败，但按策略被抑制
    Suppressed(i32),
}

/// 执行一次外部命令并按策略分类结果
///
/// 阻塞直到命令退出。无法启动（程序缺失）永远致命，
/// 因为这说明运行环境本身不完整，与策略无关。
pub fn run(cmd: &ExternalCommand) -> Result<Outcome, SetupError> {
    debug!(step = cmd.step, program = cmd.program, args = ?cmd.args, "running external command");

    let output = Command::new(cmd.program)
        .args(&cmd.args)
        .output()
        .map_err(|source| SetupError::Spawn {
            step: cmd.step,
            source,
        })?;

    if output.status.success() {
        return Ok(Outcome::Success);
    }

    // 被信号终止时没有退出码，按 -1 处理（不会出现在任何良性表中）
    let code = output.status.code().unwrap_or(-1);
    if cmd.policy.is_benign(code) {
        warn!(
            step = cmd.step,
            code, "external command failed, suppressed as benign no-op"
        );
        return Ok(Outcome::Suppressed(code));
    }

    Err(SetupError::CommandFailed {
        step: cmd.step,
        code,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
