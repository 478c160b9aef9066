//! # UMRR Radar CAN Setup
//!
//! smartmicro UMRR 雷达驱动的 CAN 接口配置库。
//!
//! 提供两条配置路径：
//! - 原生 SocketCAN 接口（内核驱动，如 PCAN）：`link` 模块
//! - USB 串口 CAN 适配器（`slcand` 线路规程）：`slcan` 模块
//!
//! 配置完成后通过 `launch` 模块移交给外部雷达驱动进程。
//! 所有外部命令调用都经过 `shell` 模块的显式失败分类策略，
//! 已知的良性失败（接口已 down、守护进程不存在）被抑制，
//! 配置错误（波特率不支持、设备不存在）立即致命退出。

use std::path::PathBuf;

use thiserror::Error;

pub mod bitrate;
pub mod config;
pub mod launch;
#[cfg(target_os = "linux")]
pub mod link;
pub mod privilege;
pub mod prompt;
pub mod shell;
#[cfg(target_os = "linux")]
pub mod slcan;

pub use bitrate::{SUPPORTED_BITRATES, speed_code};
pub use config::{AdapterKind, LaunchConfig, SetupConfig};

/// 配置流程统一错误类型
///
/// 所有致命路径最终以退出码 1 报告给操作员；
/// 良性无操作（接口已 down、slcand 未运行）不会出现在这里。
#[derive(Error, Debug)]
pub enum SetupError {
    /// 需要 root 权限的操作在非特权下被调用
    #[error("this operation modifies kernel network state and must be run as root (euid = {euid})")]
    NotPrivileged { euid: u32 },

    /// 配置的 CAN 接口不存在
    #[error(
        "CAN interface '{interface}' does not exist. Available CAN interfaces: {}",
        format_listing(.available)
    )]
    MissingInterface {
        interface: String,
        available: Vec<String>,
    },

    /// 配置的串口设备节点不存在
    #[error(
        "serial device '{}' does not exist. Attached serial devices: {}",
        .device.display(),
        format_listing(.available)
    )]
    MissingDevice {
        device: PathBuf,
        available: Vec<String>,
    },

    /// 波特率不在已知档位表内
    #[error(
        "unsupported CAN bitrate {bitrate} bit/s. Supported rates: {}",
        format_rates(.supported)
    )]
    UnsupportedBitrate {
        bitrate: u32,
        supported: &'static [u32],
    },

    /// 外部命令无法启动（程序缺失等）
    #[error("failed to spawn external command for step '{step}': {source}")]
    Spawn {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// 外部命令以致命状态退出
    #[error("step '{step}' failed with exit code {code}: {stderr}")]
    CommandFailed {
        step: &'static str,
        code: i32,
        stderr: String,
    },

    /// 接口名无效（过长或包含 NUL）
    #[error("invalid interface name '{interface}': {reason}")]
    InvalidInterface { interface: String, reason: String },

    /// 系统调用失败（socket/ioctl）
    #[error("system call failed: {0}")]
    Io(#[from] std::io::Error),
}

fn format_listing(items: &[String]) -> String {
    if items.is_empty() {
        "(none found)".to_string()
    } else {
        items.join(", ")
    }
}

fn format_rates(rates: &[u32]) -> String {
    rates
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_interface_lists_alternatives() {
        let err = SetupError::MissingInterface {
            interface: "can0".to_string(),
            available: vec!["can1".to_string(), "vcan0".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("can0"));
        assert!(msg.contains("can1, vcan0"));
    }

    #[test]
    fn test_missing_interface_empty_listing() {
        let err = SetupError::MissingInterface {
            interface: "can0".to_string(),
            available: vec![],
        };
        assert!(err.to_string().contains("(none found)"));
    }

    #[test]
    fn test_unsupported_bitrate_lists_valid_values() {
        let err = SetupError::UnsupportedBitrate {
            bitrate: 333_333,
            supported: &SUPPORTED_BITRATES,
        };
        let msg = err.to_string();
        assert!(msg.contains("333333"));
        assert!(msg.contains("500000"));
        assert!(msg.contains("1000000"));
    }
}
