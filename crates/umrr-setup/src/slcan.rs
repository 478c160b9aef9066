//! 串口 CAN 适配器配置（slcand 线路规程）
//!
//! USB 串口适配器不是内核 CAN 设备，需要 `slcand` 把串口绑成网络接口。
//! 配置顺序有讲究：先杀掉上一个 slcand 实例（否则串口被占用），
//! 再把可能残留的接口 down 掉，然后以档位号启动 slcand，
//! 等线路规程绑定完成后 up 接口、加宽发送队列。
//!
//! "进程不存在"、"接口尚不存在" 都是合法的无操作，按策略抑制；
//! 设备节点缺失、波特率不支持是配置错误，立即致命。

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::SetupError;
use crate::bitrate;
use crate::config::SetupConfig;
use crate::link;
use crate::shell::{self, ExternalCommand, FailurePolicy};

// slcand fork 到后台后，netdev 注册还要一点时间
const ATTACH_SETTLE: Duration = Duration::from_millis(1500);

/// 枚举指定目录下的 USB 串口设备节点（best-effort，用于错误信息）
///
/// 只认 ttyUSB* 和 ttyACM*，这是 USB-CAN 适配器会出现的两类节点。
pub fn list_serial_devices(dev_dir: &Path) -> Vec<String> {
    let mut devices: Vec<String> = std::fs::read_dir(dev_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| {
                    let name = e.file_name();
                    let name = name.to_string_lossy();
                    name.starts_with("ttyUSB") || name.starts_with("ttyACM")
                })
                .map(|e| e.path().display().to_string())
                .collect()
        })
        .unwrap_or_default();
    devices.sort();
    devices
}

/// 终止上一个 slcand 实例
///
/// pkill 退出码 1 表示没有匹配进程，是合法的无操作。
pub fn kill_stale_daemon() -> Result<(), SetupError> {
    shell::run(&ExternalCommand {
        step: "pkill slcand",
        program: "pkill",
        args: vec!["slcand".into()],
        policy: FailurePolicy::BenignExit(&[1]),
    })
    .map(|_| ())
}

/// 启动 slcand，把串口绑定到目标接口
pub fn attach_daemon(device: &Path, interface: &str, code: u8) -> Result<(), SetupError> {
    shell::run(&ExternalCommand {
        step: "slcand attach",
        program: "slcand",
        args: vec![
            "-o".into(),
            "-c".into(),
            format!("-s{}", code),
            device.display().to_string(),
            interface.into(),
        ],
        policy: FailurePolicy::Fatal,
    })
    .map(|_| ())
}

/// 串口 CAN 适配器完整配置流程
///
/// 顺序：波特率转档位号 → 确认设备节点存在 → 杀掉旧 slcand →
/// down 残留接口（抑制失败）→ 启动 slcand → 等待绑定 →
/// up → txqueuelen。设备节点缺失时立即失败，错误里列出
/// 当前接入的串口设备，不会调用 slcand。
pub fn setup_serial_line(config: &SetupConfig) -> Result<(), SetupError> {
    let code = bitrate::speed_code(config.adapter, config.bitrate)?;

    if !config.serial_device.exists() {
        return Err(SetupError::MissingDevice {
            device: config.serial_device.clone(),
            available: list_serial_devices(Path::new("/dev")),
        });
    }

    debug!(
        device = %config.serial_device.display(),
        interface = %config.interface,
        code,
        "configuring serial-line CAN adapter"
    );

    kill_stale_daemon()?;
    link::bring_down(&config.interface)?;
    attach_daemon(&config.serial_device, &config.interface, code)?;
    thread::sleep(ATTACH_SETTLE);
    link::bring_up(&config.interface)?;
    link::widen_tx_queue(&config.interface, config.txqueuelen)?;

    info!(
        interface = %config.interface,
        device = %config.serial_device.display(),
        "serial-line CAN interface configured"
    );
    Ok(())
}
