//! 驱动进程启动
//!
//! 依次 source 两个环境 profile（工具链、工作区），然后 `exec` 进入
//! 驱动的 launch 入口。这是终点式的阻塞移交：`exec` 成功后本进程被
//! 驱动替换，不再有监督、重启或健康检查；函数只在启动失败时返回。

use std::os::unix::process::CommandExt;
use std::process::Command;

use tracing::info;

use crate::SetupError;
use crate::config::LaunchConfig;

/// 构造移交脚本
///
/// `exec` 保证 bash 不会留在进程树里夹在中间。
pub fn launch_script(config: &LaunchConfig) -> String {
    format!(
        "source {} && source {} && exec ros2 launch {} {}",
        config.toolchain_profile.display(),
        config.workspace_profile.display(),
        config.package,
        config.launch_file,
    )
}

/// 启动雷达驱动，用其替换当前进程
///
/// 成功时永不返回。返回值只可能是 `Err`：
/// `exec(2)` 失败（bash 缺失、profile 路径错误不算——那在子 shell 里
/// 才会暴露，但此时进程已被替换，退出码由 bash 传出）。
pub fn launch_driver(config: &LaunchConfig) -> Result<(), SetupError> {
    let script = launch_script(config);
    info!(
        package = %config.package,
        launch_file = %config.launch_file,
        "handing off to radar driver"
    );

    let err = Command::new("bash").arg("-c").arg(&script).exec();
    Err(SetupError::Spawn {
        step: "ros2 launch",
        source: err,
    })
}
