//! 配置结构体定义
//!
//! 四个固定配置项（接口名、波特率、适配器类型、串口设备路径）在启动时
//! 构造一次，按引用传递给各配置步骤；没有环境全局量。
//! 数值是编译期固定的部署常量，不提供文件或命令行覆盖，
//! 更换雷达接线时直接修改 `Default` 实现。

use std::env;
use std::path::PathBuf;

use crate::SetupError;
use crate::bitrate;

/// CAN 适配器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// 原生内核 SocketCAN 接口（PCAN、板载控制器等）
    Native,
    /// USB 串口适配器，经 slcand 线路规程挂成网络接口
    SerialLine,
}

/// 一次接口配置流程的全部输入
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// 目标接口名（如 "can0"）
    pub interface: String,
    /// 总线波特率（bit/s），必须在 `bitrate::SUPPORTED_BITRATES` 内
    pub bitrate: u32,
    /// 适配器类型，决定走 `link` 还是 `slcan` 路径
    pub adapter: AdapterKind,
    /// 串口设备节点，仅 `SerialLine` 路径使用
    pub serial_device: PathBuf,
    /// 配置完成后设置的发送队列长度
    pub txqueuelen: u32,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            interface: "can0".to_string(),
            bitrate: 500_000,
            adapter: AdapterKind::Native,
            serial_device: PathBuf::from("/dev/ttyUSB0"),
            txqueuelen: 1000,
        }
    }
}

impl SetupConfig {
    /// 校验波特率是否在共享档位表内
    ///
    /// 原生路径在入口调用；串口路径在换算档位号时经过同一张表，
    /// 效果等价。未知波特率是致命配置错误，错误信息中列出全部合法值。
    pub fn validate(&self) -> Result<(), SetupError> {
        bitrate::speed_code(self.adapter, self.bitrate).map(|_| ())
    }
}

/// 驱动启动入口的描述
///
/// 两个环境初始化 profile 定义了驱动工具链和工作区的位置，
/// 启动脚本依次 source 之后 exec 进入 launch 入口。
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// 工具链环境 profile（ROS 发行版 setup.bash）
    pub toolchain_profile: PathBuf,
    /// 工作区环境 profile（install/setup.bash）
    pub workspace_profile: PathBuf,
    /// 驱动包名
    pub package: String,
    /// launch 文件名
    pub launch_file: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        let home = env::var("HOME").unwrap_or_else(|_| "/root".to_string());
        Self {
            toolchain_profile: PathBuf::from("/opt/ros/humble/setup.bash"),
            workspace_profile: PathBuf::from(home).join("ros2_ws/install/setup.bash"),
            package: "umrr_ros2_driver".to_string(),
            launch_file: "radar_can_muup.launch.py".to_string(),
        }
    }
}
