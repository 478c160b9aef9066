//! 原生 SocketCAN 接口配置
//!
//! 接口存在性和管理态探测走 `if_nametoindex()` + `ioctl(SIOCGIFFLAGS)`，
//! 不需要特权；实际配置步骤（down / up + bitrate / txqueuelen）shell 出
//! `ip link`，需要 root。配置不可逆：本模块不提供 teardown，只在
//! [`teardown_hint`] 里告诉操作员手动拆除的命令。

use std::ffi::CString;
use std::io;
use std::process::Command;

use libc::{AF_INET, IFF_UP, SIOCGIFFLAGS, SOCK_DGRAM, if_nametoindex, ifreq};
use tracing::{debug, info};

use crate::SetupError;
use crate::config::SetupConfig;
use crate::shell::{self, ExternalCommand, FailurePolicy};

// ifr_name 是 IFNAMSIZ = 16 字节，含结尾 NUL
const MAX_IFACE_NAME_LEN: usize = 15;

/// 检查网络接口是否存在
///
/// 只读操作，普通用户即可执行。
pub fn interface_exists(interface: &str) -> Result<bool, SetupError> {
    let c_iface = validated_name(interface)?;
    let ifindex = unsafe { if_nametoindex(c_iface.as_ptr()) };
    Ok(ifindex != 0)
}

/// 检查接口是否处于管理态 UP
///
/// 接口不存在时返回错误；存在但 DOWN 返回 `Ok(false)`。
pub fn interface_is_up(interface: &str) -> Result<bool, SetupError> {
    let c_iface = validated_name(interface)?;

    let ifindex = unsafe { if_nametoindex(c_iface.as_ptr()) };
    if ifindex == 0 {
        return Err(SetupError::MissingInterface {
            interface: interface.to_string(),
            available: available_can_interfaces(),
        });
    }

    let mut ifr: ifreq = unsafe { std::mem::zeroed() };
    let name_bytes = interface.as_bytes();
    unsafe {
        std::ptr::copy_nonoverlapping(
            name_bytes.as_ptr(),
            ifr.ifr_name.as_mut_ptr() as *mut u8,
            name_bytes.len(),
        );
        ifr.ifr_name[name_bytes.len()] = 0;
    }

    struct FdGuard(libc::c_int);
    impl Drop for FdGuard {
        fn drop(&mut self) {
            if self.0 >= 0 {
                unsafe { libc::close(self.0) };
            }
        }
    }

    let sockfd = unsafe { libc::socket(AF_INET, SOCK_DGRAM, 0) };
    if sockfd < 0 {
        return Err(SetupError::Io(io::Error::last_os_error()));
    }
    let _guard = FdGuard(sockfd);

    let result = unsafe {
        libc::ioctl(
            sockfd,
            SIOCGIFFLAGS,
            &mut ifr as *mut _ as *mut libc::c_void,
        )
    };
    if result < 0 {
        return Err(SetupError::Io(io::Error::last_os_error()));
    }

    // ifru_flags 是 ifr_ifru union 的第一个字段，c_short 对齐和大小都匹配
    let flags = unsafe { *(std::ptr::addr_of!(ifr.ifr_ifru) as *const libc::c_short) };
    Ok((flags as i32 & IFF_UP) != 0)
}

/// 枚举当前存在的 CAN 接口（best-effort，用于错误信息）
pub fn available_can_interfaces() -> Vec<String> {
    socketcan::available_interfaces().unwrap_or_default()
}

fn validated_name(interface: &str) -> Result<CString, SetupError> {
    if interface.len() > MAX_IFACE_NAME_LEN {
        return Err(SetupError::InvalidInterface {
            interface: interface.to_string(),
            reason: format!("name too long (max {} characters)", MAX_IFACE_NAME_LEN),
        });
    }
    CString::new(interface).map_err(|e| SetupError::InvalidInterface {
        interface: interface.replace('\0', "\\0"),
        reason: e.to_string(),
    })
}

/// 把接口置为管理态 down
///
/// 失败无条件抑制：接口可能本来就 down，也可能尚不存在（slcan 路径）。
/// 上游脚本就是这样做的；接口处于异常内核状态时这会掩盖真实故障，
/// 行为按原样保留。
pub fn bring_down(interface: &str) -> Result<(), SetupError> {
    shell::run(&ExternalCommand {
        step: "ip link set down",
        program: "ip",
        args: vec![
            "link".into(),
            "set".into(),
            interface.into(),
            "down".into(),
        ],
        policy: FailurePolicy::AlwaysBenign,
    })
    .map(|_| ())
}

/// 设置波特率并把接口置为 up
pub fn bring_up_with_bitrate(interface: &str, bitrate: u32) -> Result<(), SetupError> {
    shell::run(&ExternalCommand {
        step: "ip link set up type can",
        program: "ip",
        args: vec![
            "link".into(),
            "set".into(),
            interface.into(),
            "up".into(),
            "type".into(),
            "can".into(),
            "bitrate".into(),
            bitrate.to_string(),
        ],
        policy: FailurePolicy::Fatal,
    })
    .map(|_| ())
}

/// 把接口置为 up（slcan 路径，波特率已由 slcand 设置）
pub fn bring_up(interface: &str) -> Result<(), SetupError> {
    shell::run(&ExternalCommand {
        step: "ip link set up",
        program: "ip",
        args: vec![
            "link".into(),
            "set".into(),
            interface.into(),
            "up".into(),
        ],
        policy: FailurePolicy::Fatal,
    })
    .map(|_| ())
}

/// 加宽发送队列
///
/// 雷达以高帧率突发，默认 txqueuelen 10 会丢帧。
pub fn widen_tx_queue(interface: &str, txqueuelen: u32) -> Result<(), SetupError> {
    shell::run(&ExternalCommand {
        step: "ip link set txqueuelen",
        program: "ip",
        args: vec![
            "link".into(),
            "set".into(),
            "dev".into(),
            interface.into(),
            "txqueuelen".into(),
            txqueuelen.to_string(),
        ],
        policy: FailurePolicy::Fatal,
    })
    .map(|_| ())
}

/// 原生 SocketCAN 接口完整配置流程
///
/// 顺序：校验波特率 → 确认接口存在 → down（抑制失败）→
/// up + bitrate → txqueuelen。接口不存在时立即失败，
/// 错误里列出当前可用的 CAN 接口，不会尝试 bring-up。
/// 接口已处于 UP 态不是错误，重复执行等于重新配置。
pub fn setup_native(config: &SetupConfig) -> Result<(), SetupError> {
    config.validate()?;

    if !interface_exists(&config.interface)? {
        return Err(SetupError::MissingInterface {
            interface: config.interface.clone(),
            available: available_can_interfaces(),
        });
    }

    if interface_is_up(&config.interface)? {
        debug!(interface = %config.interface, "interface already up, reconfiguring");
    }

    debug!(interface = %config.interface, "configuring native SocketCAN interface");
    bring_down(&config.interface)?;
    bring_up_with_bitrate(&config.interface, config.bitrate)?;
    widen_tx_queue(&config.interface, config.txqueuelen)?;

    info!(
        interface = %config.interface,
        bitrate = config.bitrate,
        "native CAN interface configured"
    );
    Ok(())
}

/// 打印接口详情（best-effort，仅供操作员查看）
pub fn print_interface_details(interface: &str) {
    let _ = Command::new("ip")
        .args(["-details", "link", "show", interface])
        .status();
}

/// 手动拆除接口的命令提示（本工具从不执行拆除）
pub fn teardown_hint(interface: &str) -> String {
    format!("to take the interface down later: sudo ip link set {} down", interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterKind;

    #[test]
    fn test_interface_exists_loopback() {
        // lo 在任何 Linux 上都存在
        assert!(interface_exists("lo").unwrap());
    }

    #[test]
    fn test_interface_exists_negative() {
        assert!(!interface_exists("can999").unwrap());
    }

    #[test]
    fn test_interface_name_too_long() {
        let name = "a".repeat(20);
        assert!(matches!(
            interface_exists(&name),
            Err(SetupError::InvalidInterface { .. })
        ));
    }

    #[test]
    fn test_interface_name_with_nul() {
        assert!(matches!(
            interface_exists("can0\0"),
            Err(SetupError::InvalidInterface { .. })
        ));
    }

    #[test]
    fn test_interface_is_up_loopback() {
        // lo 在测试环境里总是 UP；已处于 UP 态只是一个可观察状态，不是错误
        assert!(interface_is_up("lo").unwrap());
    }

    #[test]
    fn test_interface_is_up_missing_interface() {
        assert!(matches!(
            interface_is_up("can999"),
            Err(SetupError::MissingInterface { .. })
        ));
    }

    #[test]
    fn test_setup_native_missing_interface_fails_before_bring_up() {
        // 接口不存在必须在任何 ip 调用之前失败
        let config = SetupConfig {
            interface: "can999".to_string(),
            adapter: AdapterKind::Native,
            ..SetupConfig::default()
        };
        match setup_native(&config) {
            Err(SetupError::MissingInterface { interface, .. }) => {
                assert_eq!(interface, "can999");
            },
            other => panic!("expected MissingInterface, got {:?}", other),
        }
    }

    #[test]
    fn test_setup_native_rejects_bad_bitrate_first() {
        // 波特率校验先于接口探测
        let config = SetupConfig {
            interface: "can999".to_string(),
            bitrate: 42,
            ..SetupConfig::default()
        };
        assert!(matches!(
            setup_native(&config),
            Err(SetupError::UnsupportedBitrate { bitrate: 42, .. })
        ));
    }

    #[test]
    fn test_teardown_hint_names_interface() {
        assert!(teardown_hint("can0").contains("ip link set can0 down"));
    }
}
