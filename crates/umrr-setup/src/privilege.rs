//! 特权检查
//!
//! 接口配置要改内核网络状态，必须 root。判定逻辑对 euid 值做成纯函数，
//! 测试不需要真的降权。

use nix::unistd::Uid;

use crate::SetupError;

/// 对给定 euid 做特权判定
pub fn ensure_root_for(euid: u32) -> Result<(), SetupError> {
    if euid == 0 {
        Ok(())
    } else {
        Err(SetupError::NotPrivileged { euid })
    }
}

/// 要求当前进程以 root 运行
pub fn ensure_root() -> Result<(), SetupError> {
    ensure_root_for(Uid::effective().as_raw())
}

/// 当前进程是否以 root 运行
pub fn effective_is_root() -> bool {
    Uid::effective().is_root()
}
