//! 波特率档位表
//!
//! slcand 的 `-s` 参数用档位号而不是原始波特率；原生 SocketCAN 虽然直接
//! 接受 bit/s，但合法值集合与串口适配器相同。两条路径共用这一张表：
//! `SerialLine` 消费档位号，`Native` 只用它做取值校验。

use crate::SetupError;
use crate::config::AdapterKind;

/// 波特率(bit/s) 到 slcand 档位号的映射
const SPEED_TABLE: [(u32, u8); 9] = [
    (10_000, 0),
    (20_000, 1),
    (50_000, 2),
    (100_000, 3),
    (125_000, 4),
    (250_000, 5),
    (500_000, 6),
    (800_000, 7),
    (1_000_000, 8),
];

/// 全部支持的波特率，用于错误信息中的合法值列表
pub const SUPPORTED_BITRATES: [u32; 9] = [
    10_000, 20_000, 50_000, 100_000, 125_000, 250_000, 500_000, 800_000, 1_000_000,
];

/// 查询波特率对应的适配器档位号
///
/// 目前两种适配器类型共用同一张表；按类型作为查询键保留，
/// 是为了未来出现档位不同的适配器时不必改调用方。
///
/// # 错误
/// 波特率不在表内时返回 [`SetupError::UnsupportedBitrate`]，
/// 其中带有全部合法值。
pub fn speed_code(adapter: AdapterKind, bitrate: u32) -> Result<u8, SetupError> {
    let _ = adapter;
    SPEED_TABLE
        .iter()
        .find(|(rate, _)| *rate == bitrate)
        .map(|(_, code)| *code)
        .ok_or(SetupError::UnsupportedBitrate {
            bitrate,
            supported: &SUPPORTED_BITRATES,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_nine_rates_map_to_documented_codes() {
        let expected = [
            (10_000, 0),
            (20_000, 1),
            (50_000, 2),
            (100_000, 3),
            (125_000, 4),
            (250_000, 5),
            (500_000, 6),
            (800_000, 7),
            (1_000_000, 8),
        ];
        for (rate, code) in expected {
            assert_eq!(
                speed_code(AdapterKind::SerialLine, rate).unwrap(),
                code,
                "rate {} should map to code {}",
                rate,
                code
            );
        }
    }

    #[test]
    fn test_both_adapter_kinds_share_the_table() {
        for rate in SUPPORTED_BITRATES {
            assert_eq!(
                speed_code(AdapterKind::Native, rate).unwrap(),
                speed_code(AdapterKind::SerialLine, rate).unwrap()
            );
        }
    }

    #[test]
    fn test_unknown_rate_is_fatal_and_lists_valid_values() {
        for rate in [0, 1, 9_600, 115_200, 499_999, 2_000_000] {
            match speed_code(AdapterKind::Native, rate) {
                Err(SetupError::UnsupportedBitrate { bitrate, supported }) => {
                    assert_eq!(bitrate, rate);
                    assert_eq!(supported, &SUPPORTED_BITRATES[..]);
                },
                other => panic!("rate {} should be rejected, got {:?}", rate, other),
            }
        }
    }
}
