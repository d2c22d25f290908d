//! 协议常量定义

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// OpenCR 板卡在 Dynamixel 总线上的默认 ID
pub const DEFAULT_DEVICE_ID: u8 = 200;

/// 默认波特率（bps）
pub const DEFAULT_BAUD_RATE: u32 = 1_000_000;

/// 板卡型号（ping 应答中的 model number）
pub const BOARD_MODEL_NUMBER: u16 = 0x5000;

/// 力矩开关寄存器值
pub const TORQUE_ON: u8 = 1;
pub const TORQUE_OFF: u8 = 0;

/// 连接标志寄存器值（connect_wheels / connect_manipulator）
pub const CONNECTED: u8 = 1;

/// IMU 重标定触发值
pub const IMU_RECALIBRATION_TRIGGER: u8 = 1;

/// 蜂鸣器音效索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Sound {
    /// 下行音阶（关机提示）
    Descending = 0,
    /// 上行音阶（开机提示）
    Ascending = 1,
    /// 警告音
    Warning = 2,
    /// 错误音
    Error = 3,
    /// 低电量提示
    LowBattery = 4,
}

impl Sound {
    /// 从寄存器原始值解析，无效值返回协议错误
    pub fn from_register(value: u8) -> Result<Self, ProtocolError> {
        Self::try_from(value).map_err(|_| ProtocolError::InvalidValue {
            field: "Sound".to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_from_register() {
        assert_eq!(Sound::from_register(0).unwrap(), Sound::Descending);
        assert_eq!(Sound::from_register(4).unwrap(), Sound::LowBattery);
        assert!(Sound::from_register(5).is_err());
        assert!(Sound::from_register(0xFF).is_err());
    }

    #[test]
    fn test_sound_into_u8() {
        let raw: u8 = Sound::Warning.into();
        assert_eq!(raw, 2);
    }
}
