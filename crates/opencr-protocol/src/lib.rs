//! # OpenCR Protocol
//!
//! OpenCR 控制板寄存器表协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `control_table`: 控制表寄存器布局（地址、宽度、访问方向）
//! - `constants`: 协议常量定义
//! - `units`: 物理单位 ↔ 原始刻度的转换
//! - `sensors`: IMU / 电池原始寄存器解码
//!
//! ## 字节序
//!
//! Dynamixel 协议使用 Intel (LSB) 低位在前（小端字节序）。
//! 本模块提供了字节序转换工具函数。

pub mod constants;
pub mod control_table;
pub mod sensors;
pub mod units;

// 重新导出常用类型
pub use constants::*;
pub use control_table::*;
pub use sensors::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid register width: {width} (supported: 1, 2, 4)")]
    InvalidWidth { width: u16 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },
}

/// 字节序转换工具函数
///
/// 协议使用 Intel (LSB) 低位在前（小端字节序），
/// 这些函数用于在协议层进行字节序转换。
///
/// 小端字节序转 i32
pub fn bytes_to_i32_le(bytes: [u8; 4]) -> i32 {
    i32::from_le_bytes(bytes)
}

/// 小端字节序转 u32
pub fn bytes_to_u32_le(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// 小端字节序转 i16
pub fn bytes_to_i16_le(bytes: [u8; 2]) -> i16 {
    i16::from_le_bytes(bytes)
}

/// 小端字节序转 u16
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// i32 转小端字节序
pub fn i32_to_bytes_le(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

/// i16 转小端字节序
pub fn i16_to_bytes_le(value: i16) -> [u8; 2] {
    value.to_le_bytes()
}

/// u16 转小端字节序
pub fn u16_to_bytes_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}
