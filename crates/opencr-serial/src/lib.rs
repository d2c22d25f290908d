//! # OpenCR Serial Adapter Layer
//!
//! 串口传输抽象层，提供统一的 Dynamixel 协议后端接口。
//!
//! 真实后端（厂商 SDK 的端口/包处理封装）在本 workspace 之外实现；
//! 这里只定义驱动层消费的 trait 和用于测试的 mock 后端。

use thiserror::Error;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockTransport;

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Port not open")]
    NotOpen,

    #[error("No response from device {id}")]
    NoResponse { id: u8 },

    /// 应答包中的设备错误字段非零
    #[error("Device error status 0x{status:02X}")]
    Status { status: u8 },

    /// 包级错误（CRC 校验失败、长度异常等）
    #[error("Packet error: {0}")]
    Packet(String),

    #[error("Unsupported: {0}")]
    Unsupported(&'static str),
}

/// `bulk_read` 请求条目：从 `id` 的 `address` 起读取 `length` 字节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkReadEntry {
    pub id: u8,
    pub address: u16,
    pub length: u16,
}

/// `sync_write` 请求条目：向 `id` 的公共地址写入 `data`
///
/// 所有条目的 `data` 长度必须等于 `sync_write` 的 `length` 参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWriteEntry {
    pub id: u8,
    pub data: Vec<u8>,
}

/// Dynamixel 协议传输后端
///
/// 所有调用都是同步且有界的；超时语义由后端自身保证，
/// 本层不实现取消或重试。
pub trait DxlTransport {
    /// 打开串口设备（如 `/dev/ttyACM0`）
    fn open(&mut self, path: &str) -> Result<(), TransportError>;

    /// 设置总线波特率，必须在 `open` 之后调用
    fn set_baud_rate(&mut self, baud: u32) -> Result<(), TransportError>;

    /// ping 设备，返回应答中的 model number
    fn ping(&mut self, id: u8) -> Result<u16, TransportError>;

    /// 读取单个寄存器区间
    fn read(&mut self, id: u8, address: u16, length: u16) -> Result<Vec<u8>, TransportError>;

    /// 一次协议事务读取多个寄存器区间，应答按条目顺序拼接
    fn bulk_read(&mut self, entries: &[BulkReadEntry]) -> Result<Vec<u8>, TransportError>;

    /// 向单个设备写入一段连续字节
    fn write(&mut self, id: u8, address: u16, data: &[u8]) -> Result<(), TransportError>;

    /// 一次协议事务向多个设备的同一地址写入
    fn sync_write(
        &mut self,
        address: u16,
        length: u16,
        entries: &[SyncWriteEntry],
    ) -> Result<(), TransportError>;
}
