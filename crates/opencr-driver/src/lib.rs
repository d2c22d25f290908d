//! # OpenCR Driver
//!
//! OpenCR 控制板的主机侧驱动核心。
//!
//! ## 模块
//!
//! - `buffer`: 控制表的共享只读快照（粗粒度互斥锁）
//! - `opencr`: 设备控制器（生命周期、批量刷新、设定值写入）
//! - `error`: 驱动层错误类型
//!
//! ## 并发模型
//!
//! 驱动本身不调度：外部控制循环在每个周期驱动一次批量刷新
//! （读 tick）和若干设定值写入（写 tick）。缓冲区的互斥锁只在
//! 字节拷贝期间持有，从不跨越传输层 I/O 调用。

pub mod buffer;
pub mod error;
pub mod opencr;

// 重新导出常用类型
pub use buffer::{RegisterBuffer, RegisterValue};
pub use error::DriverError;
pub use opencr::OpenCr;

// 下游只依赖 driver 即可拿到协议与传输层类型
pub use opencr_protocol as protocol;
pub use opencr_serial as serial;
