//! 驱动层错误类型定义

use opencr_protocol::ProtocolError;
use opencr_serial::TransportError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 传输层错误（串口、协议包）
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 协议层错误（应答长度、字段取值）
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 串口尚未打开
    #[error("Port not opened. Call `open_port()` first")]
    NotOpened,

    /// 波特率尚未协商
    #[error("Baud rate not set. Call `set_baud_rate()` after `open_port()`")]
    NotOperational,
}

#[cfg(test)]
mod tests {
    use super::DriverError;
    use opencr_protocol::ProtocolError;
    use opencr_serial::TransportError;

    /// 测试 DriverError 的 Display 实现
    #[test]
    fn test_driver_error_display() {
        let transport_error = TransportError::NotOpen;
        let driver_error = DriverError::Transport(transport_error);
        let msg = format!("{}", driver_error);
        assert!(msg.contains("Port not open"), "message: {}", msg);

        let protocol_error = ProtocolError::InvalidLength {
            expected: 180,
            actual: 4,
        };
        let driver_error = DriverError::Protocol(protocol_error);
        let msg = format!("{}", driver_error);
        assert!(msg.contains("Invalid data length"), "message: {}", msg);

        let msg = format!("{}", DriverError::NotOpened);
        assert!(msg.contains("open_port"));

        let msg = format!("{}", DriverError::NotOperational);
        assert!(msg.contains("set_baud_rate"));
    }

    /// 测试 From<TransportError> 转换
    #[test]
    fn test_from_transport_error() {
        let transport_error = TransportError::NoResponse { id: 200 };
        let driver_error: DriverError = transport_error.into();
        match driver_error {
            DriverError::Transport(TransportError::NoResponse { id }) => assert_eq!(id, 200),
            other => panic!("Expected Transport variant, got {:?}", other),
        }
    }

    /// 测试 From<ProtocolError> 转换
    #[test]
    fn test_from_protocol_error() {
        let protocol_error = ProtocolError::InvalidWidth { width: 3 };
        let driver_error: DriverError = protocol_error.into();
        assert!(matches!(
            driver_error,
            DriverError::Protocol(ProtocolError::InvalidWidth { width: 3 })
        ));
    }
}
