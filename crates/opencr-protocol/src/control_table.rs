//! 控制表寄存器布局定义
//!
//! OpenCR 板卡把轮子、机械臂关节、夹爪和板载传感器聚合为一张
//! 内存映射寄存器表，通过 Dynamixel 协议按地址读写。
//! 本模块只描述布局（地址、宽度、访问方向），不包含任何逻辑。

/// 寄存器访问方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 只读（遥测、状态）
    Read,
    /// 只写（指令触发器）
    Write,
    /// 读写（设定值 + 当前值聚合寄存器）
    ReadWrite,
}

impl Access {
    /// 主机是否可以读取该寄存器
    pub const fn readable(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    /// 主机是否可以写入该寄存器
    pub const fn writable(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// 控制表寄存器描述符
///
/// 不变量（由单元测试保证）：
/// - 任意两个寄存器的字节范围互不重叠
/// - `CONTROL_TABLE_SIZE` = 所有寄存器 `address + width` 的最大值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    /// 起始地址（字节偏移）
    pub address: u16,
    /// 字节宽度（1 / 2 / 4）
    pub width: u16,
    /// 访问方向
    pub access: Access,
}

impl Register {
    pub const fn new(address: u16, width: u16, access: Access) -> Self {
        Self {
            address,
            width,
            access,
        }
    }

    /// 寄存器末尾地址（address + width，开区间）
    pub const fn end(&self) -> u16 {
        self.address + self.width
    }
}

// ============================================================================
// 系统 / 传感器区
// ============================================================================

pub const MODEL_NUMBER: Register = Register::new(0, 2, Access::Read);
pub const FIRMWARE_VERSION: Register = Register::new(2, 1, Access::Read);
pub const DEVICE_ID: Register = Register::new(3, 1, Access::Read);
pub const BAUD_RATE: Register = Register::new(4, 1, Access::Read);

/// 心跳寄存器：主机每个控制周期写入一个递增计数。
/// 板卡检测到计数停滞时判定主机失联并停止执行器。
pub const HEARTBEAT: Register = Register::new(6, 1, Access::ReadWrite);

pub const CONNECT_WHEELS: Register = Register::new(8, 1, Access::Read);
pub const CONNECT_MANIPULATOR: Register = Register::new(9, 1, Access::Read);

/// 蜂鸣器音效触发器（见 [`crate::constants::Sound`]）
pub const SOUND: Register = Register::new(10, 1, Access::Write);
/// IMU 重标定触发器
pub const IMU_RECALIBRATION: Register = Register::new(12, 1, Access::Write);

pub const IMU_ACCEL_X: Register = Register::new(14, 2, Access::Read);
pub const IMU_ACCEL_Y: Register = Register::new(16, 2, Access::Read);
pub const IMU_ACCEL_Z: Register = Register::new(18, 2, Access::Read);
pub const IMU_GYRO_X: Register = Register::new(20, 2, Access::Read);
pub const IMU_GYRO_Y: Register = Register::new(22, 2, Access::Read);
pub const IMU_GYRO_Z: Register = Register::new(24, 2, Access::Read);
pub const IMU_QUAT_W: Register = Register::new(26, 2, Access::Read);
pub const IMU_QUAT_X: Register = Register::new(28, 2, Access::Read);
pub const IMU_QUAT_Y: Register = Register::new(30, 2, Access::Read);
pub const IMU_QUAT_Z: Register = Register::new(32, 2, Access::Read);

/// 电池电压（厘伏）
pub const BATTERY_VOLTAGE: Register = Register::new(34, 2, Access::Read);

// ============================================================================
// 执行器区
// ============================================================================

pub const TORQUE_WHEELS: Register = Register::new(40, 1, Access::Write);
pub const TORQUE_JOINTS: Register = Register::new(41, 1, Access::Write);

pub const PRESENT_POSITION_WHEEL_LEFT: Register = Register::new(44, 4, Access::Read);
pub const PRESENT_POSITION_WHEEL_RIGHT: Register = Register::new(48, 4, Access::Read);
pub const PRESENT_VELOCITY_WHEEL_LEFT: Register = Register::new(52, 4, Access::Read);
pub const PRESENT_VELOCITY_WHEEL_RIGHT: Register = Register::new(56, 4, Access::Read);

/// 关节位置寄存器 [J1, J2, J3, J4]
///
/// 读写聚合：写入为目标位置，批量刷新后读出为当前位置。
/// 四个寄存器地址连续，`set_joint_positions` 依赖这一点在
/// 一次协议事务内写完全部四个关节。
pub const JOINT_POSITIONS: [Register; 4] = [
    Register::new(100, 4, Access::ReadWrite),
    Register::new(104, 4, Access::ReadWrite),
    Register::new(108, 4, Access::ReadWrite),
    Register::new(112, 4, Access::ReadWrite),
];

/// 夹爪位置寄存器（读写聚合，同上）
pub const GRIPPER_POSITION: Register = Register::new(116, 4, Access::ReadWrite);

pub const PRESENT_VELOCITY_JOINTS: [Register; 4] = [
    Register::new(120, 4, Access::Read),
    Register::new(124, 4, Access::Read),
    Register::new(128, 4, Access::Read),
    Register::new(132, 4, Access::Read),
];
pub const PRESENT_VELOCITY_GRIPPER: Register = Register::new(136, 4, Access::Read);

pub const PROFILE_ACCELERATION_JOINTS: [Register; 4] = [
    Register::new(140, 4, Access::ReadWrite),
    Register::new(144, 4, Access::ReadWrite),
    Register::new(148, 4, Access::ReadWrite),
    Register::new(152, 4, Access::ReadWrite),
];
pub const PROFILE_ACCELERATION_GRIPPER: Register = Register::new(156, 4, Access::ReadWrite);

pub const PROFILE_VELOCITY_JOINTS: [Register; 4] = [
    Register::new(160, 4, Access::ReadWrite),
    Register::new(164, 4, Access::ReadWrite),
    Register::new(168, 4, Access::ReadWrite),
    Register::new(172, 4, Access::ReadWrite),
];
pub const PROFILE_VELOCITY_GRIPPER: Register = Register::new(176, 4, Access::ReadWrite);

/// 控制表总大小（字节）= max(address + width)
pub const CONTROL_TABLE_SIZE: usize = 180;

/// 全部寄存器（用于不变量检查与调试工具）
pub const ALL_REGISTERS: &[Register] = &[
    MODEL_NUMBER,
    FIRMWARE_VERSION,
    DEVICE_ID,
    BAUD_RATE,
    HEARTBEAT,
    CONNECT_WHEELS,
    CONNECT_MANIPULATOR,
    SOUND,
    IMU_RECALIBRATION,
    IMU_ACCEL_X,
    IMU_ACCEL_Y,
    IMU_ACCEL_Z,
    IMU_GYRO_X,
    IMU_GYRO_Y,
    IMU_GYRO_Z,
    IMU_QUAT_W,
    IMU_QUAT_X,
    IMU_QUAT_Y,
    IMU_QUAT_Z,
    BATTERY_VOLTAGE,
    TORQUE_WHEELS,
    TORQUE_JOINTS,
    PRESENT_POSITION_WHEEL_LEFT,
    PRESENT_POSITION_WHEEL_RIGHT,
    PRESENT_VELOCITY_WHEEL_LEFT,
    PRESENT_VELOCITY_WHEEL_RIGHT,
    JOINT_POSITIONS[0],
    JOINT_POSITIONS[1],
    JOINT_POSITIONS[2],
    JOINT_POSITIONS[3],
    GRIPPER_POSITION,
    PRESENT_VELOCITY_JOINTS[0],
    PRESENT_VELOCITY_JOINTS[1],
    PRESENT_VELOCITY_JOINTS[2],
    PRESENT_VELOCITY_JOINTS[3],
    PRESENT_VELOCITY_GRIPPER,
    PROFILE_ACCELERATION_JOINTS[0],
    PROFILE_ACCELERATION_JOINTS[1],
    PROFILE_ACCELERATION_JOINTS[2],
    PROFILE_ACCELERATION_JOINTS[3],
    PROFILE_ACCELERATION_GRIPPER,
    PROFILE_VELOCITY_JOINTS[0],
    PROFILE_VELOCITY_JOINTS[1],
    PROFILE_VELOCITY_JOINTS[2],
    PROFILE_VELOCITY_JOINTS[3],
    PROFILE_VELOCITY_GRIPPER,
];

#[cfg(test)]
mod tests {
    use super::*;

    /// 任意两个寄存器的字节范围互不重叠
    #[test]
    fn test_registers_never_overlap() {
        for (i, a) in ALL_REGISTERS.iter().enumerate() {
            for b in &ALL_REGISTERS[i + 1..] {
                let disjoint = a.end() <= b.address || b.end() <= a.address;
                assert!(
                    disjoint,
                    "registers overlap: {:?} and {:?}",
                    a, b
                );
            }
        }
    }

    /// CONTROL_TABLE_SIZE 等于所有寄存器 address + width 的最大值
    #[test]
    fn test_control_table_size_covers_all_registers() {
        let max_end = ALL_REGISTERS.iter().map(|r| r.end()).max().unwrap();
        assert_eq!(CONTROL_TABLE_SIZE, max_end as usize);
    }

    /// 寄存器宽度只允许 1 / 2 / 4
    #[test]
    fn test_register_widths_supported() {
        for reg in ALL_REGISTERS {
            assert!(
                matches!(reg.width, 1 | 2 | 4),
                "unsupported width {} at address {}",
                reg.width,
                reg.address
            );
        }
    }

    /// 四个关节位置寄存器地址连续（批量写依赖）
    #[test]
    fn test_joint_position_block_contiguous() {
        for pair in JOINT_POSITIONS.windows(2) {
            assert_eq!(pair[0].end(), pair[1].address);
        }
        // 夹爪紧随其后，不属于同一批量写
        assert_eq!(JOINT_POSITIONS[3].end(), GRIPPER_POSITION.address);
    }

    /// 轮廓加速度 / 速度寄存器块同样连续
    #[test]
    fn test_profile_blocks_contiguous() {
        for block in [&PROFILE_ACCELERATION_JOINTS, &PROFILE_VELOCITY_JOINTS] {
            for pair in block.windows(2) {
                assert_eq!(pair[0].end(), pair[1].address);
            }
        }
    }

    #[test]
    fn test_access_direction() {
        assert!(MODEL_NUMBER.access.readable());
        assert!(!MODEL_NUMBER.access.writable());
        assert!(SOUND.access.writable());
        assert!(!SOUND.access.readable());
        assert!(HEARTBEAT.access.readable());
        assert!(HEARTBEAT.access.writable());
    }
}
