//! 设备控制器模块
//!
//! 提供对外的 [`OpenCr`] 结构体，独占传输后端与寄存器缓冲区，
//! 封装链路生命周期、批量刷新与设定值写入。
//!
//! 缓冲区是只读缓存：设定值直接写入设备寄存器，不回写本地快照；
//! 下一次批量刷新自然会把设备侧的实际状态带回来。

use crate::buffer::RegisterBuffer;
use crate::error::DriverError;
use opencr_protocol::units;
use opencr_protocol::{
    BATTERY_VOLTAGE, BOARD_MODEL_NUMBER, Battery, CONNECT_MANIPULATOR, CONNECT_WHEELS, CONNECTED,
    CONTROL_TABLE_SIZE, GRIPPER_POSITION, HEARTBEAT, IMU_ACCEL_X, IMU_ACCEL_Y, IMU_ACCEL_Z,
    IMU_GYRO_X, IMU_GYRO_Y, IMU_GYRO_Z, IMU_QUAT_W, IMU_QUAT_X, IMU_QUAT_Y, IMU_QUAT_Z,
    IMU_RECALIBRATION, IMU_RECALIBRATION_TRIGGER, Imu, JOINT_POSITIONS,
    PRESENT_POSITION_WHEEL_LEFT, PRESENT_POSITION_WHEEL_RIGHT, PRESENT_VELOCITY_GRIPPER,
    PRESENT_VELOCITY_JOINTS, PRESENT_VELOCITY_WHEEL_LEFT, PRESENT_VELOCITY_WHEEL_RIGHT,
    PROFILE_ACCELERATION_GRIPPER, PROFILE_ACCELERATION_JOINTS, PROFILE_VELOCITY_GRIPPER,
    PROFILE_VELOCITY_JOINTS, ProtocolError, SOUND, Sound, TORQUE_JOINTS, TORQUE_OFF, TORQUE_ON,
    TORQUE_WHEELS, i32_to_bytes_le,
};
use opencr_serial::{BulkReadEntry, DxlTransport};
use tracing::{debug, info, trace, warn};

/// 链路生命周期状态
///
/// `Unopened → Opened → Operational`；除 `open_port` / `set_baud_rate`
/// 外的操作都要求 `Operational`，提前调用返回类型化错误而不是
/// 未定义行为。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    Unopened,
    Opened,
    Operational,
}

// ============================================================================
// 命名位姿常量
// ============================================================================

/// 家位姿关节角（弧度）：臂收拢、重心落在底盘内
const HOME_POSE_JOINTS: [f64; 4] = [0.0, -1.05, 1.05, 0.0];

/// 初始位姿关节角（弧度）：全部关节回零
const INIT_POSE_JOINTS: [f64; 4] = [0.0; 4];

/// 位姿切换时的保守运动轮廓（原始单位）
const POSE_PROFILE_ACCELERATION: i32 = 20;
const POSE_PROFILE_VELOCITY: i32 = 100;

/// 位姿目标夹爪开度（米）
const POSE_GRIPPER_METERS: f64 = 0.0;

/// OpenCR 设备控制器（对外 API）
///
/// 独占一个传输后端实例；缓冲区与控制器同生命周期，
/// 构造时零填充，从不序列化。
pub struct OpenCr<T: DxlTransport> {
    /// 传输后端（单一所有者句柄）
    transport: T,
    /// 板卡总线 ID
    id: u8,
    /// 控制表只读快照
    buffer: RegisterBuffer,
    /// 链路状态
    link: LinkState,
    /// 心跳计数，每次 `send_heartbeat` 递增（mod 256 回绕）
    heartbeat: u8,
}

impl<T: DxlTransport> OpenCr<T> {
    /// 创建新的控制器实例
    ///
    /// # 参数
    /// - `transport`: 传输后端（所有权移交控制器）
    /// - `id`: 板卡在总线上的 ID（见 [`opencr_protocol::DEFAULT_DEVICE_ID`]）
    pub fn new(transport: T, id: u8) -> Self {
        Self {
            transport,
            id,
            buffer: RegisterBuffer::new(),
            link: LinkState::Unopened,
            heartbeat: 0,
        }
    }

    fn ensure_operational(&self) -> Result<(), DriverError> {
        match self.link {
            LinkState::Operational => Ok(()),
            LinkState::Opened => Err(DriverError::NotOperational),
            LinkState::Unopened => Err(DriverError::NotOpened),
        }
    }

    // ========================================================================
    // 生命周期
    // ========================================================================

    /// 打开串口设备
    ///
    /// 失败时不保留部分状态，可以换参数重试。
    pub fn open_port(&mut self, path: &str) -> Result<(), DriverError> {
        match self.transport.open(path) {
            Ok(()) => {
                self.link = LinkState::Opened;
                info!(path, "port opened");
                Ok(())
            }
            Err(e) => {
                warn!(path, error = %e, "failed to open port");
                Err(e.into())
            }
        }
    }

    /// 协商总线波特率，必须在 [`open_port`](Self::open_port) 之后调用
    pub fn set_baud_rate(&mut self, baud: u32) -> Result<(), DriverError> {
        if self.link == LinkState::Unopened {
            return Err(DriverError::NotOpened);
        }
        match self.transport.set_baud_rate(baud) {
            Ok(()) => {
                self.link = LinkState::Operational;
                info!(baud, "baud rate set");
                Ok(())
            }
            Err(e) => {
                warn!(baud, error = %e, "failed to set baud rate");
                Err(e.into())
            }
        }
    }

    /// ping 板卡，返回应答中的 model number
    pub fn ping(&mut self) -> Result<u16, DriverError> {
        self.ensure_operational()?;
        let model = self.transport.ping(self.id)?;
        if model == BOARD_MODEL_NUMBER {
            info!(id = self.id, model, "board responding");
        } else {
            warn!(id = self.id, model, "unexpected model number");
        }
        Ok(model)
    }

    /// 机械臂执行器是否在线（直接读设备侧连接标志）
    pub fn is_connect_manipulator(&mut self) -> Result<bool, DriverError> {
        Ok(self.read_byte(CONNECT_MANIPULATOR.address)? == CONNECTED)
    }

    /// 轮子执行器是否在线
    pub fn is_connect_wheels(&mut self) -> Result<bool, DriverError> {
        Ok(self.read_byte(CONNECT_WHEELS.address)? == CONNECTED)
    }

    // ========================================================================
    // 批量刷新（读 tick）
    // ========================================================================

    /// 执行一次批量读取并整体替换本地快照
    ///
    /// 传输失败时旧快照保持逐位不变：宁可读到陈旧数据，
    /// 也不让部分覆盖产生损坏数据。
    pub fn read_all(&mut self) -> Result<(), DriverError> {
        self.ensure_operational()?;
        let entry = BulkReadEntry {
            id: self.id,
            address: 0,
            length: CONTROL_TABLE_SIZE as u16,
        };
        // 锁不跨越 I/O：先完成传输往返，再在锁内做字节拷贝
        let staging = self.transport.bulk_read(&[entry])?;
        if staging.len() != CONTROL_TABLE_SIZE {
            return Err(ProtocolError::InvalidLength {
                expected: CONTROL_TABLE_SIZE,
                actual: staging.len(),
            }
            .into());
        }
        self.buffer.refresh(&staging);
        trace!(id = self.id, "control table refreshed");
        Ok(())
    }

    // ========================================================================
    // 快照查询（缓冲区 + 单位转换，除锁外不阻塞）
    // ========================================================================

    /// 轮子累计位置（弧度）[左, 右]
    pub fn get_wheel_positions(&self) -> [f64; 2] {
        [
            PRESENT_POSITION_WHEEL_LEFT,
            PRESENT_POSITION_WHEEL_RIGHT,
        ]
        .map(|reg| units::wheel_ticks_to_radians(self.buffer.get::<i32>(reg)))
    }

    /// 轮子角速度（rad/s）[左, 右]
    pub fn get_wheel_velocities(&self) -> [f64; 2] {
        [
            PRESENT_VELOCITY_WHEEL_LEFT,
            PRESENT_VELOCITY_WHEEL_RIGHT,
        ]
        .map(|reg| units::velocity_ticks_to_rad_s(self.buffer.get::<i32>(reg)))
    }

    /// 关节位置（弧度）[J1, J2, J3, J4]
    pub fn get_joint_positions(&self) -> [f64; 4] {
        JOINT_POSITIONS.map(|reg| units::joint_ticks_to_radians(self.buffer.get::<i32>(reg)))
    }

    /// 关节角速度（rad/s）[J1, J2, J3, J4]
    pub fn get_joint_velocities(&self) -> [f64; 4] {
        PRESENT_VELOCITY_JOINTS
            .map(|reg| units::velocity_ticks_to_rad_s(self.buffer.get::<i32>(reg)))
    }

    /// 夹爪开度（米）
    pub fn get_gripper_position(&self) -> f64 {
        units::gripper_ticks_to_meters(self.buffer.get::<i32>(GRIPPER_POSITION))
    }

    /// 夹爪速度（rad/s，执行器轴）
    pub fn get_gripper_velocity(&self) -> f64 {
        units::velocity_ticks_to_rad_s(self.buffer.get::<i32>(PRESENT_VELOCITY_GRIPPER))
    }

    /// IMU 物理量快照（每次查询从原始字节重新推导）
    pub fn get_imu(&self) -> Imu {
        let accel = [IMU_ACCEL_X, IMU_ACCEL_Y, IMU_ACCEL_Z].map(|reg| self.buffer.get::<i16>(reg));
        let gyro = [IMU_GYRO_X, IMU_GYRO_Y, IMU_GYRO_Z].map(|reg| self.buffer.get::<i16>(reg));
        let quat = [IMU_QUAT_W, IMU_QUAT_X, IMU_QUAT_Y, IMU_QUAT_Z]
            .map(|reg| self.buffer.get::<i16>(reg));
        Imu::from_raw(accel, gyro, quat)
    }

    /// 电池状态
    pub fn get_battery(&self) -> Battery {
        Battery::from_raw(self.buffer.get::<u16>(BATTERY_VOLTAGE))
    }

    // ========================================================================
    // 设定值写入（写 tick）
    // ========================================================================

    /// 设置四个关节的目标位置（弧度）
    ///
    /// 四个关节在一次协议事务内写完：外部观察不到一部分关节
    /// 已更新而其余仍是旧目标的中间状态。失败时整个事务终止。
    pub fn set_joint_positions(&mut self, radians: [f64; 4]) -> Result<(), DriverError> {
        self.ensure_operational()?;
        let mut data = [0u8; 16];
        for (chunk, rad) in data.chunks_exact_mut(4).zip(radians) {
            chunk.copy_from_slice(&i32_to_bytes_le(units::joint_radians_to_ticks(rad)));
        }
        self.transport
            .write(self.id, JOINT_POSITIONS[0].address, &data)?;
        debug!(?radians, "joint positions commanded");
        Ok(())
    }

    /// 设置夹爪目标开度（米）
    pub fn set_gripper_position(&mut self, meters: f64) -> Result<(), DriverError> {
        self.ensure_operational()?;
        let ticks = units::gripper_meters_to_ticks(meters);
        self.transport
            .write(self.id, GRIPPER_POSITION.address, &i32_to_bytes_le(ticks))?;
        debug!(meters, ticks, "gripper position commanded");
        Ok(())
    }

    /// 设置四个关节的轮廓加速度（原始单位，直通）
    pub fn set_joint_profile_acceleration(
        &mut self,
        acceleration: [i32; 4],
    ) -> Result<(), DriverError> {
        self.set_joint_block(PROFILE_ACCELERATION_JOINTS[0].address, acceleration)
    }

    /// 设置四个关节的轮廓速度（原始单位，直通）
    pub fn set_joint_profile_velocity(&mut self, velocity: [i32; 4]) -> Result<(), DriverError> {
        self.set_joint_block(PROFILE_VELOCITY_JOINTS[0].address, velocity)
    }

    /// 设置夹爪轮廓加速度（原始单位）
    pub fn set_gripper_profile_acceleration(
        &mut self,
        acceleration: i32,
    ) -> Result<(), DriverError> {
        self.set_gripper_variable(PROFILE_ACCELERATION_GRIPPER.address, acceleration)
    }

    /// 设置夹爪轮廓速度（原始单位）
    pub fn set_gripper_profile_velocity(&mut self, velocity: i32) -> Result<(), DriverError> {
        self.set_gripper_variable(PROFILE_VELOCITY_GRIPPER.address, velocity)
    }

    /// 四关节连续寄存器块的单事务写入
    fn set_joint_block(&mut self, address: u16, variables: [i32; 4]) -> Result<(), DriverError> {
        self.ensure_operational()?;
        let mut data = [0u8; 16];
        for (chunk, value) in data.chunks_exact_mut(4).zip(variables) {
            chunk.copy_from_slice(&i32_to_bytes_le(value));
        }
        self.transport.write(self.id, address, &data)?;
        Ok(())
    }

    fn set_gripper_variable(&mut self, address: u16, variable: i32) -> Result<(), DriverError> {
        self.ensure_operational()?;
        self.transport
            .write(self.id, address, &i32_to_bytes_le(variable))?;
        Ok(())
    }

    // ========================================================================
    // 命名位姿
    // ========================================================================

    /// 回到家位姿（臂收拢）
    ///
    /// 首个失败的子写入终止序列；已生效的子设定不回滚，
    /// 调用方失败后应重新发起位姿切换。
    pub fn set_home_pose(&mut self) -> Result<(), DriverError> {
        info!("moving to home pose");
        self.apply_pose(HOME_POSE_JOINTS)
    }

    /// 回到初始位姿（全关节回零）
    pub fn set_init_pose(&mut self) -> Result<(), DriverError> {
        info!("moving to init pose");
        self.apply_pose(INIT_POSE_JOINTS)
    }

    fn apply_pose(&mut self, joints: [f64; 4]) -> Result<(), DriverError> {
        self.set_joint_profile_acceleration([POSE_PROFILE_ACCELERATION; 4])?;
        self.set_joint_profile_velocity([POSE_PROFILE_VELOCITY; 4])?;
        self.set_gripper_profile_acceleration(POSE_PROFILE_ACCELERATION)?;
        self.set_gripper_profile_velocity(POSE_PROFILE_VELOCITY)?;
        self.set_joint_positions(joints)?;
        self.set_gripper_position(POSE_GRIPPER_METERS)?;
        Ok(())
    }

    // ========================================================================
    // 开关量指令
    // ========================================================================

    /// 机械臂关节力矩使能开关
    pub fn joints_torque(&mut self, on: bool) -> Result<(), DriverError> {
        self.write_byte(TORQUE_JOINTS.address, if on { TORQUE_ON } else { TORQUE_OFF })
    }

    /// 轮子力矩使能开关
    pub fn wheels_torque(&mut self, on: bool) -> Result<(), DriverError> {
        self.write_byte(TORQUE_WHEELS.address, if on { TORQUE_ON } else { TORQUE_OFF })
    }

    /// 触发设备侧 IMU 重标定
    pub fn imu_recalibration(&mut self) -> Result<(), DriverError> {
        info!("imu recalibration triggered");
        self.write_byte(IMU_RECALIBRATION.address, IMU_RECALIBRATION_TRIGGER)
    }

    /// 播放蜂鸣器音效
    pub fn play_sound(&mut self, sound: Sound) -> Result<(), DriverError> {
        self.write_byte(SOUND.address, sound.into())
    }

    /// 写入心跳计数
    ///
    /// 计数每次调用严格递增（mod 256 回绕）。这是活性契约：
    /// 外部控制循环必须每个周期调用一次，板卡检测到计数停滞
    /// 即判定主机失联并停止执行器。
    pub fn send_heartbeat(&mut self) -> Result<(), DriverError> {
        self.ensure_operational()?;
        self.heartbeat = self.heartbeat.wrapping_add(1);
        let count = self.heartbeat;
        self.transport.write(self.id, HEARTBEAT.address, &[count])?;
        trace!(count, "heartbeat sent");
        Ok(())
    }

    // ========================================================================
    // 原始单字节访问
    // ========================================================================

    /// 直接向设备寄存器写入一个字节
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), DriverError> {
        self.ensure_operational()?;
        self.transport.write(self.id, address, &[value])?;
        Ok(())
    }

    /// 直接从设备寄存器读取一个字节（绕过本地快照）
    pub fn read_byte(&mut self, address: u16) -> Result<u8, DriverError> {
        self.ensure_operational()?;
        let bytes = self.transport.read(self.id, address, 1)?;
        bytes.first().copied().ok_or_else(|| {
            ProtocolError::InvalidLength {
                expected: 1,
                actual: 0,
            }
            .into()
        })
    }

    /// 本地快照句柄（集成测试与诊断用）
    pub fn buffer(&self) -> &RegisterBuffer {
        &self.buffer
    }

    /// 底层传输后端的可变借用（高级用法与测试）
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// 归还传输后端所有权，消费控制器
    pub fn into_transport(self) -> T {
        self.transport
    }
}
