//! IMU / 电池原始寄存器解码
//!
//! 物理量结构体按需从原始字节重新计算，从不持久化。

/// 加速度计灵敏度：±4 g 量程，8192 LSB/g
pub const ACCEL_LSB_PER_G: f64 = 8192.0;

/// 标准重力加速度（m/s²）
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// 陀螺仪灵敏度：±2000 dps 量程，16.4 LSB/(deg/s)
pub const GYRO_LSB_PER_DPS: f64 = 16.4;

/// 姿态四元数定点格式：Q14（÷16384 归一化到单位范围）
pub const QUAT_SCALE: f64 = 1.0 / 16384.0;

/// 电池电压寄存器单位（厘伏 → 伏）
pub const VOLTS_PER_LSB: f64 = 0.01;

/// 3S 锂电池电量线性映射区间（伏）
pub const BATTERY_VOLTAGE_MIN: f64 = 10.5;
pub const BATTERY_VOLTAGE_MAX: f64 = 12.6;

/// IMU 物理量快照
///
/// 由 [`Imu::from_raw`] 从原始寄存器三元组/四元组推导。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Imu {
    /// 线加速度（m/s²）[x, y, z]
    pub linear_accel: [f64; 3],
    /// 角速度（rad/s）[x, y, z]
    pub angular_vel: [f64; 3],
    /// 姿态四元数 [w, x, y, z]，Q14 定点缩放到单位范围
    pub orientation: [f64; 4],
}

impl Imu {
    /// 从原始寄存器值解码
    ///
    /// - `accel`: 带符号 16 位三元组，按加速度计灵敏度缩放
    /// - `gyro`: 带符号 16 位三元组，按陀螺仪灵敏度缩放后转弧度
    /// - `quat`: Q14 定点 [w, x, y, z]
    pub fn from_raw(accel: [i16; 3], gyro: [i16; 3], quat: [i16; 4]) -> Self {
        let accel_scale = STANDARD_GRAVITY / ACCEL_LSB_PER_G;
        let gyro_scale = (1.0 / GYRO_LSB_PER_DPS).to_radians();
        Self {
            linear_accel: accel.map(|v| v as f64 * accel_scale),
            angular_vel: gyro.map(|v| v as f64 * gyro_scale),
            orientation: quat.map(|v| v as f64 * QUAT_SCALE),
        }
    }
}

/// 电池状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battery {
    /// 电压（伏）
    pub voltage: f64,
    /// 电量百分比 [0, 100]，按电压线性估算
    pub percentage: f64,
}

impl Battery {
    /// 从电压寄存器原始值（厘伏）解码
    pub fn from_raw(centivolts: u16) -> Self {
        let voltage = centivolts as f64 * VOLTS_PER_LSB;
        let fraction =
            (voltage - BATTERY_VOLTAGE_MIN) / (BATTERY_VOLTAGE_MAX - BATTERY_VOLTAGE_MIN);
        Self {
            voltage,
            percentage: (fraction * 100.0).clamp(0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imu_zero_raw_is_zero() {
        let imu = Imu::from_raw([0; 3], [0; 3], [0; 4]);
        assert_eq!(imu.linear_accel, [0.0; 3]);
        assert_eq!(imu.angular_vel, [0.0; 3]);
        assert_eq!(imu.orientation, [0.0; 4]);
    }

    #[test]
    fn test_imu_accel_one_g() {
        // 8192 LSB = 1 g
        let imu = Imu::from_raw([0, 0, 8192], [0; 3], [16384, 0, 0, 0]);
        assert!((imu.linear_accel[2] - STANDARD_GRAVITY).abs() < 1e-9);
    }

    #[test]
    fn test_imu_gyro_scale() {
        // 16.4 LSB = 1 deg/s
        let imu = Imu::from_raw([0; 3], [164, 0, 0], [16384, 0, 0, 0]);
        assert!((imu.angular_vel[0] - 10.0_f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_imu_identity_quaternion() {
        // Q14 的 16384 = 1.0
        let imu = Imu::from_raw([0; 3], [0; 3], [16384, 0, 0, 0]);
        assert_eq!(imu.orientation, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_imu_negative_components() {
        let imu = Imu::from_raw([-8192, 0, 0], [-164, 0, 0], [0, -16384, 0, 0]);
        assert!((imu.linear_accel[0] + STANDARD_GRAVITY).abs() < 1e-9);
        assert!(imu.angular_vel[0] < 0.0);
        assert_eq!(imu.orientation[1], -1.0);
    }

    #[test]
    fn test_battery_voltage_scale() {
        let battery = Battery::from_raw(1180);
        assert!((battery.voltage - 11.8).abs() < 1e-9);
    }

    #[test]
    fn test_battery_percentage_bounds() {
        // 低于区间下限 → 0%
        assert_eq!(Battery::from_raw(1000).percentage, 0.0);
        // 高于区间上限 → 100%
        assert_eq!(Battery::from_raw(1300).percentage, 100.0);
    }

    #[test]
    fn test_battery_percentage_midpoint() {
        // (10.5 + 12.6) / 2 = 11.55 V → 50%
        let battery = Battery::from_raw(1155);
        assert!((battery.percentage - 50.0).abs() < 1e-6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_imu_serde_roundtrip() {
        let imu = Imu::from_raw([100, -200, 8192], [164, 0, -164], [16384, 0, 0, 0]);
        let json = serde_json::to_string(&imu).unwrap();
        let back: Imu = serde_json::from_str(&json).unwrap();
        assert_eq!(imu, back);
    }
}
