//! 物理单位与原始刻度的转换
//!
//! 纯函数，无 I/O、无共享状态，完全确定。
//! 符号约定：位置与速度转换共用同一方向约定，
//! 往返误差不超过一个刻度的量化误差（属性测试见 tests/）。

use std::f64::consts::TAU;

/// 每圈编码器刻度数（XM430 系列执行器）
pub const TICKS_PER_REVOLUTION: f64 = 4096.0;

/// 位置中心刻度（0 rad 对应的刻度）
pub const CENTER_TICKS: i32 = 2048;

/// 每刻度弧度
pub const RAD_PER_TICK: f64 = TAU / TICKS_PER_REVOLUTION;

/// 速度单位：0.229 rpm/刻度
pub const VELOCITY_RAD_PER_TICK: f64 = 0.229 * TAU / 60.0;

/// 驱动轮半径（米）
pub const WHEEL_RADIUS_M: f64 = 0.033;

/// 夹爪直线行程：每刻度米数（连杆比 0.015 m/rad）
pub const GRIPPER_METERS_PER_TICK: f64 = RAD_PER_TICK * 0.015;

// ============================================================================
// 关节位置
// ============================================================================

/// 关节位置：刻度 → 弧度
pub fn joint_ticks_to_radians(ticks: i32) -> f64 {
    (ticks - CENTER_TICKS) as f64 * RAD_PER_TICK
}

/// 关节位置：弧度 → 刻度（四舍五入到最近刻度）
pub fn joint_radians_to_ticks(radians: f64) -> i32 {
    (radians / RAD_PER_TICK).round() as i32 + CENTER_TICKS
}

// ============================================================================
// 轮子
// ============================================================================

/// 轮子累计位置：刻度 → 弧度
///
/// 轮子位置是多圈累计值，没有中心偏移。
pub fn wheel_ticks_to_radians(ticks: i32) -> f64 {
    ticks as f64 * RAD_PER_TICK
}

/// 角速度：刻度 → rad/s（关节与轮子共用）
pub fn velocity_ticks_to_rad_s(ticks: i32) -> f64 {
    ticks as f64 * VELOCITY_RAD_PER_TICK
}

/// 角速度：rad/s → 刻度
pub fn rad_s_to_velocity_ticks(rad_s: f64) -> i32 {
    (rad_s / VELOCITY_RAD_PER_TICK).round() as i32
}

/// 轮缘线速度：刻度 → m/s
pub fn velocity_ticks_to_m_s(ticks: i32) -> f64 {
    velocity_ticks_to_rad_s(ticks) * WHEEL_RADIUS_M
}

/// 轮缘线速度：m/s → 刻度
pub fn m_s_to_velocity_ticks(m_s: f64) -> i32 {
    rad_s_to_velocity_ticks(m_s / WHEEL_RADIUS_M)
}

// ============================================================================
// 夹爪
// ============================================================================

/// 夹爪位置：刻度 → 米
pub fn gripper_ticks_to_meters(ticks: i32) -> f64 {
    (ticks - CENTER_TICKS) as f64 * GRIPPER_METERS_PER_TICK
}

/// 夹爪位置：米 → 刻度（四舍五入到最近刻度）
pub fn gripper_meters_to_ticks(meters: f64) -> i32 {
    (meters / GRIPPER_METERS_PER_TICK).round() as i32 + CENTER_TICKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_center_is_zero_radians() {
        assert_eq!(joint_ticks_to_radians(CENTER_TICKS), 0.0);
        assert_eq!(joint_radians_to_ticks(0.0), CENTER_TICKS);
    }

    #[test]
    fn test_joint_quarter_turn() {
        // 1024 刻度 = 四分之一圈 = π/2
        let rad = joint_ticks_to_radians(CENTER_TICKS + 1024);
        assert!((rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    /// 已知值：1.57 rad 在 2π/4096 刻度间距下落到 3071 刻度
    #[test]
    fn test_joint_radians_to_ticks_known_value() {
        assert_eq!(joint_radians_to_ticks(1.57), 3071);
    }

    #[test]
    fn test_joint_sign_convention_matches_velocity() {
        // 位置和速度转换同号：正向运动两者都为正
        assert!(joint_ticks_to_radians(CENTER_TICKS + 100) > 0.0);
        assert!(velocity_ticks_to_rad_s(100) > 0.0);
        assert!(joint_ticks_to_radians(CENTER_TICKS - 100) < 0.0);
        assert!(velocity_ticks_to_rad_s(-100) < 0.0);
    }

    #[test]
    fn test_wheel_position_no_center_offset() {
        assert_eq!(wheel_ticks_to_radians(0), 0.0);
        let full_turn = wheel_ticks_to_radians(4096);
        assert!((full_turn - std::f64::consts::TAU).abs() < 1e-12);
    }

    #[test]
    fn test_wheel_linear_velocity() {
        // 1 rad/s 轮缘速度 = 轮半径 m/s
        let ticks = rad_s_to_velocity_ticks(1.0);
        let m_s = velocity_ticks_to_m_s(ticks);
        assert!((m_s - WHEEL_RADIUS_M).abs() < VELOCITY_RAD_PER_TICK * WHEEL_RADIUS_M);
    }

    #[test]
    fn test_gripper_center_is_zero_meters() {
        assert_eq!(gripper_ticks_to_meters(CENTER_TICKS), 0.0);
        assert_eq!(gripper_meters_to_ticks(0.0), CENTER_TICKS);
    }

    #[test]
    fn test_gripper_roundtrip_within_one_tick() {
        let target = 0.012; // 12mm 开口
        let ticks = gripper_meters_to_ticks(target);
        let back = gripper_ticks_to_meters(ticks);
        assert!((back - target).abs() <= GRIPPER_METERS_PER_TICK / 2.0);
    }
}
