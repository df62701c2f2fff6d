//! 最小单位到显示单位的定点换算
//!
//! 不经过浮点数，避免精度丢失

use rust_decimal::Decimal;

/// 覆盖的网络统一使用 18 位精度
pub const NATIVE_DECIMALS: u32 = 18;

/// 把最小单位的整数余额格式化为十进制字符串，去掉多余的尾零
///
/// `format_units(1_500_000_000_000_000_000, 18) == "1.5"`
pub fn format_units(raw: u128, decimals: u32) -> String {
    // rust_decimal 的尾数只有 96 位，放不下时退回整数拆分
    if let Ok(signed) = i128::try_from(raw) {
        if let Ok(d) = Decimal::try_from_i128_with_scale(signed, decimals) {
            return d.normalize().to_string();
        }
    }
    split_units(raw, decimals)
}

fn split_units(raw: u128, decimals: u32) -> String {
    let divisor = 10u128.pow(decimals);
    let whole = raw / divisor;
    let frac = raw % divisor;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
