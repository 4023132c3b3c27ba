pub mod ip;
pub mod time_format;
pub mod validation;

pub use time_format::format_create_time;

/// 随机 slug 字母表：[0-9a-zA-Z]
pub const RANDOM_CODE_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 生成指定长度的随机短码
///
/// 每个字符独立均匀抽取，不是密码学安全的。
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = RANDOM_CODE_ALPHABET;

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}
