pub mod encoding;
pub mod url_validator;

pub use encoding::decode_base64_lenient;
pub use url_validator::{is_valid_url, validate_url};

/// Base62 字符表
const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of every generated short code
pub const SHORT_CODE_LENGTH: usize = 6;

/// 生成指定长度的随机 Base62 字符串（不保证唯一，调用方负责探测冲突）
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| BASE62_CHARS[rand::random_range(0..BASE62_CHARS.len())] as char)
        .take(length)
        .collect()
}

/// Whether `code` is exactly six ASCII alphanumerics, i.e. `^[0-9A-Za-z]{6}$`
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
