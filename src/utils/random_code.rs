use rand::Rng;
use rand::distr::Alphanumeric;

/// 找回密码令牌长度
pub const RESET_TOKEN_LENGTH: usize = 48;

/// 生成字母数字随机串
pub fn generate_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 生成随机密码，保证包含大小写字母与数字
pub fn generate_password(length: usize) -> String {
    const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
    const DIGITS: &[u8] = b"23456789";
    const SYMBOLS: &[u8] = b"!@#$%";

    let length = length.max(8);
    let mut rng = rand::rng();
    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();

    let mut chars: Vec<char> = vec![
        UPPER[rng.random_range(0..UPPER.len())] as char,
        LOWER[rng.random_range(0..LOWER.len())] as char,
        DIGITS[rng.random_range(0..DIGITS.len())] as char,
    ];
    while chars.len() < length {
        chars.push(all[rng.random_range(0..all.len())] as char);
    }

    // 打乱必选字符的位置
    for i in (1..chars.len()).rev() {
        let j = rng.random_range(0..=i);
        chars.swap(i, j);
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_token_shape() {
        let token = generate_token(RESET_TOKEN_LENGTH);
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token(RESET_TOKEN_LENGTH));
    }

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let password = generate_password(16);
            assert_eq!(password.len(), 16);
            assert!(validate_password(&password).is_ok(), "{password}");
        }
    }
}
