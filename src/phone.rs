//! 肯尼亚手机号归一化
//!
//! 支付与聊天模拟器都以 `254XXXXXXXXX` 形式提交手机号；
//! 用户输入可能是 `07...`、`+254...`、裸九位订户号或带空格分隔的任意写法。

/// 归一化为 254 开头的纯数字 MSISDN
///
/// 规则：先去掉所有非数字字符；`0` 开头去零补 `254`；
/// 已是 `254` 开头原样保留；裸九位号补 `254` 前缀；
/// 其余形态原样返回（由后端最终校验）。
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = cleaned.strip_prefix('0') {
        return format!("254{rest}");
    }
    if cleaned.starts_with("254") {
        return cleaned;
    }
    if cleaned.len() == 9 {
        return format!("254{cleaned}");
    }
    cleaned
}

/// 归一化结果是否为合法的肯尼亚 MSISDN（254 + 9 位订户号）
pub fn is_valid_kenyan(msisdn: &str) -> bool {
    msisdn.len() == 12 && msisdn.starts_with("254") && msisdn.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_zero_prefix_becomes_254() {
        assert_eq!(normalize("0712345678"), "254712345678");
    }

    #[test]
    fn international_plus_form_is_cleaned() {
        assert_eq!(normalize("+254 712 345 678"), "254712345678");
    }

    #[test]
    fn existing_254_prefix_unchanged() {
        assert_eq!(normalize("254712345678"), "254712345678");
    }

    #[test]
    fn bare_subscriber_number_gets_prefix() {
        assert_eq!(normalize("712345678"), "254712345678");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalize("0712-345-678"), "254712345678");
    }

    #[test]
    fn validity_check() {
        assert!(is_valid_kenyan("254712345678"));
        assert!(!is_valid_kenyan("0712345678"));
        assert!(!is_valid_kenyan("25471234567"));
        assert!(!is_valid_kenyan("254712345678x"));
    }
}
