use bourse_core::feed::entity::NumberFormat;
use bourse_core::feed::error::FeedError;

/// # Summary
/// 把价格或百分比文本归一化为浮点数。
///
/// # Logic
/// 1. 去除两侧空白与末尾的 `%`。
/// 2. 括号包裹的数值视为负数，例如 `(1,23)` 为 `-1.23`。
/// 3. 去除前导 `+`。
/// 4. `Continental` 规则下删除千分位点号与空白，并把小数逗号替换为点号；
///    `Plain` 规则下直接解析。
/// 5. 解析失败、为空或非有限值时返回错误。
///
/// # Arguments
/// * `token`: 原始文本。
/// * `format`: 由配置选定的区域规则。
///
/// # Returns
/// 成功返回有限浮点数，失败返回 `FeedError::NumericNormalization`。
pub fn normalize(token: &str, format: NumberFormat) -> Result<f64, FeedError> {
    let failure = || FeedError::NumericNormalization(token.to_string());

    let body = strip_percent(token.trim());
    let (negated, body) = match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => (true, strip_percent(inner.trim())),
        None => (false, body),
    };
    let body = body.strip_prefix('+').unwrap_or(body);

    let cleaned = match format {
        NumberFormat::Plain => body.to_string(),
        NumberFormat::Continental => body
            .chars()
            .filter(|c| *c != '.' && !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
    };

    let value: f64 = cleaned.parse().map_err(|_| failure())?;
    if !value.is_finite() {
        return Err(failure());
    }
    Ok(if negated { -value } else { value })
}

fn strip_percent(s: &str) -> &str {
    s.strip_suffix('%').map(str::trim_end).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continental_thousands_and_decimal() {
        assert_eq!(normalize("7.512,30", NumberFormat::Continental), Ok(7512.30));
        assert_eq!(normalize("7 512,30", NumberFormat::Continental), Ok(7512.30));
        assert_eq!(normalize("7\u{202f}512,30", NumberFormat::Continental), Ok(7512.30));
        assert_eq!(normalize("100,5", NumberFormat::Continental), Ok(100.5));
    }

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(normalize("7512.30", NumberFormat::Plain), Ok(7512.30));
        assert_eq!(normalize(" 42 ", NumberFormat::Plain), Ok(42.0));
        assert!(normalize("7.512,30", NumberFormat::Plain).is_err());
    }

    #[test]
    fn test_signs_and_percent() {
        assert_eq!(normalize("+0,45%", NumberFormat::Continental), Ok(0.45));
        assert_eq!(normalize("-1,20 %", NumberFormat::Continental), Ok(-1.2));
        assert_eq!(normalize("(1,23)", NumberFormat::Continental), Ok(-1.23));
        assert_eq!(normalize("(0,45%)", NumberFormat::Continental), Ok(-0.45));
        assert_eq!(normalize("(2.5)%", NumberFormat::Plain), Ok(-2.5));
    }

    #[test]
    fn test_failures_are_clean() {
        for token in ["", "   ", "%", "N/A", "abc", "NaN", "inf", "()"] {
            assert!(
                matches!(
                    normalize(token, NumberFormat::Continental),
                    Err(FeedError::NumericNormalization(_))
                ),
                "token {:?} should fail",
                token
            );
        }
        assert!(normalize("infinity", NumberFormat::Plain).is_err());
    }

    #[test]
    fn test_idempotent_on_rendered_values() {
        for format in [NumberFormat::Plain, NumberFormat::Continental] {
            for value in [0.0, 100.5, 7512.3, -0.45, 0.001, 1234567.89] {
                let once = normalize(&format.render(value), format).expect("rendered value");
                let twice = normalize(&format.render(once), format).expect("rendered value");
                assert_eq!(once, value);
                assert_eq!(twice, once);
            }
        }
    }
}
