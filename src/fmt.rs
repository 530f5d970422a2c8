/// Format a float as a whole-shekel amount with thousands separators: ₪1,234
pub fn shekel(val: f64) -> String {
    if !val.is_finite() {
        return "₪0".to_string();
    }
    let rounded = val.abs().round() as i64;
    let digits = rounded.to_string();

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if val < 0.0 && rounded != 0 {
        format!("-₪{with_commas}")
    } else {
        format!("₪{with_commas}")
    }
}

/// Format a percentage with an explicit sign: +12.5%, -3.4%
pub fn signed_pct(val: f64) -> String {
    if !val.is_finite() {
        return "+0.0%".to_string();
    }
    if val >= 0.0 {
        format!("+{val:.1}%")
    } else {
        format!("{val:.1}%")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shekel_formatting() {
        assert_eq!(shekel(1234.0), "₪1,234");
        assert_eq!(shekel(-500.0), "-₪500");
        assert_eq!(shekel(0.0), "₪0");
        assert_eq!(shekel(1000000.49), "₪1,000,000");
        assert_eq!(shekel(42.6), "₪43");
        assert_eq!(shekel(f64::NAN), "₪0");
        assert_eq!(shekel(-0.2), "₪0");
    }

    #[test]
    fn test_signed_pct() {
        assert_eq!(signed_pct(12.5), "+12.5%");
        assert_eq!(signed_pct(-3.44), "-3.4%");
        assert_eq!(signed_pct(0.0), "+0.0%");
        assert_eq!(signed_pct(f64::INFINITY), "+0.0%");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
