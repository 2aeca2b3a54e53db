pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Round to one decimal place, the precision history entries are stored with
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Human friendly duration used by the stats dashboard ("42s", "3m 5s", "1h 12m")
pub fn format_duration(secs: f64) -> String {
    let secs = secs.max(0.0);
    if secs < 60.0 {
        format!("{secs:.0}s")
    } else if secs < 3600.0 {
        let whole = secs as u64;
        format!("{}m {}s", whole / 60, whole % 60)
    } else {
        let whole = secs as u64;
        format!("{}h {}m", whole / 3600, (whole % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[15., 7., 55., 12., 4.]), Some(18.6));
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(61.234), 61.2);
        assert_eq!(round_tenth(90.909_090), 90.9);
        assert_eq!(round_tenth(99.96), 100.0);
        assert_eq!(round_tenth(0.0), 0.0);
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(42.4), "42s");
    }

    #[test]
    fn test_format_duration_minutes_and_hours() {
        assert_eq!(format_duration(185.0), "3m 5s");
        assert_eq!(format_duration(4320.0), "1h 12m");
    }

    #[test]
    fn test_format_duration_negative_clamps() {
        assert_eq!(format_duration(-3.0), "0s");
    }
}
