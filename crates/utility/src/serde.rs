/// Serializes an `f64` rounded to two decimal places.
///
/// Usage: `#[serde(serialize_with = "utility::serde::round_2")]`
pub fn round_2<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(round_to(*value, 2))
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::round_to;

    #[derive(Serialize)]
    struct Distance {
        #[serde(serialize_with = "super::round_2")]
        km: f64,
    }

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(round_to(2.346, 2), 2.35);
        assert_eq!(round_to(2.344, 2), 2.34);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn serializer_rounds_output() {
        let json = serde_json::to_string(&Distance { km: 12.3456 }).unwrap();
        assert_eq!(json, r#"{"km":12.35}"#);
    }
}
