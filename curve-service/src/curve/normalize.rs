use serde::Serialize;

use super::{CurveSample, Tier};

/// Unit a tier stores its `ai` readings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Watt,
    Kilowatt,
}

impl Unit {
    /// Factor that brings a reading in this unit to the published unit.
    pub fn scale(self) -> f64 {
        match self {
            Unit::Watt => 1.0,
            Unit::Kilowatt => 1000.0,
        }
    }

    pub fn of_tier(tier: Tier) -> Self {
        match tier {
            Tier::Primary => Unit::Watt,
            Tier::SecondaryGeneral | Tier::SecondaryPeak => Unit::Kilowatt,
        }
    }
}

/// A published curve point, serialized as `{"date": <epoch ms>, "value": <n>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    #[serde(rename = "date")]
    pub epoch_millis: i64,
    pub value: f64,
}

pub fn normalize(sample: &CurveSample, unit: Unit) -> NormalizedPoint {
    NormalizedPoint {
        epoch_millis: (sample.ts.unix_timestamp_nanos() / 1_000_000) as i64,
        value: sample.value * unit.scale(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn watt_samples_pass_through() {
        let sample = CurveSample::new(datetime!(2023-01-15 10:00:00 UTC), 42.0);
        let point = normalize(&sample, Unit::Watt);
        assert_eq!(point.epoch_millis, 1_673_776_800_000);
        assert_eq!(point.value, 42.0);
    }

    #[test]
    fn kilowatt_samples_are_scaled_by_one_thousand() {
        let sample = CurveSample::new(datetime!(2023-01-15 10:00:00 UTC), 0.25);
        assert_eq!(normalize(&sample, Unit::Kilowatt).value, 250.0);
    }

    #[test]
    fn epoch_millis_follow_the_instant_not_the_offset() {
        let utc = CurveSample::new(datetime!(2023-06-01 08:00:00 UTC), 1.0);
        let local = CurveSample::new(datetime!(2023-06-01 10:00:00 +02:00), 1.0);
        assert_eq!(
            normalize(&utc, Unit::Watt).epoch_millis,
            normalize(&local, Unit::Watt).epoch_millis
        );
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let sample = CurveSample::new(datetime!(2023-01-15 10:00:00.123 UTC), 7.5);
        assert_eq!(
            normalize(&sample, Unit::Kilowatt),
            normalize(&sample, Unit::Kilowatt)
        );
        assert_eq!(normalize(&sample, Unit::Kilowatt).epoch_millis % 1000, 123);
    }

    #[test]
    fn tier_units() {
        assert_eq!(Unit::of_tier(Tier::Primary), Unit::Watt);
        assert_eq!(Unit::of_tier(Tier::SecondaryGeneral), Unit::Kilowatt);
        assert_eq!(Unit::of_tier(Tier::SecondaryPeak), Unit::Kilowatt);
    }

    #[test]
    fn serializes_with_date_key() {
        let point = NormalizedPoint {
            epoch_millis: 1_673_776_800_000,
            value: 7000.0,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": 1_673_776_800_000_i64, "value": 7000.0})
        );
    }
}
