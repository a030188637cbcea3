use chrono::{DateTime, FixedOffset, Locale, Utc};

use crate::TokenIndexView;

/// The token index reports prices in copper
pub const COPPER_PER_GOLD: u64 = 10_000;

/// Venezuela has stayed on UTC-04:00 without daylight saving since 2016
const CARACAS_UTC_OFFSET_SECS: i32 = 4 * 60 * 60;

/// One normalized observation of the token price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSnapshot {
    /// Whole gold, rounded down
    pub price: u64,
    pub observed_at: String,
}

impl PriceSnapshot {
    pub fn from_copper(copper: u64, updated: DateTime<Utc>) -> Self {
        Self {
            price: copper / COPPER_PER_GOLD,
            observed_at: format_observed_at(updated),
        }
    }
}

impl From<TokenIndexView> for PriceSnapshot {
    fn from(index: TokenIndexView) -> Self {
        Self::from_copper(index.price, index.last_updated_timestamp)
    }
}

/// Long date and short time in Spanish, Caracas local time. `17 de octubre de 2026, 3:45 p. m.`
pub fn format_observed_at(timestamp: DateTime<Utc>) -> String {
    let caracas = FixedOffset::west_opt(CARACAS_UTC_OFFSET_SECS).expect("UTC-04:00 is in range");
    timestamp
        .with_timezone(&caracas)
        .format_localized("%-d de %B de %Y, %-I:%M %p", Locale::es_VE)
        .to_string()
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::{format_observed_at, PriceSnapshot};
    use crate::TokenIndexView;

    #[test]
    fn test_copper_to_gold() {
        let updated = Utc.with_ymd_and_hms(2026, 10, 17, 19, 45, 0).unwrap();
        assert_eq!(PriceSnapshot::from_copper(1_234_567, updated).price, 123);
        assert_eq!(PriceSnapshot::from_copper(9_999, updated).price, 0);
        assert_eq!(PriceSnapshot::from_copper(10_000, updated).price, 1);
        assert_eq!(PriceSnapshot::from_copper(2_712_340_000, updated).price, 271_234);
    }

    #[test]
    fn test_observed_at_is_caracas_time() {
        let updated = Utc.with_ymd_and_hms(2026, 10, 17, 19, 45, 0).unwrap();
        let formatted = format_observed_at(updated);
        assert!(
            formatted.starts_with("17 de octubre de 2026, 3:45"),
            "{formatted}"
        );
    }

    #[test]
    fn test_observed_at_crosses_midnight() {
        // 02:00 UTC is still the previous evening in Caracas
        let updated = Utc.with_ymd_and_hms(2026, 1, 1, 2, 0, 0).unwrap();
        let formatted = format_observed_at(updated);
        assert!(
            formatted.starts_with("31 de diciembre de 2025, 10:00"),
            "{formatted}"
        );
    }

    #[test]
    fn test_from_index() {
        let index: TokenIndexView = serde_json::from_str(
            r#"{"_links":{"self":{"href":"https://us.api.blizzard.com/data/wow/token/?namespace=dynamic-us"}},"last_updated_timestamp":1792266300000,"price":2712340000}"#,
        )
        .unwrap();
        let snapshot = PriceSnapshot::from(index);
        assert_eq!(snapshot.price, 271_234);
        assert_eq!(
            snapshot.observed_at,
            format_observed_at(Utc.timestamp_millis_opt(1_792_266_300_000).unwrap())
        );
    }
}
