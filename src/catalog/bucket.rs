use serde::{Deserialize, Serialize};
use strum::Display;

// PriceBucket — discrete price band used as a preference facet.
// Bands are inclusive-low / exclusive-high; no rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PriceBucket {
    #[strum(to_string = "<$25")]
    #[serde(rename = "<$25")]
    Under25,
    #[strum(to_string = "$25–49")]
    #[serde(rename = "$25–49")]
    From25,
    #[strum(to_string = "$50–99")]
    #[serde(rename = "$50–99")]
    From50,
    #[strum(to_string = "$100–199")]
    #[serde(rename = "$100–199")]
    From100,
    #[strum(to_string = "$200+")]
    #[serde(rename = "$200+")]
    Over200,
    #[strum(to_string = "unknown")]
    #[serde(rename = "unknown")]
    Unknown,
}

/// Maps a raw price (numeric-like string, optionally `$`-prefixed) into its
/// band. Unparseable input, including absence, yields [`PriceBucket::Unknown`].
pub fn bucketize(raw: Option<&str>) -> PriceBucket {
    let Some(raw) = raw else {
        return PriceBucket::Unknown;
    };
    let stripped = raw.trim();
    let stripped = stripped.strip_prefix('$').unwrap_or(stripped);
    let Ok(n) = stripped.trim().parse::<f64>() else {
        return PriceBucket::Unknown;
    };
    if !n.is_finite() {
        return PriceBucket::Unknown;
    }
    if n < 25.0 {
        PriceBucket::Under25
    } else if n < 50.0 {
        PriceBucket::From25
    } else if n < 100.0 {
        PriceBucket::From50
    } else if n < 200.0 {
        PriceBucket::From100
    } else {
        PriceBucket::Over200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_low_exclusive_high() {
        assert_eq!(bucketize(Some("24.99")), PriceBucket::Under25);
        assert_eq!(bucketize(Some("25")), PriceBucket::From25);
        assert_eq!(bucketize(Some("49.99")), PriceBucket::From25);
        assert_eq!(bucketize(Some("50")), PriceBucket::From50);
        assert_eq!(bucketize(Some("99.99")), PriceBucket::From50);
        assert_eq!(bucketize(Some("100")), PriceBucket::From100);
        assert_eq!(bucketize(Some("199.99")), PriceBucket::From100);
        assert_eq!(bucketize(Some("200")), PriceBucket::Over200);
    }

    #[test]
    fn currency_prefix_is_stripped_once() {
        assert_eq!(bucketize(Some("$12.50")), PriceBucket::Under25);
        assert_eq!(bucketize(Some("$199.99")), PriceBucket::From100);
        // a second marker makes it unparseable
        assert_eq!(bucketize(Some("$$30")), PriceBucket::Unknown);
    }

    #[test]
    fn unparseable_is_unknown() {
        assert_eq!(bucketize(Some("abc")), PriceBucket::Unknown);
        assert_eq!(bucketize(Some("")), PriceBucket::Unknown);
        assert_eq!(bucketize(None), PriceBucket::Unknown);
    }

    #[test]
    fn labels_match_display() {
        assert_eq!(PriceBucket::Under25.to_string(), "<$25");
        assert_eq!(PriceBucket::From25.to_string(), "$25–49");
        assert_eq!(PriceBucket::From50.to_string(), "$50–99");
        assert_eq!(PriceBucket::From100.to_string(), "$100–199");
        assert_eq!(PriceBucket::Over200.to_string(), "$200+");
        assert_eq!(PriceBucket::Unknown.to_string(), "unknown");
    }
}
