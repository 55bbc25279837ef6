use std::fmt::Display;

use pricebot_common::Isk;

use crate::tracker::TrackingId;

/// A message for a tracking subscriber. The `Display` form is plain text; hosts may render the fields however they
/// like instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingNotice {
    PriceChanged { entry_id: TrackingId, item_name: String, region_name: String, previous: Isk, current: Isk, delta: Isk },
    Expired { entry_id: TrackingId, item_name: String, region_name: String, last_price: Isk },
}

impl TrackingNotice {
    pub fn entry_id(&self) -> TrackingId {
        match self {
            TrackingNotice::PriceChanged { entry_id, .. } | TrackingNotice::Expired { entry_id, .. } => *entry_id,
        }
    }
}

impl Display for TrackingNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingNotice::PriceChanged { entry_id, item_name, region_name, previous, current, delta } => {
                let direction = if current > previous { "up" } else { "down" };
                write!(
                    f,
                    "[#{entry_id}] {item_name} in {region_name} went {direction} by {delta}: {previous} -> {current}"
                )
            },
            TrackingNotice::Expired { entry_id, item_name, region_name, last_price } => {
                write!(f, "[#{entry_id}] Stopped tracking {item_name} in {region_name}. Last price: {last_price}")
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_text() {
        let notice = TrackingNotice::PriceChanged {
            entry_id: 3,
            item_name: "Tritanium".into(),
            region_name: "The Forge".into(),
            previous: Isk::from_cents(500),
            current: Isk::from_cents(475),
            delta: Isk::from_cents(25),
        };
        assert_eq!(notice.to_string(), "[#3] Tritanium in The Forge went down by 0.25 ISK: 5.00 ISK -> 4.75 ISK");
        assert_eq!(notice.entry_id(), 3);
        let notice = TrackingNotice::Expired {
            entry_id: 4,
            item_name: "PLEX".into(),
            region_name: "Domain".into(),
            last_price: Isk::from(4_500_000),
        };
        assert_eq!(notice.to_string(), "[#4] Stopped tracking PLEX in Domain. Last price: 4,500,000.00 ISK");
    }
}
