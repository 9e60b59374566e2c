use super::model::{Dataset, Record};

/// Conversion rate columns that can be put on a scatter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateField {
    Click,
    CartAdd,
    Purchase,
}

impl RateField {
    pub fn title(self) -> &'static str {
        match self {
            RateField::Click => "Click Rate",
            RateField::CartAdd => "Cart Add Rate",
            RateField::Purchase => "Purchase Rate",
        }
    }

    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            RateField::Click => record.click_rate,
            RateField::CartAdd => record.cart_add_rate,
            RateField::Purchase => record.purchase_rate,
        }
    }
}

/// The two relationships shown next to the trend chart, as (x, y).
pub const RATE_VIEWS: [(RateField, RateField); 2] = [
    (RateField::Purchase, RateField::CartAdd),
    (RateField::Click, RateField::CartAdd),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub search_query: String,
    pub x: f64,
    pub y: f64,
}

/// Pair two rates per record. Records missing either rate are skipped.
pub fn rate_points(dataset: &Dataset, x: RateField, y: RateField) -> Vec<RatePoint> {
    dataset
        .records()
        .iter()
        .filter_map(|rec| {
            Some(RatePoint {
                search_query: rec.search_query.clone(),
                x: x.value(rec)?,
                y: y.value(rec)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn missing_rates_are_omitted() {
        let mut no_purchase = record("W1", 1, "a", [1; 4]);
        no_purchase.purchase_rate = None;
        let mut complete = record("W1", 1, "b", [1; 4]);
        complete.purchase_rate = Some(12.5);
        complete.cart_add_rate = Some(40.0);
        let ds = Dataset::from_records(vec![no_purchase, complete]);

        let points = rate_points(&ds, RateField::Purchase, RateField::CartAdd);
        assert_eq!(
            points,
            [RatePoint {
                search_query: "b".into(),
                x: 12.5,
                y: 40.0
            }]
        );
        assert_eq!(rate_points(&ds, RateField::Click, RateField::CartAdd).len(), 2);
    }
}
