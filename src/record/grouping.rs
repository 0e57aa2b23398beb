//! Regrouping refined readings by an attribute

use crate::record::ChemicalReading;
use std::collections::BTreeMap;

/// Attribute readings can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAttribute {
    Chemical,
    Monitor,
    Year,
    Month,
    Weekday,
}

impl GroupAttribute {
    /// Value of this attribute for a reading
    pub fn value_of(&self, reading: &ChemicalReading) -> String {
        match self {
            Self::Chemical => reading.chemical.clone(),
            Self::Monitor => reading.monitor_id.to_string(),
            Self::Year => reading.year().to_string(),
            Self::Month => reading.month_name().to_string(),
            Self::Weekday => reading.weekday_name().to_string(),
        }
    }
}

impl std::fmt::Display for GroupAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chemical => write!(f, "chemical"),
            Self::Monitor => write!(f, "monitor"),
            Self::Year => write!(f, "year"),
            Self::Month => write!(f, "month"),
            Self::Weekday => write!(f, "weekday"),
        }
    }
}

impl std::str::FromStr for GroupAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chemical" => Ok(Self::Chemical),
            "monitor" | "monitor_id" | "monitor-id" => Ok(Self::Monitor),
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "weekday" | "day" => Ok(Self::Weekday),
            _ => Err(format!("Unknown group attribute: {}", s)),
        }
    }
}

/// Group readings by attribute value
///
/// Each group is sorted by chemical, then monitor, then time.
pub fn group_by(
    readings: Vec<ChemicalReading>,
    attribute: GroupAttribute,
) -> BTreeMap<String, Vec<ChemicalReading>> {
    let mut grouped: BTreeMap<String, Vec<ChemicalReading>> = BTreeMap::new();
    for reading in readings {
        grouped.entry(attribute.value_of(&reading)).or_default().push(reading);
    }

    for group in grouped.values_mut() {
        group.sort_by(|a, b| {
            a.chemical
                .cmp(&b.chemical)
                .then_with(|| ChemicalReading::cmp_by_monitor_time(a, b))
        });
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn readings() -> Vec<ChemicalReading> {
        vec![
            ChemicalReading::new("Methylosmolene", 2, at(8, 1), 1.0),
            ChemicalReading::new("AGOC-3A", 2, at(4, 2), 2.0),
            ChemicalReading::new("AGOC-3A", 1, at(4, 3), 3.0),
            ChemicalReading::new("Methylosmolene", 1, at(12, 4), 4.0),
        ]
    }

    #[test]
    fn test_group_by_monitor() {
        let grouped = group_by(readings(), GroupAttribute::Monitor);
        assert_eq!(grouped.len(), 2);

        let chemicals: Vec<&str> = grouped["1"].iter().map(|r| r.chemical.as_str()).collect();
        assert_eq!(chemicals, vec!["AGOC-3A", "Methylosmolene"]);
    }

    #[test]
    fn test_group_by_month() {
        let grouped = group_by(readings(), GroupAttribute::Month);
        let months: Vec<&String> = grouped.keys().collect();
        assert_eq!(months, vec!["Apr", "Aug", "Dec"]);

        // within a group: monitor 1 before monitor 2
        let april: Vec<i64> = grouped["Apr"].iter().map(|r| r.monitor_id).collect();
        assert_eq!(april, vec![1, 2]);
    }

    #[test]
    fn test_attribute_from_str() {
        assert_eq!("Monitor".parse::<GroupAttribute>(), Ok(GroupAttribute::Monitor));
        assert_eq!("day".parse::<GroupAttribute>(), Ok(GroupAttribute::Weekday));
        assert!("colour".parse::<GroupAttribute>().is_err());
        assert_eq!(GroupAttribute::Weekday.to_string(), "weekday");
    }
}
