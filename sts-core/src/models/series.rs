/// The width of the trailing window every tree is built over.
pub const DAYS: usize = 30;

/// A fixed-width day-indexed series: slot 0 is today, slot `DAYS - 1` is
/// `DAYS - 1` days ago. `None` marks a day without data and serialises as
/// `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(transparent))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Series(pub [Option<f64>; DAYS]);

impl Series {
    /// A series with no data on any day.
    pub const EMPTY: Series = Series([None; DAYS]);

    /// Build a series slot by slot.
    pub fn from_fn(f: impl FnMut(usize) -> Option<f64>) -> Self {
        Self(std::array::from_fn(f))
    }

    /// The slots that hold data, with their day index.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(day, value)| value.map(|value| (day, value)))
    }

    /// How many slots hold data.
    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|value| value.is_some()).count()
    }

    /// The sum over the slots holding data, or None if there are none.
    pub fn defined_sum(&self) -> Option<f64> {
        self.defined()
            .map(|(_, value)| value)
            .fold(None, |acc, value| Some(acc.unwrap_or(0.0) + value))
    }

    /// True when no slot holds data.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::ops::Index<usize> for Series {
    type Output = Option<f64>;

    fn index(&self, day: usize) -> &Self::Output {
        &self.0[day]
    }
}

impl std::ops::IndexMut<usize> for Series {
    fn index_mut(&mut self, day: usize) -> &mut Self::Output {
        &mut self.0[day]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defined_sum() {
        assert_eq!(Series::EMPTY.defined_sum(), None);

        let mut series = Series::EMPTY;
        series[3] = Some(2.5);
        series[7] = Some(-1.0);
        assert_eq!(series.defined_sum(), Some(1.5));
        assert_eq!(series.defined_count(), 2);
    }

    #[test]
    fn test_zero_is_data() {
        let mut series = Series::EMPTY;
        series[0] = Some(0.0);
        assert!(!series.is_empty());
        assert_eq!(series.defined_sum(), Some(0.0));
    }

    #[test]
    fn test_nulls_on_the_wire() {
        let mut series = Series::EMPTY;
        series[1] = Some(4.0);
        let value = serde_json::to_value(series).unwrap();
        let slots = value.as_array().unwrap();
        assert_eq!(slots.len(), DAYS);
        assert!(slots[0].is_null());
        assert_eq!(slots[1], serde_json::json!(4.0));
    }
}
