use std::fmt;

use serde::Serialize;

use crate::util::{MIN_RADIUS, display_label, format_change, radius_for};

use super::error::DatasetError;

/// The two styling classes a bubble can take, chosen by the sign of its change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorClass {
    Positive,
    Negative,
}

impl ColorClass {
    /// Zero counts as negative: only strictly positive changes get the positive class.
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input record: a named, signed change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Datum {
    pub name: String,
    pub change: f64,
}

impl Datum {
    pub fn new(name: impl Into<String>, change: f64) -> Self {
        Self {
            name: name.into(),
            change,
        }
    }

    pub fn color_class(&self) -> ColorClass {
        ColorClass::from_magnitude(self.change)
    }

    pub fn radius(&self, min_radius: f32) -> f32 {
        radius_for(self.change.abs() as f32, min_radius)
    }

    pub fn label(&self) -> String {
        display_label(&self.name)
    }

    pub fn change_label(&self) -> String {
        format_change(self.change)
    }
}

/// A validated, ordered set of records. Record order is body order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Datum>,
}

impl Dataset {
    pub fn new(records: Vec<Datum>) -> Result<Self, DatasetError> {
        for (index, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(DatasetError::BlankName { index });
            }
            if !record.change.is_finite() {
                return Err(DatasetError::NonFiniteMagnitude {
                    index,
                    name: record.name.clone(),
                });
            }
            // Bodies are sized in f32, which overflows long before f64 does.
            if !record.radius(MIN_RADIUS).is_finite() {
                return Err(DatasetError::MagnitudeOutOfRange {
                    index,
                    name: record.name.clone(),
                    change: record.change,
                });
            }
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Datum] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Datum> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Datum;
    type IntoIter = std::slice::Iter<'a, Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn sign_selects_color_class() {
        assert_eq!(Datum::new("A", 3.0).color_class(), ColorClass::Positive);
        assert_eq!(Datum::new("B", -3.0).color_class(), ColorClass::Negative);
        assert_eq!(Datum::new("C", 0.0).color_class(), ColorClass::Negative);
    }

    #[test]
    fn radius_uses_absolute_change() {
        let datum = Datum::new("X", -5.0);
        assert_approx_eq!(f32, datum.radius(8.0), 15.5);
    }

    #[test]
    fn rejects_blank_names() {
        let error = Dataset::new(vec![Datum::new("ok", 1.0), Datum::new("  ", 2.0)]).unwrap_err();
        assert!(matches!(error, DatasetError::BlankName { index: 1 }));
    }

    #[test]
    fn rejects_non_finite_changes() {
        let error = Dataset::new(vec![Datum::new("nan", f64::NAN)]).unwrap_err();
        assert!(matches!(error, DatasetError::NonFiniteMagnitude { index: 0, .. }));
    }

    #[test]
    fn rejects_changes_beyond_f32_range() {
        let error = Dataset::new(vec![Datum::new("Small", 3.0), Datum::new("Huge", -1e39)])
            .unwrap_err();
        assert!(matches!(error, DatasetError::MagnitudeOutOfRange { index: 1, .. }));

        let largest = Dataset::new(vec![Datum::new("Large", 1e30)]).unwrap();
        assert!(largest.records()[0].radius(MIN_RADIUS).is_finite());
    }

    #[test]
    fn labels_follow_name_shape() {
        let datum = Datum::new("Apple Inc", 62.0);
        assert_eq!(datum.label(), "AI");
        assert_eq!(datum.change_label(), "62%");
    }
}
