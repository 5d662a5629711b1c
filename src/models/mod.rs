mod draft;
mod images;
mod session;

pub use draft::{PropertyDraft, PropertyPayload};
pub use images::ImageList;
pub use session::{Session, SessionUser};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A land plot listing as stored in the `properties` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Assigned by the backend on insert
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    /// Price per perch (LKR)
    #[serde(default, deserialize_with = "null_as_default")]
    pub perch_price: f64,
    /// Plot size in perches
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_perches: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_water: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_electricity: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_telephone: bool,
    #[serde(default)]
    pub distance_to_kandy: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_phone: String,
    /// Display order; the first image is the cover
    #[serde(default)]
    pub images: ImageList,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub tour_360_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// Asking price for the whole plot
    pub fn total_value(&self) -> f64 {
        self.perch_price * self.total_perches
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first()
    }

    /// Names of the utilities connected to the plot
    pub fn utilities(&self) -> Vec<&'static str> {
        let mut utilities = Vec::new();
        if self.has_water {
            utilities.push("Water");
        }
        if self.has_electricity {
            utilities.push("Electricity");
        }
        if self.has_telephone {
            utilities.push("Telephone");
        }
        utilities
    }
}

/// Render a whole amount with thousands separators, e.g. `10,000,000`
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rows written by older clients may hold `null` where we expect a value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_amounts_with_separators() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1000.0), "1,000");
        assert_eq!(format_amount(500_000.0 * 20.0), "10,000,000");
        assert_eq!(format_amount(-1234567.0), "-1,234,567");
    }

    #[test]
    fn decodes_row_with_nulls() {
        let row = json!({
            "id": "6f1c",
            "title": "Corner Plot",
            "location": "Haragama",
            "perch_price": 475000,
            "total_perches": 12,
            "has_water": null,
            "has_electricity": true,
            "agent_name": "Uthpala",
            "agent_phone": "+94 777 123 456",
            "images": null,
            "description": null,
            "created_at": "2025-01-04T09:30:00.123456+00:00"
        });

        let property: Property = serde_json::from_value(row).unwrap();
        assert!(!property.has_water);
        assert!(property.has_electricity);
        assert!(!property.has_telephone);
        assert!(property.images.is_empty());
        assert_eq!(property.description, "");
        assert_eq!(property.total_value(), 5_700_000.0);
        assert_eq!(property.utilities(), vec!["Electricity"]);
        assert_eq!(property.cover_image(), None);
    }
}
