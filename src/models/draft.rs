use super::{ImageList, Property};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// In-memory form state for a listing being created or edited.
///
/// Every field may be unset while the operator is still typing; call
/// [`PropertyDraft::to_payload`] to get the row that will be submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDraft {
    /// Present only when editing an existing row
    pub id: Option<String>,
    pub title: String,
    pub location: String,
    pub perch_price: Option<f64>,
    pub total_perches: Option<f64>,
    pub has_water: Option<bool>,
    pub has_electricity: Option<bool>,
    pub has_telephone: Option<bool>,
    pub distance_to_kandy: String,
    pub landmark: String,
    pub agent_name: String,
    pub agent_phone: String,
    pub images: ImageList,
    pub description: String,
    pub video_url: String,
    pub tour_360_url: String,
}

impl PropertyDraft {
    /// Populate a draft with the current values of a stored row
    pub fn from_property(property: &Property) -> Self {
        Self {
            id: Some(property.id.clone()),
            title: property.title.clone(),
            location: property.location.clone(),
            perch_price: Some(property.perch_price),
            total_perches: Some(property.total_perches),
            has_water: Some(property.has_water),
            has_electricity: Some(property.has_electricity),
            has_telephone: Some(property.has_telephone),
            distance_to_kandy: property.distance_to_kandy.clone().unwrap_or_default(),
            landmark: property.landmark.clone().unwrap_or_default(),
            agent_name: property.agent_name.clone(),
            agent_phone: property.agent_phone.clone(),
            images: property.images.clone(),
            description: property.description.clone(),
            video_url: property.video_url.clone().unwrap_or_default(),
            tour_360_url: property.tour_360_url.clone().unwrap_or_default(),
        }
    }

    /// Normalize into the row sent to the store. The identifier is not part
    /// of the payload.
    pub fn to_payload(&self) -> PropertyPayload {
        PropertyPayload {
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            perch_price: self.perch_price,
            total_perches: self.total_perches,
            has_water: self.has_water.unwrap_or(false),
            has_electricity: self.has_electricity.unwrap_or(false),
            has_telephone: self.has_telephone.unwrap_or(false),
            distance_to_kandy: non_blank(&self.distance_to_kandy),
            landmark: non_blank(&self.landmark),
            agent_name: self.agent_name.trim().to_string(),
            agent_phone: self.agent_phone.trim().to_string(),
            images: self.images.iter().collect(),
            description: self.description.trim().to_string(),
            video_url: non_blank(&self.video_url),
            tour_360_url: non_blank(&self.tour_360_url),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// A complete row as written to the `properties` table (whole-row semantics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PropertyPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(
        required(message = "Price per perch is required"),
        range(min = 0.0, message = "Price per perch cannot be negative")
    )]
    pub perch_price: Option<f64>,
    #[validate(
        required(message = "Total perches is required"),
        range(min = 0.0, message = "Total perches cannot be negative")
    )]
    pub total_perches: Option<f64>,
    pub has_water: bool,
    pub has_electricity: bool,
    pub has_telephone: bool,
    pub distance_to_kandy: Option<String>,
    pub landmark: Option<String>,
    #[validate(length(min = 1, message = "Agent name is required"))]
    pub agent_name: String,
    #[validate(length(min = 1, message = "Agent phone is required"))]
    pub agent_phone: String,
    pub images: ImageList,
    pub description: String,
    pub video_url: Option<String>,
    pub tour_360_url: Option<String>,
}

impl PropertyPayload {
    /// Validate and flatten any failures into one operator-facing line
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|errors| describe(&errors))
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();
    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PropertyDraft {
        PropertyDraft {
            title: "Premium Residential Land".to_string(),
            location: "Haragama".to_string(),
            perch_price: Some(500_000.0),
            total_perches: Some(20.0),
            agent_name: "Uthpala".to_string(),
            agent_phone: "+94 777 123 456".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn unset_flags_become_false() {
        let payload = filled().to_payload();
        assert!(!payload.has_water);
        assert!(!payload.has_electricity);
        assert!(!payload.has_telephone);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["has_water"], serde_json::Value::Bool(false));
        assert!(json.get("id").is_none());
    }

    #[test]
    fn blank_optional_text_is_null() {
        let mut draft = filled();
        draft.landmark = "   ".to_string();
        draft.video_url = " https://youtu.be/x ".to_string();

        let payload = draft.to_payload();
        assert_eq!(payload.landmark, None);
        assert_eq!(payload.video_url.as_deref(), Some("https://youtu.be/x"));
    }

    #[test]
    fn draft_accepts_comma_separated_images() {
        let draft: PropertyDraft = serde_json::from_str(
            r#"{"title": "Plot", "images": "a, b , c", "has_water": null}"#,
        )
        .unwrap();
        assert_eq!(draft.to_payload().images.as_slice(), ["a", "b", "c"]);
        assert_eq!(draft.has_water, None);
    }

    #[test]
    fn reports_missing_required_fields() {
        let message = PropertyDraft::default().to_payload().check().unwrap_err();
        assert!(message.contains("Title is required"));
        assert!(message.contains("Price per perch is required"));
        assert!(message.contains("Agent phone is required"));

        assert!(filled().to_payload().check().is_ok());
    }

    #[test]
    fn rejects_negative_numbers() {
        let mut draft = filled();
        draft.total_perches = Some(-3.0);
        let message = draft.to_payload().check().unwrap_err();
        assert_eq!(message, "Total perches cannot be negative");
    }
}
