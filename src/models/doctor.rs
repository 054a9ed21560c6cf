use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum ConsultationType {
    #[serde(rename = "In-person")]
    InPerson,
    #[serde(rename = "Video")]
    Video,
}

impl ConsultationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationType::InPerson => "In-person",
            ConsultationType::Video => "Video",
        }
    }
}

impl std::fmt::Display for ConsultationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for ConsultationType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "In-person" => Ok(ConsultationType::InPerson),
            "Video" => Ok(ConsultationType::Video),
            _ => Err(format!("`{}` is not a valid consultation type", value)),
        }
    }
}

/// A stored doctor record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Identifier assigned by the store
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    /// Years of practice
    pub experience: i32,
    pub rating: f64,
    /// Public URL of the doctor's portrait
    pub image: String,
    /// Days the doctor is available, e.g. `["Mon", "Tue"]`
    pub availability: Vec<String>,
    pub time_slots: Vec<String>,
    #[sqlx(try_from = "String")]
    pub consultation_type: ConsultationType,
}

/// A validated doctor that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub experience: i32,
    pub rating: f64,
    pub image: String,
    pub availability: Vec<String>,
    pub time_slots: Vec<String>,
    pub consultation_type: ConsultationType,
}

impl NewDoctor {
    pub fn into_doctor(self, id: Uuid) -> Doctor {
        Doctor {
            id,
            name: self.name,
            specialization: self.specialization,
            experience: self.experience,
            rating: self.rating,
            image: self.image,
            availability: self.availability,
            time_slots: self.time_slots,
            consultation_type: self.consultation_type,
        }
    }
}

/// Request body for creating a doctor.
///
/// Every field is optional at the wire level so that missing values surface
/// as validation errors naming the field instead of a generic parse failure.
/// Values of the wrong type are kept as violations for the same reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", from = "CreateDoctorBody")]
pub struct CreateDoctor {
    pub name: Option<String>,
    pub specialization: Option<String>,
    /// Whole years; numeric strings such as `"5"` are accepted
    pub experience: Option<i32>,
    /// Defaults to 0; numeric strings are accepted
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub availability: Option<Vec<String>>,
    pub time_slots: Option<Vec<String>>,
    /// `In-person` or `Video`
    #[schema(value_type = Option<ConsultationType>)]
    pub consultation_type: Option<String>,
    /// Fields whose raw value could not be coerced to the expected type
    #[serde(skip)]
    pub invalid: Vec<FieldViolation>,
}

/// Untyped create body as it arrives on the wire
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDoctorBody {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    specialization: Value,
    #[serde(default)]
    experience: Value,
    #[serde(default)]
    rating: Value,
    #[serde(default)]
    image: Value,
    #[serde(default)]
    availability: Value,
    #[serde(default)]
    time_slots: Value,
    #[serde(default)]
    consultation_type: Value,
}

impl From<CreateDoctorBody> for CreateDoctor {
    fn from(body: CreateDoctorBody) -> Self {
        let mut invalid = Vec::new();

        let name = coerce_text("name", body.name, &mut invalid);
        let specialization = coerce_text("specialization", body.specialization, &mut invalid);
        let experience = coerce_number("experience", body.experience, parse_integer, &mut invalid);
        let rating = coerce_number("rating", body.rating, parse_float, &mut invalid);
        let image = coerce_text("image", body.image, &mut invalid);
        let availability = coerce_list("availability", body.availability, &mut invalid);
        let time_slots = coerce_list("timeSlots", body.time_slots, &mut invalid);
        let consultation_type = coerce_text("consultationType", body.consultation_type, &mut invalid);

        CreateDoctor {
            name,
            specialization,
            experience,
            rating,
            image,
            availability,
            time_slots,
            consultation_type,
            invalid,
        }
    }
}

fn coerce_text(field: &'static str, raw: Value, invalid: &mut Vec<FieldViolation>) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => {
            invalid.push(FieldViolation::new(field, format!("`{}` must be a string, got {}", field, other)));
            None
        }
    }
}

fn coerce_number<T>(
    field: &'static str,
    raw: Value,
    parse: fn(&str) -> Result<T, String>,
    invalid: &mut Vec<FieldViolation>,
) -> Option<T> {
    let parsed = match raw {
        Value::Null => return None,
        Value::String(text) if text.trim().is_empty() => return None,
        Value::String(text) => parse(&text),
        Value::Number(number) => parse(&number.to_string()),
        other => Err(format!("`{}` must be a number, got {}", field, other)),
    };

    match parsed {
        Ok(value) => Some(value),
        Err(message) => {
            invalid.push(FieldViolation::new(field, message));
            None
        }
    }
}

fn coerce_list(field: &'static str, raw: Value, invalid: &mut Vec<FieldViolation>) -> Option<Vec<String>> {
    match raw {
        Value::Null => None,
        // A lone string is a one-entry list
        Value::String(text) => Some(vec![text]),
        Value::Array(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(text) => entries.push(text),
                    other => {
                        invalid.push(FieldViolation::new(
                            field,
                            format!("`{}` entries must be strings, got {}", field, other),
                        ));
                        return None;
                    }
                }
            }
            Some(entries)
        }
        other => {
            invalid.push(FieldViolation::new(field, format!("`{}` must be a list, got {}", field, other)));
            None
        }
    }
}

/// Partial update; only the fields present are overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32", skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slots: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<ConsultationType>,
}

/// One broken field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("`{}` is required", field),
        }
    }

    pub fn new<S: Into<String>>(field: &'static str, message: S) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All constraint violations found on a doctor payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "Doctor validation failed: {}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

fn check_text(field: &'static str, value: Option<&String>, violations: &mut Vec<FieldViolation>) {
    match value {
        None => violations.push(FieldViolation::required(field)),
        Some(text) if text.trim().is_empty() => violations.push(FieldViolation::required(field)),
        Some(_) => {}
    }
}

fn check_list(field: &'static str, value: Option<&Vec<String>>, violations: &mut Vec<FieldViolation>) {
    match value {
        None => violations.push(FieldViolation::required(field)),
        Some(items) if items.is_empty() => {
            violations.push(FieldViolation::new(field, format!("`{}` must contain at least one entry", field)))
        }
        Some(_) => {}
    }
}

fn check_rating(value: Option<f64>, violations: &mut Vec<FieldViolation>) {
    if let Some(rating) = value {
        if !rating.is_finite() {
            violations.push(FieldViolation::new("rating", "`rating` must be a finite number"));
        }
    }
}

impl CreateDoctor {
    /// Collects every constraint violation, in field order.
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        check_text("name", self.name.as_ref(), &mut violations);
        check_text("specialization", self.specialization.as_ref(), &mut violations);
        if self.experience.is_none() {
            violations.push(FieldViolation::required("experience"));
        }
        check_rating(self.rating, &mut violations);
        check_text("image", self.image.as_ref(), &mut violations);
        check_list("availability", self.availability.as_ref(), &mut violations);
        check_list("timeSlots", self.time_slots.as_ref(), &mut violations);
        match &self.consultation_type {
            None => violations.push(FieldViolation::required("consultationType")),
            Some(value) => {
                if let Err(message) = ConsultationType::try_from(value.clone()) {
                    violations.push(FieldViolation::new("consultationType", message));
                }
            }
        }

        // A value that failed coercion is reported once, with the coercion message
        let mut all = self.invalid.clone();
        all.extend(
            violations
                .into_iter()
                .filter(|v| !self.invalid.iter().any(|bad| bad.field == v.field)),
        );
        all
    }

    pub fn into_new_doctor(self) -> Result<NewDoctor, ValidationErrors> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(ValidationErrors(violations));
        }

        // violations() has already proven every required value is present
        match (
            self.name,
            self.specialization,
            self.experience,
            self.image,
            self.availability,
            self.time_slots,
            self.consultation_type.and_then(|c| ConsultationType::try_from(c).ok()),
        ) {
            (
                Some(name),
                Some(specialization),
                Some(experience),
                Some(image),
                Some(availability),
                Some(time_slots),
                Some(consultation_type),
            ) => Ok(NewDoctor {
                name,
                specialization,
                experience,
                rating: self.rating.unwrap_or(0.0),
                image,
                availability,
                time_slots,
                consultation_type,
            }),
            _ => Err(ValidationErrors(vec![FieldViolation::new(
                "doctor",
                "incomplete doctor payload",
            )])),
        }
    }
}

impl UpdateDoctor {
    /// Checks only the fields being changed; a stored record must keep
    /// satisfying the same constraints it was created under.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();

        if self.name.is_some() {
            check_text("name", self.name.as_ref(), &mut violations);
        }
        if self.specialization.is_some() {
            check_text("specialization", self.specialization.as_ref(), &mut violations);
        }
        check_rating(self.rating, &mut violations);
        if self.image.is_some() {
            check_text("image", self.image.as_ref(), &mut violations);
        }
        if self.availability.is_some() {
            check_list("availability", self.availability.as_ref(), &mut violations);
        }
        if self.time_slots.is_some() {
            check_list("timeSlots", self.time_slots.as_ref(), &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }

    /// Applies the present fields onto `doctor`.
    pub fn apply_to(self, doctor: &mut Doctor) {
        if let Some(name) = self.name {
            doctor.name = name;
        }
        if let Some(specialization) = self.specialization {
            doctor.specialization = specialization;
        }
        if let Some(experience) = self.experience {
            doctor.experience = experience;
        }
        if let Some(rating) = self.rating {
            doctor.rating = rating;
        }
        if let Some(image) = self.image {
            doctor.image = image;
        }
        if let Some(availability) = self.availability {
            doctor.availability = availability;
        }
        if let Some(time_slots) = self.time_slots {
            doctor.time_slots = time_slots;
        }
        if let Some(consultation_type) = self.consultation_type {
            doctor.consultation_type = consultation_type;
        }
    }
}

/// Parses an integer the way form fields arrive: surrounding whitespace is ignored.
pub fn parse_integer(raw: &str) -> Result<i32, String> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i32>() {
        return Ok(value);
    }
    // "5.0" is still a whole number
    match trimmed.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 => {
            Ok(value as i32)
        }
        _ => Err(format!("`{}` is not a whole number", trimmed)),
    }
}

pub fn parse_float(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("`{}` is not a number", trimmed)),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Integer(value)) => i32::try_from(value)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("{} is out of range", value))),
        Some(NumberOrText::Float(value)) => parse_integer(&value.to_string())
            .map(Some)
            .map_err(de::Error::custom),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => parse_integer(&text).map(Some).map_err(de::Error::custom),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Integer(value)) => Ok(Some(value as f64)),
        Some(NumberOrText::Float(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => parse_float(&text).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_payload() -> serde_json::Value {
        json!({
            "name": "A",
            "specialization": "Cardio",
            "experience": 5,
            "image": "http://x/y.png",
            "availability": ["Mon"],
            "timeSlots": ["9am"],
            "consultationType": "Video"
        })
    }

    #[test]
    fn test_complete_payload_validates_with_default_rating() {
        let create: CreateDoctor = serde_json::from_value(complete_payload()).unwrap();
        let doctor = create.into_new_doctor().unwrap();

        assert_eq!(doctor.name, "A");
        assert_eq!(doctor.experience, 5);
        assert_eq!(doctor.rating, 0.0);
        assert_eq!(doctor.time_slots, vec!["9am"]);
        assert_eq!(doctor.consultation_type, ConsultationType::Video);
    }

    #[test]
    fn test_missing_name_is_reported() {
        let mut payload = complete_payload();
        payload.as_object_mut().unwrap().remove("name");
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        let errors = create.into_new_doctor().unwrap_err();
        assert_eq!(errors.fields(), vec!["name"]);
        assert!(errors.to_string().starts_with("Doctor validation failed"));
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let mut payload = complete_payload();
        payload["specialization"] = json!("   ");
        payload["image"] = json!("");
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        assert_eq!(create.into_new_doctor().unwrap_err().fields(), vec!["specialization", "image"]);
    }

    #[test]
    fn test_unknown_consultation_type_rejected() {
        let mut payload = complete_payload();
        payload["consultationType"] = json!("Telephone");
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        let errors = create.into_new_doctor().unwrap_err();
        assert_eq!(errors.fields(), vec!["consultationType"]);
    }

    #[test]
    fn test_empty_lists_rejected() {
        let mut payload = complete_payload();
        payload["availability"] = json!([]);
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        assert_eq!(create.into_new_doctor().unwrap_err().fields(), vec!["availability"]);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let mut payload = complete_payload();
        payload["experience"] = json!(" 12 ");
        payload["rating"] = json!("4.5");
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        assert_eq!(create.experience, Some(12));
        assert_eq!(create.rating, Some(4.5));
    }

    #[test]
    fn test_non_numeric_experience_is_a_violation() {
        let mut payload = complete_payload();
        payload["experience"] = json!("lots");
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        let errors = create.into_new_doctor().unwrap_err();
        assert_eq!(errors.fields(), vec!["experience"]);
        assert!(errors.to_string().contains("`lots` is not a whole number"));
    }

    #[test]
    fn test_wrongly_typed_fields_are_violations() {
        let mut payload = complete_payload();
        payload["name"] = json!(42);
        payload["experience"] = json!(5.5);
        payload["availability"] = json!([1, 2]);
        payload["consultationType"] = json!(7);
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        assert_eq!(
            create.violations().iter().map(|v| v.field).collect::<Vec<_>>(),
            vec!["name", "experience", "availability", "consultationType"]
        );
    }

    #[test]
    fn test_single_string_list_and_null_rating() {
        let mut payload = complete_payload();
        payload["availability"] = json!("Mon");
        payload["rating"] = json!(null);
        let create: CreateDoctor = serde_json::from_value(payload).unwrap();

        let doctor = create.into_new_doctor().unwrap();
        assert_eq!(doctor.availability, vec!["Mon"]);
        assert_eq!(doctor.rating, 0.0);
    }

    #[test]
    fn test_doctor_serializes_with_wire_names() {
        let doctor = NewDoctor {
            name: "A".to_string(),
            specialization: "Cardio".to_string(),
            experience: 5,
            rating: 4.0,
            image: "http://x/y.png".to_string(),
            availability: vec!["Mon".to_string()],
            time_slots: vec!["9am".to_string()],
            consultation_type: ConsultationType::InPerson,
        }
        .into_doctor(Uuid::new_v4());

        let value = serde_json::to_value(&doctor).unwrap();
        assert_eq!(value["_id"], json!(doctor.id.to_string()));
        assert_eq!(value["timeSlots"], json!(["9am"]));
        assert_eq!(value["consultationType"], json!("In-person"));
        assert!(value.get("time_slots").is_none());
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let update = UpdateDoctor {
            rating: Some(4.8),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateDoctor {
            name: Some(" ".to_string()),
            time_slots: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(update.validate().unwrap_err().fields(), vec!["name", "timeSlots"]);
    }

    #[test]
    fn test_update_apply_overwrites_present_fields() {
        let mut doctor = NewDoctor {
            name: "A".to_string(),
            specialization: "Cardio".to_string(),
            experience: 5,
            rating: 0.0,
            image: "http://x/y.png".to_string(),
            availability: vec!["Mon".to_string()],
            time_slots: vec!["9am".to_string()],
            consultation_type: ConsultationType::Video,
        }
        .into_doctor(Uuid::new_v4());

        let update: UpdateDoctor = serde_json::from_value(json!({
            "experience": "7",
            "consultationType": "In-person"
        }))
        .unwrap();
        update.apply_to(&mut doctor);

        assert_eq!(doctor.experience, 7);
        assert_eq!(doctor.consultation_type, ConsultationType::InPerson);
        assert_eq!(doctor.name, "A");
    }

    #[test]
    fn test_parse_integer_accepts_whole_floats() {
        assert_eq!(parse_integer("5"), Ok(5));
        assert_eq!(parse_integer(" 5.0 "), Ok(5));
        assert!(parse_integer("5.5").is_err());
        assert!(parse_integer("five").is_err());
    }

    #[test]
    fn test_parse_float_rejects_non_finite() {
        assert_eq!(parse_float("4.25"), Ok(4.25));
        assert!(parse_float("NaN").is_err());
        assert!(parse_float("inf").is_err());
    }
}
