use crate::models::{parse_float, parse_integer, CreateDoctor, FieldViolation, ValidationErrors};

/// Text fields of the multipart create form, as received
#[derive(Debug, Default, Clone)]
pub struct DoctorForm {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub rating: Option<String>,
    pub availability: Option<String>,
    pub time_slots: Option<String>,
    pub consultation_type: Option<String>,
}

impl DoctorForm {
    /// Records a text field; returns `false` for names the form does not know.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "specialization" => &mut self.specialization,
            "experience" => &mut self.experience,
            "rating" => &mut self.rating,
            "availability" => &mut self.availability,
            "timeSlots" => &mut self.time_slots,
            "consultationType" => &mut self.consultation_type,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Coerces the text fields into a create request.
    ///
    /// The image URL is left empty; it only exists once the upload has gone
    /// through, so every other field is checked here first.
    pub fn into_create_doctor(self) -> Result<CreateDoctor, ValidationErrors> {
        let mut violations = Vec::new();

        let experience = match non_blank(self.experience) {
            None => None,
            Some(raw) => match parse_integer(&raw) {
                Ok(value) => Some(value),
                Err(message) => {
                    violations.push(FieldViolation::new("experience", message));
                    None
                }
            },
        };

        let rating = match non_blank(self.rating) {
            None => None,
            Some(raw) => match parse_float(&raw) {
                Ok(value) => Some(value),
                Err(message) => {
                    violations.push(FieldViolation::new("rating", message));
                    None
                }
            },
        };

        let create = CreateDoctor {
            name: self.name,
            specialization: self.specialization,
            experience,
            rating,
            image: None,
            availability: self.availability.as_deref().map(split_list),
            time_slots: self.time_slots.as_deref().map(split_list),
            consultation_type: self.consultation_type.map(|c| c.trim().to_string()),
            invalid: violations,
        };

        let violations: Vec<FieldViolation> = create
            .violations()
            .into_iter()
            .filter(|v| v.field != "image")
            .collect();

        if violations.is_empty() {
            Ok(create)
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma-joined form value: `"Mon, Tue"` becomes `["Mon", "Tue"]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
