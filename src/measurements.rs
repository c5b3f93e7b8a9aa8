//! Body-measurement templates per garment type.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::GarmentType;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeasurementField {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub optional: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeasurementTemplate {
    pub name: &'static str,
    pub fields: Vec<MeasurementField>,
}

type FieldDef = (&'static str, &'static str, &'static str, bool);

const SHIRT_BLOUSE: &[FieldDef] = &[
    ("neck_circumference", "Neck Circumference", "cm", false),
    ("chest_bust_circumference", "Chest/Bust Circumference", "cm", false),
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("shoulder_width", "Shoulder Width", "cm", false),
    ("sleeve_length", "Sleeve Length", "cm", false),
    ("armhole", "Armhole", "cm", true),
    ("biceps_circumference", "Biceps Circumference", "cm", false),
    ("wrist_circumference", "Wrist Circumference", "cm", false),
    ("shirt_length_back", "Shirt Length (Back)", "cm", false),
    ("shirt_length_front", "Shirt Length (Front)", "cm", true),
    ("chest_to_waist", "Chest to Waist", "cm", true),
];

const POLO_TSHIRT: &[FieldDef] = &[
    ("chest_circumference", "Chest Circumference", "cm", false),
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("shoulder_width", "Shoulder Width", "cm", false),
    ("sleeve_length", "Sleeve Length", "cm", false),
    ("shirt_length", "Shirt Length", "cm", false),
];

const TROUSERS_PANTS: &[FieldDef] = &[
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("hip_circumference", "Hip Circumference", "cm", false),
    ("front_rise", "Front Rise", "cm", false),
    ("back_rise", "Back Rise", "cm", false),
    ("inseam_length", "Inseam Length", "cm", false),
    ("outseam_length", "Outseam Length", "cm", false),
    ("thigh_circumference", "Thigh Circumference", "cm", false),
    ("knee_circumference", "Knee Circumference", "cm", true),
    ("ankle_circumference", "Ankle Circumference", "cm", false),
    ("waist_to_knee", "Waist to Knee", "cm", true),
    ("preferred_hem_allowance", "Preferred Hem Allowance", "cm", false),
];

const SKIRT: &[FieldDef] = &[
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("hip_circumference", "Hip Circumference", "cm", false),
    ("skirt_length_front", "Skirt Length (Front)", "cm", false),
    ("skirt_length_back", "Skirt Length (Back)", "cm", false),
    ("waist_to_hip", "Waist to Hip", "cm", false),
    ("hem_width", "Hem Width", "cm", true),
    ("preferred_pleat_count", "Preferred Pleat Count", "count", true),
    ("pleat_depth", "Pleat Depth", "cm", true),
];

const SHORTS: &[FieldDef] = &[
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("hip_circumference", "Hip Circumference", "cm", false),
    ("inseam_length", "Inseam Length", "cm", false),
    ("outseam_length", "Outseam Length", "cm", false),
    ("thigh_circumference", "Thigh Circumference", "cm", false),
];

const PINAFORE: &[FieldDef] = &[
    ("bust_circumference", "Bust Circumference", "cm", false),
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("hip_circumference", "Hip Circumference", "cm", false),
    ("dress_length_front", "Dress Length (Front)", "cm", false),
    ("shoulder_to_waist", "Shoulder to Waist", "cm", false),
    ("shoulder_width", "Shoulder Width", "cm", false),
    ("armhole", "Armhole", "cm", false),
    ("back_width", "Back Width", "cm", false),
];

const BLAZER: &[FieldDef] = &[
    ("chest_circumference", "Chest Circumference", "cm", false),
    ("shoulder_width", "Shoulder Width", "cm", false),
    ("sleeve_length", "Sleeve Length", "cm", false),
    ("jacket_length_back", "Jacket Length (Back)", "cm", false),
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("bicep_circumference", "Bicep Circumference", "cm", false),
    ("collar_to_front", "Collar to Front", "cm", true),
];

const PE_KIT: &[FieldDef] = &[
    ("chest_circumference", "Chest Circumference", "cm", false),
    ("waist_circumference", "Waist Circumference", "cm", false),
    ("shoulder_width", "Shoulder Width", "cm", false),
    ("sleeve_length", "Sleeve Length", "cm", false),
    ("length", "Length", "cm", false),
    ("hip_circumference", "Hip Circumference", "cm", false),
    ("inseam", "Inseam", "cm", false),
    ("outseam", "Outseam", "cm", false),
    ("thigh_circumference", "Thigh Circumference", "cm", false),
];

const ACCESSORY: &[FieldDef] = &[
    ("tie_length", "Tie Length", "cm", false),
    ("belt_waist_size", "Belt Waist Size", "cm", false),
];

fn garment_fields(garment: GarmentType) -> (&'static str, &'static [FieldDef]) {
    match garment {
        GarmentType::ShirtBlouse => ("Shirt/Blouse Measurements", SHIRT_BLOUSE),
        GarmentType::PoloTshirt => ("Polo/T-shirt Measurements", POLO_TSHIRT),
        GarmentType::TrousersPants => ("Trousers/Pants Measurements", TROUSERS_PANTS),
        GarmentType::Skirt => ("Skirt Measurements", SKIRT),
        GarmentType::Shorts => ("Shorts Measurements", SHORTS),
        GarmentType::Pinafore => ("Pinafore/Overall/Dress Measurements", PINAFORE),
        GarmentType::Blazer => ("Blazer/Jacket Measurements", BLAZER),
        GarmentType::PeKit => ("PE Kit Measurements", PE_KIT),
        GarmentType::Accessory => ("Accessory Measurements", ACCESSORY),
    }
}

pub fn template_for(garment: Option<GarmentType>) -> MeasurementTemplate {
    let Some(garment) = garment else {
        return MeasurementTemplate {
            name: "Custom Measurements",
            fields: Vec::new(),
        };
    };
    let (name, fields) = garment_fields(garment);
    MeasurementTemplate {
        name,
        fields: fields
            .iter()
            .map(|&(name, label, unit, optional)| MeasurementField {
                name,
                label,
                unit,
                optional,
            })
            .collect(),
    }
}

/// Field names that apply to a garment type.
pub fn field_names(garment: GarmentType) -> impl Iterator<Item = &'static str> {
    garment_fields(garment).1.iter().map(|field| field.0)
}

/// Measurements must be a JSON object of numeric values; for a typed garment
/// every key must belong to that garment's template.
pub fn validate_measurements(garment: Option<GarmentType>, value: &Value) -> Result<(), String> {
    let Value::Object(map) = value else {
        return Err("Measurements must be a JSON object.".into());
    };

    for (key, entry) in map {
        let numeric = match entry {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        };
        if !numeric {
            return Err(format!("Measurement '{key}' must be a number."));
        }
        if let Some(garment) = garment {
            if !field_names(garment).any(|name| name == key) {
                return Err(format!(
                    "Measurement '{key}' does not apply to {}.",
                    garment.display_name()
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untyped_products_get_custom_template() {
        let template = template_for(None);
        assert_eq!(template.name, "Custom Measurements");
        assert!(template.fields.is_empty());
    }

    #[test]
    fn skirt_template_marks_pleats_optional() {
        let template = template_for(Some(GarmentType::Skirt));
        assert_eq!(template.name, "Skirt Measurements");
        assert_eq!(template.fields.len(), 8);
        let pleats = template
            .fields
            .iter()
            .find(|f| f.name == "preferred_pleat_count")
            .unwrap();
        assert!(pleats.optional);
        assert_eq!(pleats.unit, "count");
    }

    #[test]
    fn accepts_known_numeric_fields() {
        let value = json!({ "tie_length": 120, "belt_waist_size": "64.5" });
        assert!(validate_measurements(Some(GarmentType::Accessory), &value).is_ok());
    }

    #[test]
    fn rejects_fields_from_other_garments() {
        let value = json!({ "inseam_length": 70 });
        let err = validate_measurements(Some(GarmentType::Blazer), &value).unwrap_err();
        assert!(err.contains("inseam_length"));
    }

    #[test]
    fn rejects_non_objects_and_non_numbers() {
        assert!(validate_measurements(None, &json!([1, 2])).is_err());
        assert!(validate_measurements(None, &json!({ "chest": "wide" })).is_err());
        assert!(validate_measurements(None, &json!({ "chest": 80 })).is_ok());
    }
}
