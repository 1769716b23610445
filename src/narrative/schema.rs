use serde_json::{Value, json};

fn coordinate_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "lat": { "type": "NUMBER" },
            "lng": { "type": "NUMBER" }
        },
        "required": ["lat", "lng"]
    })
}

fn string_object(fields: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|field| ((*field).to_owned(), json!({ "type": "STRING" })))
        .collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": fields,
    })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

/// Structured-output schema sent with every generation request.
///
/// Field names match the camelCase wire names of [`super::FoodReport`].
#[must_use]
pub fn food_report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "foodName": { "type": "STRING" },
            "origin": {
                "type": "OBJECT",
                "properties": {
                    "location": { "type": "STRING" },
                    "era": { "type": "STRING" },
                    "coordinates": coordinate_schema(),
                    "summary": { "type": "STRING" }
                },
                "required": ["location", "era", "coordinates", "summary"]
            },
            "evolutionSteps": array_of(json!({
                "type": "OBJECT",
                "properties": {
                    "year": { "type": "STRING" },
                    "location": { "type": "STRING" },
                    "event": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "coordinates": coordinate_schema()
                },
                "required": ["year", "location", "event", "description", "coordinates"]
            })),
            "consumptionHubs": array_of(json!({
                "type": "OBJECT",
                "properties": {
                    "country": { "type": "STRING" },
                    "percentage": { "type": "NUMBER" },
                    "coordinates": coordinate_schema()
                },
                "required": ["country", "percentage", "coordinates"]
            })),
            "ingredientEvolution": array_of(string_object(&["original", "modern", "reason"])),
            "flavorProfile": {
                "type": "OBJECT",
                "properties": {
                    "sweet": { "type": "NUMBER" },
                    "savory": { "type": "NUMBER" },
                    "spicy": { "type": "NUMBER" },
                    "sour": { "type": "NUMBER" },
                    "bitter": { "type": "NUMBER" }
                },
                "required": ["sweet", "savory", "spicy", "sour", "bitter"]
            },
            "culturalSignificance": array_of(string_object(&["region", "meaning", "tradition"])),
            "regionalVariations": array_of(string_object(&[
                "name",
                "region",
                "keyDifference",
                "popularity"
            ]))
        },
        "required": [
            "foodName",
            "origin",
            "evolutionSteps",
            "consumptionHubs",
            "ingredientEvolution",
            "flavorProfile",
            "culturalSignificance",
            "regionalVariations"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::food_report_schema;

    #[test]
    fn every_top_level_property_is_required() {
        let schema = food_report_schema();
        let properties = schema["properties"].as_object().expect("properties");
        let required: Vec<&str> = schema["required"]
            .as_array()
            .expect("required")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(properties.len(), required.len());
        for key in properties.keys() {
            assert!(required.contains(&key.as_str()), "{key} not required");
        }
    }

    #[test]
    fn nested_arrays_carry_object_items() {
        let schema = food_report_schema();
        let variation = &schema["properties"]["regionalVariations"];
        assert_eq!(variation["type"], "ARRAY");
        assert_eq!(variation["items"]["required"][2], "keyDifference");
        assert_eq!(
            schema["properties"]["consumptionHubs"]["items"]["properties"]["percentage"]["type"],
            "NUMBER"
        );
    }
}
