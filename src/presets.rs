pub const PRESET_BALANCED: &str = r#"[text]
protected_brands = ["Gucci", "Rolex", "Nike", "Adidas", "Apple", "Samsung"]
counterfeit_indicators = ["copy", "replica", "clone", "duplicate", "first copy"]

[[text.blacklist]]
category = "restricted"
keywords = ["ivory", "rhino", "leopard skin", "drug", "cocaine", "heroin"]

[[text.blacklist]]
category = "safety"
keywords = ["expired", "banned", "hazardous", "cyanide"]

[[text.blacklist]]
category = "counterfeit"
keywords = ["replica", "clone", "1:1 copy", "fake"]

[mandatory_fields]
food = ["expiry_date", "fssai_license", "ingredients", "mrp"]
electronics = ["mrp"]
clothing = ["material", "size_chart", "mrp"]

[pricing]
outlier_check = false

[rules]
disable = []
"#;

pub const PRESET_STRICT: &str = r#"[mandatory_fields]
food = ["expiry_date", "fssai_license", "ingredients", "mrp"]
electronics = ["warranty", "model_number", "mrp"]
clothing = ["material", "size_chart", "mrp"]

[pricing]
outlier_check = true

[pricing.category_stats]
electronics = { mean = 500.0, std = 200.0 }
clothing = { mean = 50.0, std = 20.0 }
food = { mean = 10.0, std = 5.0 }
luxury = { mean = 2000.0, std = 1000.0 }
general = { mean = 100.0, std = 50.0 }

[rules]
disable = []
"#;

pub const PRESET_LENIENT: &str = r#"[mandatory_fields]
food = ["expiry_date", "fssai_license", "mrp"]

[pricing]
outlier_check = false

[rules]
disable = ["TITLE_TOO_SHORT", "TITLE_ALL_CAPS", "WATERMARK_DETECTED"]
"#;

pub const PRESET_NAMES: &[&str] = &["balanced", "strict", "lenient"];

#[must_use]
pub fn preset(name: &str) -> Option<&'static str> {
    match name {
        "balanced" => Some(PRESET_BALANCED),
        "strict" => Some(PRESET_STRICT),
        "lenient" => Some(PRESET_LENIENT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelfwatchConfig;
    use crate::engine::MandatoryFieldsTable;

    #[test]
    fn test_every_preset_loads() {
        for name in PRESET_NAMES {
            let content = preset(name).unwrap();
            assert!(
                ShelfwatchConfig::from_toml_str(content).is_ok(),
                "preset {name} failed to load"
            );
        }
        assert!(preset("paranoid").is_none());
    }

    #[test]
    fn test_balanced_matches_defaults() {
        let balanced = ShelfwatchConfig::from_toml_str(PRESET_BALANCED).unwrap();
        let defaults = ShelfwatchConfig::default();
        assert_eq!(balanced.mandatory_fields, defaults.mandatory_fields);
        assert_eq!(balanced.text.blacklist, defaults.text.blacklist);
        assert_eq!(balanced.text.protected_brands, defaults.text.protected_brands);
    }

    #[test]
    fn test_strict_tightens_electronics() {
        let strict = ShelfwatchConfig::from_toml_str(PRESET_STRICT).unwrap();
        let table = strict.mandatory_fields_table();
        assert_eq!(
            table.required_for("electronics").map(<[String]>::to_vec),
            Some(vec![
                "warranty".to_string(),
                "model_number".to_string(),
                "mrp".to_string()
            ])
        );
        assert_eq!(
            table.required_for("food"),
            MandatoryFieldsTable::default().required_for("food")
        );
        assert!(strict.pricing.outlier_check);
    }
}
