use serde::{Deserialize, Serialize};

/// A meal category as served by the remote recipe API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(rename = "idCategory")]
    pub id: String,

    #[serde(rename = "strCategory")]
    pub name: String,

    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: Option<String>,

    #[serde(
        rename = "strCategoryDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_category() {
        let json = r#"{
            "idCategory": "1",
            "strCategory": "Beef",
            "strCategoryThumb": "https://example.com/beef.png",
            "strCategoryDescription": "Beef is the culinary name for meat from cattle."
        }"#;

        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.id, "1");
        assert_eq!(category.name, "Beef");
        assert!(category.description.is_some());
    }
}
