use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of ingredient/measure slots a meal record carries on the wire.
const INGREDIENT_SLOTS: usize = 20;

/// A recipe record as served by the remote recipe API.
///
/// The same shape is persisted as a favorites snapshot, so the wire field
/// names are kept on disk as well. Abbreviated records (category listings)
/// only populate id, name and thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    #[serde(rename = "idMeal")]
    pub id: String,

    #[serde(rename = "strMeal")]
    pub name: String,

    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,

    #[serde(
        rename = "strCategory",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    #[serde(rename = "strArea", default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(
        rename = "strInstructions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instructions: Option<String>,

    /// Remaining wire fields, notably the numbered strIngredientN/strMeasureN
    /// pairs. Preserved so a favorited snapshot keeps its full detail.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Option<String>>,
}

impl Meal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: None,
            category: None,
            area: None,
            instructions: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Collects the populated ingredient/measure pairs from the numbered
    /// wire fields. Blank slots are skipped, names and measures are trimmed.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        let mut out = Vec::new();
        for slot in 1..=INGREDIENT_SLOTS {
            let Some(name) = self.field(&format!("strIngredient{}", slot)) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let measure = self
                .field(&format!("strMeasure{}", slot))
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from);
            out.push(Ingredient {
                name: name.to_string(),
                measure,
            });
        }
        out
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_deref())
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;

        if let Some(category) = &self.category {
            writeln!(f, "Category: {}", category)?;
        }
        if let Some(area) = &self.area {
            writeln!(f, "Area: {}", area)?;
        }

        let ingredients = self.ingredients();
        if !ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if let Some(instructions) = &self.instructions {
            if !instructions.is_empty() {
                writeln!(f, "\nInstructions:\n{}", instructions)?;
            }
        }

        Ok(())
    }
}

/// One ingredient line of a meal, paired with its measure when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.measure {
            Some(measure) => write!(f, "{} {}", measure, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
