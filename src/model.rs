use serde::{Deserialize, Serialize};

pub type RecipeId = i64;

/// A recipe as returned by the lookup API
///
/// Treated as an immutable value once fetched. Field names follow the API's
/// camelCase wire format, which is also the persisted format for favorites.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analyzed_instructions: Vec<InstructionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    /// The ingredient line as written in the source recipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Ingredient {
    /// Display line: the original text when present, otherwise the bare name
    pub fn display_line(&self) -> &str {
        match self.original.as_deref() {
            Some(original) if !original.trim().is_empty() => original,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstructionSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstructionStep {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub step: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

/// Nutrients shown in the detail view, in display order
pub const KEY_NUTRIENTS: [&str; 6] = ["Calories", "Fat", "Carbohydrates", "Protein", "Fiber", "Sugar"];

impl Recipe {
    /// The reduced copy kept in the favorites list
    pub fn snapshot(&self) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title.clone(),
            image: self.image.clone(),
            summary: self.summary.clone(),
            ready_in_minutes: self.ready_in_minutes,
            health_score: self.health_score,
            aggregate_likes: self.aggregate_likes,
            ..Default::default()
        }
    }

    pub fn has_instructions(&self) -> bool {
        !self.analyzed_instructions.is_empty()
    }

    pub fn nutrients(&self) -> &[Nutrient] {
        self.nutrition
            .as_ref()
            .map(|n| n.nutrients.as_slice())
            .unwrap_or(&[])
    }

    /// Key nutrients present on this recipe, in [`KEY_NUTRIENTS`] order
    pub fn key_nutrients(&self) -> Vec<&Nutrient> {
        let nutrients = self.nutrients();
        KEY_NUTRIENTS
            .iter()
            .filter_map(|key| nutrients.iter().find(|n| n.name == *key))
            .collect()
    }

    /// Steps of the first instruction section
    pub fn steps(&self) -> &[InstructionStep] {
        self.analyzed_instructions
            .first()
            .map(|section| section.steps.as_slice())
            .unwrap_or(&[])
    }
}

/// A partial match from the ingredient search, needing a detail look-up
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMatch {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub used_ingredient_count: u32,
    #[serde(default)]
    pub missed_ingredient_count: u32,
}
