use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Error returned when a string does not name a known enum variant
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Cuisine a dish belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Cuisine {
    Chinese,
    Malay,
    Indian,
    Local,
    Western,
}

impl Cuisine {
    pub const ALL: [Cuisine; 5] = [
        Cuisine::Chinese,
        Cuisine::Malay,
        Cuisine::Indian,
        Cuisine::Local,
        Cuisine::Western,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Chinese => "Chinese",
            Cuisine::Malay => "Malay",
            Cuisine::Indian => "Indian",
            Cuisine::Local => "Local",
            Cuisine::Western => "Western",
        }
    }
}

impl Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Cuisine::ALL
            .into_iter()
            .find(|cuisine| cuisine.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseEnumError::new("cuisine", value))
    }
}

impl TryFrom<String> for Cuisine {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Time of day a dish is typically eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Any,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Any => "any",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            "any" => Ok(MealType::Any),
            _ => Err(ParseEnumError::new("meal type", value)),
        }
    }
}

impl TryFrom<String> for MealType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Place of a dish in a meal. Descriptive only, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Course {
    MainCourse,
    SideDish,
    Dessert,
    Drink,
    Snack,
}

impl Course {
    pub fn as_str(&self) -> &'static str {
        match self {
            Course::MainCourse => "main_course",
            Course::SideDish => "side_dish",
            Course::Dessert => "dessert",
            Course::Drink => "drink",
            Course::Snack => "snack",
        }
    }
}

impl FromStr for Course {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "main_course" => Ok(Course::MainCourse),
            "side_dish" => Ok(Course::SideDish),
            "dessert" => Ok(Course::Dessert),
            "drink" => Ok(Course::Drink),
            "snack" => Ok(Course::Snack),
            _ => Err(ParseEnumError::new("course", value)),
        }
    }
}

/// A dish from the catalog. Never mutated once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price in SGD
    pub price: f64,
    pub cuisine: Cuisine,
    /// Heat level from 0 (none) to 10
    pub spiciness: u8,
    pub is_halal: bool,
    pub is_vegetarian: bool,
    /// Meal the dish is matched against for the meal-type bonus
    pub meal_type: MealType,
    /// Every time of day the dish is served, as listed in the source data.
    /// Descriptive only; scoring uses `meal_type`.
    #[serde(default)]
    pub meal_times: Vec<String>,
    pub course: Course,
    #[serde(default)]
    pub attributes: Vec<String>,
}
