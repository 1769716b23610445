//! Dish history narrative: report model, generation prompt and schema, and
//! the backend client.

mod client;
mod model;
mod prompt;
mod schema;

pub use client::{
    DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiClient, GeminiConfig, NarrativeBackend,
    NarrativeRequest, fetch_food_history, parse_food_report,
};
pub use model::{
    ConsumptionHub, Coordinate, CulturalInsight, EvolutionStep, FlavorProfile, FoodReport,
    IngredientEvolution, Origin, RegionalVariation,
};
pub use prompt::build_prompt;
pub use schema::food_report_schema;
