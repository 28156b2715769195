pub mod adapter;
pub mod aggregator;
pub mod config;
pub mod error;
pub mod extract;
pub mod formatter;
pub mod ingredient_categorizer;
pub mod name_normalizer;
pub mod pipeline;
pub mod quantity_parser;
pub mod types;
pub mod unit_standardizer;

pub use adapter::{adapt, detect_shape, Adapted, InputShape};
pub use config::EngineConfig;
pub use error::AdapterError;
pub use ingredient_categorizer::{categorize, Department};
pub use name_normalizer::{normalize_name, NormalizedName};
pub use pipeline::{
    run_pipeline, run_pipeline_with_config, run_pipeline_with_stats, PipelineOutput,
    PipelineStats,
};
pub use quantity_parser::parse_quantity;
pub use types::{
    AggregatedIngredient, CategorizedItem, NormalizedIngredient, ParsedQuantity,
    RawIngredientMention, ShoppingItem, ShoppingList,
};
