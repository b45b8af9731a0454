pub mod analysis;
pub mod analytics;
pub mod auth;
pub mod content;
pub mod recommendations;

pub use analysis::{ClassificationPolicy, RandomClassifier};
pub use auth::{AuthClaims, TokenService};
pub use recommendations::generate_personalized_recommendations;
