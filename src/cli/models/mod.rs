/// CLI Indexes: Base Model enum
pub mod model;

/// CLI Indexes: BERT models
pub mod bert;

pub use model::Model;
