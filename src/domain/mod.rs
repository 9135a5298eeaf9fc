// Domain layer - Core types, errors and encoder rules

pub mod errors;
pub mod model;
pub mod rules;
