// Domain layer - Request, response and table models
pub mod query;
pub mod reading;
pub mod table;
pub mod variables;
