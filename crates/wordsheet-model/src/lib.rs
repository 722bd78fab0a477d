pub mod api_response;
pub mod schema;
pub mod dictionary;
pub mod resolve;
pub mod flatten;

pub use api_response::*;
pub use schema::*;
pub use dictionary::*;
