//! Data model for intercepted requests and replayable responses.

mod request;
mod response;

pub use request::{Destination, Method, Request};
pub use response::StoredResponse;
