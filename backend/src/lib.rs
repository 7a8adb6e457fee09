//! GreenCare backend: plant-care posts, the follow graph, care reminders and
//! notifications behind a REST API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(test)]
pub(crate) mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
