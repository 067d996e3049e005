//! # JSON:API Engine
//!
//! The top layer of the engine: walks object graphs into JSON:API documents
//! (cycle-safe, with `included` deduplication and pagination links),
//! flattens inbound request documents back into plain keyed structures, and
//! exposes the single request-processing entry point hosts call with a
//! resolved descriptor, normalized query parameters and route metadata.
//!
//! All processing is synchronous and request-scoped; the descriptor
//! registry is the only state shared across requests and is read-only.

pub mod paths;
pub mod serializer;
pub mod deserializer;
pub mod pipeline;
pub mod error;
pub mod prelude;

// Re-export main types
pub use paths::{PathBuilder, RouteInfo, RoutePathBuilder};
pub use serializer::{Primary, Serializer};
pub use deserializer::{FlatResource, Flattened, deserialize};
pub use pipeline::{IncludePolicy, PreprocessResult, RequestData, process};
pub use error::{DeserializeError, SerializeError};
