//! Convenience re-exports for hosts embedding the engine

pub use crate::deserializer::{FlatResource, Flattened, deserialize};
pub use crate::error::{DeserializeError, SerializeError};
pub use crate::paths::{PathBuilder, RouteInfo, RoutePathBuilder};
pub use crate::pipeline::{IncludePolicy, PreprocessResult, RequestData, process};
pub use crate::serializer::{Primary, Serializer};
pub use jsonapi_document::prelude::*;
pub use jsonapi_query::prelude::*;
