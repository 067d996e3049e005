//! The request-processing entry point.
//!
//! One call per request: parse the query contexts, run the interpreters
//! over the sequence, serialize the result. Failures are terminal - they
//! are collected into an `errors` document whose status is chosen by the
//! worst classification present. Nothing is retried.

use serde_json::{Map, Value};
use tracing::debug;

use jsonapi_document::{ApiError, DescriptorRegistry, Document, response_status};
use jsonapi_query::{
    FieldsetContext, FilteringContext, IncludeContext, PaginationContext, QueryConfig,
    QueryParams, ResourceRef, Sequence, SortingContext, apply_filtering, apply_pagination,
    apply_sorting,
};
use jsonapi_query::convert::ConverterRegistry;

use crate::paths::PathBuilder;
use crate::serializer::{Primary, Serializer};

/// The root value the host hands to the pipeline
pub enum RequestData {
    /// Truly empty body with no applicable descriptor: pass-through no-op
    NoContent,
    Null,
    One(ResourceRef),
    Many(Sequence),
    /// The handler produced failures instead of data; the envelope becomes
    /// an `errors` document
    Errors(Vec<ApiError>),
}

/// Per-action inclusion policy supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct IncludePolicy<'a> {
    /// Relationships embedded when the client sends no `include` parameter
    pub default_included: &'a [&'a str],
    /// Force no default inclusion even without an explicit parameter
    pub suppress_default: bool,
}

/// The serializer's output envelope, immutable once produced
pub struct PreprocessResult {
    pub status: u16,
    pub errors: Vec<ApiError>,
    pub document: Option<Document>,
    /// The configured value converters, for the host's output formatter
    pub converters: ConverterRegistry,
}

impl PreprocessResult {
    fn ok(status: u16, document: Option<Document>, config: &QueryConfig) -> Self {
        Self { status, errors: Vec::new(), document, converters: config.converters().clone() }
    }

    fn failed(errors: Vec<ApiError>, config: &QueryConfig) -> Self {
        let status = response_status(&errors);
        let document = Document {
            errors: Some(errors.iter().map(ApiError::to_error_object).collect()),
            ..Default::default()
        };
        Self { status, errors, document: Some(document), converters: config.converters().clone() }
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Process one outbound request end to end.
///
/// `resource_type` is the wire type of the endpoint's resource, resolved
/// externally; its absence surfaces as the serializer's configuration
/// error rather than a crash.
#[allow(clippy::too_many_arguments)]
pub fn process(
    registry: &DescriptorRegistry,
    config: &QueryConfig,
    paths: &dyn PathBuilder,
    params: &QueryParams,
    data: RequestData,
    resource_type: Option<&str>,
    include_policy: IncludePolicy<'_>,
    meta: Option<Map<String, Value>>,
) -> PreprocessResult {
    match data {
        RequestData::NoContent => {
            debug!("no JSON:API content produced, passing through");
            return PreprocessResult::ok(204, None, config);
        }
        RequestData::Errors(errors) => return PreprocessResult::failed(errors, config),
        _ => {}
    }

    let descriptor = resource_type.and_then(|t| registry.get(t));

    let fieldsets = FieldsetContext::parse(params);
    let include = IncludeContext::parse(
        params,
        include_policy.default_included,
        include_policy.suppress_default,
    );
    let pagination = match PaginationContext::parse(params, config) {
        Ok(pagination) => pagination,
        Err(err) => return PreprocessResult::failed(vec![err.to_api_error()], config),
    };

    let (primary, pagination_active) = match data {
        RequestData::NoContent | RequestData::Errors(_) => unreachable!(),
        RequestData::Null => (Primary::Null, false),
        RequestData::One(resource) => (Primary::One(resource), false),
        RequestData::Many(sequence) => {
            let Some(descriptor) = descriptor else {
                return PreprocessResult::failed(
                    vec![crate::error::SerializeError::MissingDescriptor.to_api_error()],
                    config,
                );
            };
            let filtering = FilteringContext::parse(params);
            let sorting = SortingContext::parse(params);

            let applied = apply_filtering(sequence, &filtering, descriptor, config)
                .and_then(|seq| apply_sorting(seq, &sorting, descriptor))
                .and_then(|seq| match &pagination {
                    Some(context) => apply_pagination(seq, context, descriptor),
                    None => Ok(seq),
                });
            match applied {
                Ok(sequence) => (Primary::Many(sequence.enumerate()), pagination.is_some()),
                Err(err) => return PreprocessResult::failed(vec![err.to_api_error()], config),
            }
        }
    };

    let serializer = Serializer::new(registry, paths, &fieldsets, &include);
    let pagination_links = pagination
        .as_ref()
        .filter(|_| pagination_active)
        .map(|context| (context, params));
    match serializer.serialize(primary, descriptor.map(|d| d.as_ref()), pagination_links) {
        Ok(document) => {
            let document = match meta {
                Some(meta) => document.with_meta(meta),
                None => document,
            };
            PreprocessResult::ok(200, Some(document), config)
        }
        Err(err) => PreprocessResult::failed(vec![err.to_api_error()], config),
    }
}
