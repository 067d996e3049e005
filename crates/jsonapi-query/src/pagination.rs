//! Pagination interpreter.
//!
//! Page numbers default to 0 when absent or unparsable. The page size comes
//! from configuration unless the client overrides it; an override above the
//! configured maximum is a client error that aborts processing. Before
//! skip/take, a deferred sequence with no ordering gets a deterministic
//! default ordering by the resource's id field - materialized sequences are
//! never auto-ordered and keep their arrival order.

use tracing::debug;

use jsonapi_document::ResourceDescriptor;

use crate::convert::QueryConfig;
use crate::error::QueryError;
use crate::params::{QueryParams, prefix};
use crate::predicate::build_selector;
use crate::sequence::{Sequence, SequenceOp, SortDirection, SortKey};

/// Request-scoped pagination context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationContext {
    pub page: usize,
    pub size: usize,
}

impl PaginationContext {
    /// Parse the page parameters. Returns `None` (pagination inactive) when
    /// the request carries no page parameters and the configuration does
    /// not paginate by default.
    pub fn parse(
        params: &QueryParams,
        config: &QueryConfig,
    ) -> Result<Option<Self>, QueryError> {
        let number = params.get(prefix::PAGE_NUMBER);
        let size = params.get(prefix::PAGE_SIZE);
        if number.is_none() && size.is_none() && !config.paginate_by_default {
            return Ok(None);
        }

        let page = number.and_then(|raw| raw.parse().ok()).unwrap_or(0);
        let size = match size.and_then(|raw| raw.parse::<usize>().ok()) {
            Some(requested) if requested > config.max_page_size => {
                return Err(QueryError::PageSizeExceeded {
                    requested,
                    max: config.max_page_size,
                });
            }
            Some(requested) => requested,
            None => config.default_page_size,
        };
        Ok(Some(Self { page, size }))
    }

    /// Link query-string for the first page
    pub fn first_page_link(&self, params: &QueryParams) -> String {
        params.query_string_with_page(0)
    }

    /// Link query-string for the next page; always present, even past the
    /// last page.
    pub fn next_page_link(&self, params: &QueryParams) -> String {
        params.query_string_with_page(self.page.saturating_add(1))
    }

    /// Link query-string for the previous page; omitted on page 0
    pub fn previous_page_link(&self, params: &QueryParams) -> Option<String> {
        (self.page > 0).then(|| params.query_string_with_page(self.page - 1))
    }
}

/// Apply pagination: default id ordering for unordered deferred sequences,
/// then skip(page * size) and take(size).
pub fn apply_pagination(
    sequence: Sequence,
    context: &PaginationContext,
    descriptor: &ResourceDescriptor,
) -> Result<Sequence, QueryError> {
    let mut sequence = sequence;
    if sequence.is_deferred() && !sequence.is_ordered() {
        debug!(resource_type = descriptor.resource_type(), "applying default id ordering");
        let selector = build_selector(descriptor, "id").map_err(|_| {
            QueryError::DefaultOrderingUnavailable(descriptor.resource_type().to_string())
        })?;
        let key = SortKey { selector, direction: SortDirection::Ascending };
        sequence = sequence.apply(SequenceOp::OrderBy(key))?;
    }
    // page numbers are client input; an offset past usize::MAX is just an
    // empty page, never a wraparound
    let offset = context.page.checked_mul(context.size).unwrap_or(usize::MAX);
    sequence = sequence.apply(SequenceOp::Skip(offset))?;
    sequence.apply(SequenceOp::Take(context.size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_document::{FieldKind, Resource, ResourceFields};
    use serde_json::{Value, json};

    struct Entry {
        id: i64,
    }

    impl Resource for Entry {
        fn resource_name(&self) -> &'static str {
            "Entry"
        }

        fn field(&self, name: &str) -> Option<Value> {
            (name == "Id").then(|| json!(self.id))
        }
    }

    impl ResourceFields for Entry {
        const NAME: &'static str = "Entry";
        const ID_KIND: FieldKind = FieldKind::Integer;

        fn fields() -> &'static [(&'static str, FieldKind)] {
            &[]
        }
    }

    fn descriptor() -> ResourceDescriptor {
        ResourceDescriptor::for_type::<Entry>().build().unwrap()
    }

    fn entries() -> Vec<Entry> {
        [5, 3, 1, 4, 2].into_iter().map(|id| Entry { id }).collect()
    }

    fn ids(sequence: Sequence) -> Vec<i64> {
        sequence
            .enumerate()
            .iter()
            .map(|e| e.field("Id").unwrap().as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_inactive_without_page_params() {
        let config = QueryConfig::default();
        let context = PaginationContext::parse(&QueryParams::new(), &config).unwrap();
        assert_eq!(context, None);

        let config = config.with_default_pagination(true);
        let context = PaginationContext::parse(&QueryParams::new(), &config).unwrap();
        assert_eq!(context, Some(PaginationContext { page: 0, size: 10 }));
    }

    #[test]
    fn test_unparsable_page_defaults_to_zero() {
        let params = QueryParams::from_pairs([("page.number", "banana")]);
        let context = PaginationContext::parse(&params, &QueryConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(context.page, 0);
    }

    #[test]
    fn test_size_above_cap_is_client_error() {
        let params = QueryParams::from_pairs([("page.size", "50")]);
        let config = QueryConfig::default().with_max_page_size(20);
        let err = PaginationContext::parse(&params, &config).unwrap_err();
        assert_eq!(err, QueryError::PageSizeExceeded { requested: 50, max: 20 });
    }

    #[test]
    fn test_deferred_gets_default_id_ordering() {
        let context = PaginationContext { page: 0, size: 3 };
        let seq = Sequence::deferred_from(entries());
        let page = apply_pagination(seq, &context, &descriptor()).unwrap();
        assert_eq!(ids(page), vec![1, 2, 3]);
    }

    #[test]
    fn test_materialized_keeps_arrival_order() {
        let context = PaginationContext { page: 0, size: 3 };
        let seq = Sequence::materialized_from(entries());
        let page = apply_pagination(seq, &context, &descriptor()).unwrap();
        assert_eq!(ids(page), vec![5, 3, 1]);
    }

    #[test]
    fn test_pages_partition_the_sequence() {
        let context = |page| PaginationContext { page, size: 2 };
        let mut seen = Vec::new();
        for page in 0..3 {
            let seq = Sequence::deferred_from(entries());
            let chunk = apply_pagination(seq, &context(page), &descriptor()).unwrap();
            seen.extend(ids(chunk));
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_huge_page_number_yields_empty_page() {
        let params = QueryParams::from_pairs([("page.number", usize::MAX.to_string())]);
        let context = PaginationContext::parse(&params, &QueryConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(context.page, usize::MAX);

        for seq in [Sequence::deferred_from(entries()), Sequence::materialized_from(entries())] {
            let page = apply_pagination(seq, &context, &descriptor()).unwrap();
            assert!(ids(page).is_empty());
        }

        // the next-page link saturates instead of wrapping to page 0
        assert_eq!(
            context.next_page_link(&params),
            format!("?page[number]={}", usize::MAX)
        );
    }

    #[test]
    fn test_links() {
        let params = QueryParams::from_pairs([("page.number", "2"), ("filter.age", "30")]);
        let context = PaginationContext { page: 2, size: 10 };
        assert_eq!(context.first_page_link(&params), "?page[number]=0&filter[age]=30");
        assert_eq!(context.next_page_link(&params), "?page[number]=3&filter[age]=30");
        assert_eq!(
            context.previous_page_link(&params),
            Some("?page[number]=1&filter[age]=30".to_string())
        );

        let first = PaginationContext { page: 0, size: 10 };
        assert_eq!(first.previous_page_link(&params), None);
    }
}
