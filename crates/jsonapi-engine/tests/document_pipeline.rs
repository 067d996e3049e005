//! End-to-end tests over the full pipeline: descriptors, query
//! interpretation, graph serialization and deserialization.

use std::sync::Arc;

use serde_json::{Value, json};

use jsonapi_document::{
    DescriptorRegistry, FieldKind, Related, Resource, ResourceDescriptor, ResourceFields,
};
use jsonapi_engine::deserializer::{Flattened, deserialize};
use jsonapi_engine::paths::{RouteInfo, RoutePathBuilder};
use jsonapi_engine::pipeline::{IncludePolicy, RequestData, process};
use jsonapi_query::{QueryConfig, QueryParams, Sequence};

#[derive(Clone)]
struct Person {
    id: i64,
    first_name: String,
    last_name: String,
    age: i64,
    employer: Option<Arc<Company>>,
}

struct Company {
    id: i64,
    name: String,
}

impl Resource for Person {
    fn resource_name(&self) -> &'static str {
        "Person"
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "Id" => Some(json!(self.id)),
            "FirstName" => Some(json!(self.first_name)),
            "LastName" => Some(json!(self.last_name)),
            "Age" => Some(json!(self.age)),
            _ => None,
        }
    }

    fn related(&self, name: &str) -> Option<Related<'_>> {
        (name == "Employer").then(|| {
            Related::ToOne(self.employer.as_deref().map(|c| c as &dyn Resource))
        })
    }
}

impl ResourceFields for Person {
    const NAME: &'static str = "Person";
    const ID_KIND: FieldKind = FieldKind::Integer;

    fn fields() -> &'static [(&'static str, FieldKind)] {
        &[
            ("FirstName", FieldKind::String),
            ("LastName", FieldKind::String),
            ("Age", FieldKind::Integer),
        ]
    }

    fn relationships() -> &'static [(&'static str, bool, &'static str)] {
        &[("Employer", false, "Company")]
    }
}

impl Resource for Company {
    fn resource_name(&self) -> &'static str {
        "Company"
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "Id" => Some(json!(self.id)),
            "Name" => Some(json!(self.name)),
            _ => None,
        }
    }
}

impl ResourceFields for Company {
    const NAME: &'static str = "Company";
    const ID_KIND: FieldKind = FieldKind::Integer;

    fn fields() -> &'static [(&'static str, FieldKind)] {
        &[("Name", FieldKind::String)]
    }
}

fn registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    registry.register(
        ResourceDescriptor::for_type::<Person>()
            .resource_type("people")
            .build()
            .unwrap(),
    );
    registry.register(
        ResourceDescriptor::for_type::<Company>()
            .resource_type("companies")
            .build()
            .unwrap(),
    );
    registry
}

fn paths() -> RoutePathBuilder {
    RoutePathBuilder::new(RouteInfo::new("/api", "people/{id}"))
}

fn person(id: i64, first: &str, last: &str, age: i64) -> Person {
    Person {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        age,
        employer: None,
    }
}

fn crowd() -> Vec<Person> {
    // 100 people, exactly 4 of them age 30
    (1..=100)
        .map(|id| {
            let age = if id % 25 == 0 { 30 } else { 20 + (id % 7) };
            person(id, "First", "Last", age)
        })
        .collect()
}

fn run(params: QueryParams, data: RequestData) -> Value {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let result = process(
        &registry(),
        &QueryConfig::default(),
        &paths(),
        &params,
        data,
        Some("people"),
        IncludePolicy::default(),
        None,
    );
    assert_eq!(result.status, 200, "errors: {:?}", result.errors);
    serde_json::to_value(result.document.unwrap()).unwrap()
}

#[test]
fn scenario_a_attribute_dashing() {
    let ann = person(1, "Ann", "Lee", 30);
    let value = run(QueryParams::new(), RequestData::One(Arc::new(ann)));

    assert_eq!(value["data"]["id"], json!("1"));
    assert_eq!(
        value["data"]["attributes"],
        json!({"first-name": "Ann", "last-name": "Lee", "age": 30})
    );
}

#[test]
fn scenario_b_filter_preserves_relative_order() {
    let params = QueryParams::from_pairs([("filter[age]", "30")]);
    let value = run(params, RequestData::Many(Sequence::materialized_from(crowd())));

    let data = value["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    let ids: Vec<&str> = data.iter().map(|o| o["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["25", "50", "75", "100"]);
}

#[test]
fn scenario_c_sort_descending_with_tiebreak() {
    let people = vec![
        person(2, "A", "A", 30),
        person(1, "B", "B", 40),
        person(3, "C", "C", 30),
    ];
    let params = QueryParams::from_pairs([("sort", "-age,id")]);
    let value = run(params, RequestData::Many(Sequence::deferred_from(people)));

    let ids: Vec<&str> = value["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn scenario_d_page_size_over_cap_is_client_error() {
    let params = QueryParams::from_pairs([("page[size]", "50")]);
    let config = QueryConfig::default().with_max_page_size(20);
    let result = process(
        &registry(),
        &config,
        &paths(),
        &params,
        RequestData::Many(Sequence::deferred_from(crowd())),
        Some("people"),
        IncludePolicy::default(),
        None,
    );

    assert_eq!(result.status, 400);
    let value = serde_json::to_value(result.document.unwrap()).unwrap();
    assert!(value.get("data").is_none());
    assert_eq!(value["errors"][0]["code"], json!("page-size-exceeded"));
}

#[test]
fn scenario_e_data_and_errors_rejected_before_flattening() {
    let document = json!({
        "data": {"id": "1", "type": "people"},
        "errors": [{"title": "boom"}]
    });
    let err = deserialize(&document, &registry()).unwrap_err();
    assert_eq!(err.to_api_error().title, "invalid JSON:API request content");
}

#[test]
fn empty_contexts_are_noops_for_both_flavors() {
    let baseline: Vec<&str> = vec!["5", "3", "1"];
    let people = vec![person(5, "E", "E", 50), person(3, "C", "C", 30), person(1, "A", "A", 10)];

    for sequence in [
        Sequence::deferred_from(people.clone()),
        Sequence::materialized_from(people.clone()),
    ] {
        let value = run(QueryParams::new(), RequestData::Many(sequence));
        let ids: Vec<&str> = value["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, baseline, "same elements, same order");
        assert!(value.get("links").is_none(), "no pagination context, no links");
    }
}

#[test]
fn included_is_idempotent_across_paths() {
    let acme = Arc::new(Company { id: 7, name: "Acme".to_string() });
    let people = vec![
        Person { employer: Some(Arc::clone(&acme)), ..person(1, "Ann", "Lee", 30) },
        Person { employer: Some(Arc::clone(&acme)), ..person(2, "Bob", "Ng", 41) },
    ];
    let params = QueryParams::from_pairs([("include", "employer")]);
    let value = run(params, RequestData::Many(Sequence::deferred_from(people)));

    let included = value["included"].as_array().unwrap();
    assert_eq!(included.len(), 1);
    assert_eq!(included[0]["type"], json!("companies"));
    assert_eq!(included[0]["id"], json!("7"));
    assert_eq!(
        value["data"][0]["relationships"]["employer"]["data"],
        json!({"id": "7", "type": "companies"})
    );
}

#[test]
fn pagination_partitions_without_loss() {
    let total: usize = 10;
    let size = 3;
    let pages = total.div_ceil(size);

    let mut collected: Vec<String> = Vec::new();
    for page in 0..pages {
        let params = QueryParams::from_pairs([
            ("page[number]", page.to_string()),
            ("page[size]", size.to_string()),
        ]);
        let people: Vec<Person> =
            (1..=total).rev().map(|id| person(id as i64, "F", "L", 30)).collect();
        let value = run(params, RequestData::Many(Sequence::deferred_from(people)));

        let data = value["data"].as_array().unwrap();
        collected.extend(data.iter().map(|o| o["id"].as_str().unwrap().to_string()));

        // next is always present, prev only past page 0
        assert!(value["links"]["next"].is_string());
        assert_eq!(value["links"].get("prev").is_some(), page > 0);
    }

    // deferred sequences get default id ordering before skip/take
    let expected: Vec<String> = (1..=total).map(|id| id.to_string()).collect();
    assert_eq!(collected, expected);
}

#[test]
fn serialize_then_deserialize_round_trips() {
    let acme = Arc::new(Company { id: 7, name: "Acme".to_string() });
    let ann = Person { employer: Some(acme), ..person(1, "Ann", "Lee", 30) };
    let value = run(QueryParams::new(), RequestData::One(Arc::new(ann.clone())));

    let Flattened::One(flat) = deserialize(&value, &registry()).unwrap() else {
        panic!("expected a single resource");
    };

    assert_eq!(flat.id.as_deref(), Some("1"));
    assert_eq!(flat.fields["FirstName"], json!(ann.first_name));
    assert_eq!(flat.fields["LastName"], json!(ann.last_name));
    assert_eq!(flat.fields["Age"], json!(ann.age));
    assert_eq!(flat.fields["Employer"], json!({"Id": "7"}));
}

#[test]
fn default_include_policy_with_override() {
    let acme = Arc::new(Company { id: 7, name: "Acme".to_string() });
    let ann = Person { employer: Some(acme), ..person(1, "Ann", "Lee", 30) };

    // no explicit parameter: per-action default applies
    let result = process(
        &registry(),
        &QueryConfig::default(),
        &paths(),
        &QueryParams::new(),
        RequestData::One(Arc::new(ann.clone())),
        Some("people"),
        IncludePolicy { default_included: &["employer"], suppress_default: false },
        None,
    );
    let value = serde_json::to_value(result.document.unwrap()).unwrap();
    assert_eq!(value["included"].as_array().unwrap().len(), 1);

    // suppressed default: nothing embedded even without a parameter
    let result = process(
        &registry(),
        &QueryConfig::default(),
        &paths(),
        &QueryParams::new(),
        RequestData::One(Arc::new(ann)),
        Some("people"),
        IncludePolicy { default_included: &["employer"], suppress_default: true },
        None,
    );
    let value = serde_json::to_value(result.document.unwrap()).unwrap();
    assert!(value.get("included").is_none());
}
