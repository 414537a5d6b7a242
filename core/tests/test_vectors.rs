//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error kinds. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use events_core::{
    ApiError, Category, CategoryInput, CreateEventData, Event, EventFilter, EventsClient,
    HttpMethod, HttpRequest, HttpResponse, UpdateEventData,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000/api";

fn client() -> EventsClient {
    EventsClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_query: Vec<(String, String)> = expected["query"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.query, expected_query, "{name}: query");

    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
        body => {
            let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&actual, body, "{name}: body");
        }
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Compare a parse outcome with either `expected_result` or `expected_error`.
fn check_outcome<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: PartialEq + std::fmt::Debug + serde::de::DeserializeOwned,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        assert_eq!(
            format!("{:?}", err.kind()),
            expected_error.as_str().unwrap(),
            "{name}: error kind"
        );
    } else {
        let actual = result.unwrap();
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(actual, expected, "{name}: parsed result");
    }
}

fn id(case: &Value) -> &str {
    case["input_id"].as_str().unwrap()
}

#[test]
fn category_test_vectors() {
    let raw = include_str!("../../test-vectors/categories.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let response = simulated(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                check_request(name, &c.build_list_categories(), expected_req);
                check_outcome::<Vec<Category>>(name, case, c.parse_list_categories(response));
            }
            "get" => {
                check_request(name, &c.build_get_category(id(case)), expected_req);
                check_outcome::<Category>(name, case, c.parse_get_category(response));
            }
            "create" => {
                let input: CategoryInput = serde_json::from_value(case["input"].clone()).unwrap();
                check_request(name, &c.build_create_category(&input).unwrap(), expected_req);
                check_outcome::<Category>(name, case, c.parse_create_category(response));
            }
            "update" => {
                let input: CategoryInput = serde_json::from_value(case["input"].clone()).unwrap();
                let req = c.build_update_category(id(case), &input).unwrap();
                check_request(name, &req, expected_req);
                check_outcome::<Category>(name, case, c.parse_update_category(response));
            }
            "delete" => {
                check_request(name, &c.build_delete_category(id(case)), expected_req);
                check_outcome::<()>(name, case, c.parse_delete_category(response));
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}

#[test]
fn event_test_vectors() {
    let raw = include_str!("../../test-vectors/events.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let response = simulated(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                let filter = EventFilter {
                    search: case["filter"]["search"].as_str().map(str::to_string),
                    category: case["filter"]["category"].as_str().map(str::to_string),
                };
                check_request(name, &c.build_list_events(&filter), expected_req);
                check_outcome::<Vec<Event>>(name, case, c.parse_list_events(response));
            }
            "get" => {
                check_request(name, &c.build_get_event(id(case)), expected_req);
                check_outcome::<Event>(name, case, c.parse_get_event(response));
            }
            "create" => {
                let input: CreateEventData =
                    serde_json::from_value(case["input"].clone()).unwrap();
                check_request(name, &c.build_create_event(&input).unwrap(), expected_req);
                check_outcome::<Event>(name, case, c.parse_create_event(response));
            }
            "update" => {
                let input: UpdateEventData =
                    serde_json::from_value(case["input"].clone()).unwrap();
                let req = c.build_update_event(id(case), &input).unwrap();
                check_request(name, &req, expected_req);
                check_outcome::<Event>(name, case, c.parse_update_event(response));
            }
            "delete" => {
                check_request(name, &c.build_delete_event(id(case)), expected_req);
                check_outcome::<()>(name, case, c.parse_delete_event(response));
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}
