//! Integration tests for resource operations using wiremock
//!
//! These tests drive the public API against mocked ChartMogul endpoints and
//! check the exact requests sent as well as the hydrated results.

use chartmogul::prelude::*;
use chartmogul::{ReqwestTransport, Response};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH: &str = "Basic dG9rZW46";

fn config_for(server: &MockServer) -> Config {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    Config::new("token")
        .with_base_url(&format!("{}/v1", server.uri()))
        .expect("mock server URI is valid")
}

async fn assert_single_request_without_query(server: &MockServer) {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1, "expected call");
    assert_eq!(requests[0].url.query(), None);
}

/// Test module for CustomerSubscription operations
mod customer_subscription_tests {
    use super::*;

    /// Test cancel (patch) subscription (cancelled_at)
    #[tokio::test]
    async fn test_cancel_subscription() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/v1/import/subscriptions/some_uuid"))
            .and(header("Authorization", AUTH))
            .and(body_json(json!({"cancelled_at": "2016-01-15T00:00:00"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "some_uuid",
                "external_id": "sub_0001",
                "customer_uuid": "cus_f466e33d-ff2b-4a11-8f85-417eb02157a7",
                "plan_uuid": "pl_eed05d54-75b4-431b-adb2-eb6b9e543206",
                "cancellation_dates": ["2016-01-15T00:00:00.000Z"],
                "data_source_uuid": "ds_fef05d54-47b4-431b-aed2-eb6b9e545430"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let cancelled_at = NaiveDate::from_ymd_opt(2016, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let result = CustomerSubscription::cancel(
            &config,
            Args::uuid("some_uuid").data_field("cancelled_at", cancelled_at),
        )
        .get()
        .await
        .expect("cancel should succeed");

        assert_single_request_without_query(&server).await;
        assert_eq!(result.kind(), "CustomerSubscription");
        assert_eq!(result.uuid().as_deref(), Some("some_uuid"));
        let dates = result.get("cancellation_dates").unwrap().as_list().unwrap();
        assert_eq!(
            dates[0].as_datetime().unwrap().naive_utc(),
            cancelled_at
        );
    }

    /// Test modify (patch) subscription (cancellation_dates)
    #[tokio::test]
    async fn test_modify_subscription() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/v1/import/subscriptions/some_uuid"))
            .and(header("Authorization", AUTH))
            .and(body_json(json!({"cancellation_dates": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "some_uuid",
                "external_id": "sub_0001",
                "customer_uuid": "cus_f466e33d-ff2b-4a11-8f85-417eb02157a7",
                "plan_uuid": "pl_eed05d54-75b4-431b-adb2-eb6b9e543206",
                "cancellation_dates": [],
                "data_source_uuid": "ds_fef05d54-47b4-431b-aed2-eb6b9e545430"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let result = CustomerSubscription::modify(
            &config,
            Args::uuid("some_uuid").data_json(json!({"cancellation_dates": []})),
        )
        .get()
        .await
        .expect("modify should succeed");

        assert_single_request_without_query(&server).await;

        let expected = Record::from_fields(
            "CustomerSubscription",
            [
                ("cancellation_dates", FieldValue::List(vec![])),
                (
                    "customer_uuid",
                    "cus_f466e33d-ff2b-4a11-8f85-417eb02157a7".into(),
                ),
                (
                    "data_source_uuid",
                    "ds_fef05d54-47b4-431b-aed2-eb6b9e545430".into(),
                ),
                ("uuid", "some_uuid".into()),
                ("external_id", "sub_0001".into()),
                ("plan_uuid", "pl_eed05d54-75b4-431b-adb2-eb6b9e543206".into()),
            ],
        );
        assert_eq!(result, expected);
    }

    /// Test listing (get) imported subscriptions
    #[tokio::test]
    async fn test_list_imported_subscriptions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/import/customers/some_uuid/subscriptions"))
            .and(header("Authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customer_uuid": "some_uuid",
                "subscriptions": [
                    {
                        "uuid": "sub_e6bc5407-e258-4de0-bb43-61faaf062035",
                        "external_id": "sub_0001",
                        "subscription_set_external_id": "sub_set_0001",
                        "plan_uuid": "pl_eed05d54-75b4-431b-adb2-eb6b9e543206",
                        "data_source_uuid": "ds_fef05d54-47b4-431b-aed2-eb6b9e545430",
                        "cancellation_dates": []
                    }
                ],
                "cursor": "cursor==",
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let result = CustomerSubscription::list_imported(&config, Args::uuid("some_uuid"))
            .get()
            .await
            .expect("list_imported should succeed");

        assert_single_request_without_query(&server).await;
        assert_eq!(result.kind, "CustomerSubscription");
        assert_eq!(result.items_key, "subscriptions");
        assert_eq!(result.meta_str("customer_uuid"), Some("some_uuid"));
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries[0].get_str("subscription_set_external_id"), Some("sub_set_0001"));
        assert!(!result.has_more);
        assert_eq!(result.next_cursor(), None);
    }

    /// Test getting metrics of all subscriptions for a customer
    #[tokio::test]
    async fn test_all() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/customers/some_uuid/subscriptions"))
            .and(header("Authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [
                    {
                        "id": 9306830,
                        "external_id": "sub_0001",
                        "plan": "PRO Plan (10,000 active cust.) monthly",
                        "quantity": 1,
                        "mrr": 70800,
                        "arr": 849600,
                        "status": "active",
                        "billing-cycle": "month",
                        "billing-cycle-count": 1,
                        "start-date": "2015-12-20T08:26:49-05:00",
                        "end-date": "2016-03-20T09:26:49-05:00",
                        "currency": "USD",
                        "currency-sign": "$"
                    }
                ],
                "has_more": false,
                "per_page": 200,
                "page": 1,
                "cursor": "cursor=="
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let result = CustomerSubscription::all(&config, Args::uuid("some_uuid"))
            .get()
            .await
            .expect("all should succeed");

        assert_single_request_without_query(&server).await;
        assert_eq!(result.kind, "CustomerSubscription");
        assert_eq!(result.entries[0].get_str("external_id"), Some("sub_0001"));
        assert_eq!(result.page, Some(1));
        assert_eq!(result.per_page, Some(200));
        assert_eq!(result.cursor.as_deref(), Some("cursor=="));

        let entry = &result.entries[0];
        assert_eq!(entry.uuid().as_deref(), Some("9306830"));
        assert_eq!(entry.get_str("billing_cycle"), Some("month"));
        assert_eq!(entry.get("mrr"), Some(&FieldValue::Int(70800)));
        assert!(entry.get("start_date").unwrap().as_datetime().is_some());
    }

    /// Test that nothing is sent before the deferred result is resolved
    #[tokio::test]
    async fn test_deferred_is_lazy() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/customers/some_uuid/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let pending = CustomerSubscription::all(&config, Args::uuid("some_uuid"));

        let requests = server.received_requests().await.unwrap();
        assert!(requests.is_empty());

        let result = pending.await.unwrap();
        assert!(result.is_empty());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    /// Test several pending calls resolved together
    #[tokio::test]
    async fn test_batched_deferred_calls() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/import/customers/cus_a/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customer_uuid": "cus_a", "subscriptions": [{"uuid": "s1"}], "has_more": false
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/import/customers/cus_b/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customer_uuid": "cus_b", "subscriptions": [{"uuid": "s2"}, {"uuid": "s3"}], "has_more": false
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let pending = vec![
            CustomerSubscription::list_imported(&config, Args::uuid("cus_a")),
            CustomerSubscription::list_imported(&config, Args::uuid("cus_b")),
        ];
        let results = futures::future::join_all(pending.into_iter().map(Deferred::get)).await;

        let lens: Vec<usize> = results.into_iter().map(|r| r.unwrap().len()).collect();
        assert_eq!(lens, vec![1, 2]);
    }
}

/// Test module for error handling
mod error_tests {
    use super::*;

    /// Test non-2xx surfaces as an API error with the vendor payload
    #[tokio::test]
    async fn test_404_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/customers/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 404,
                "message": "Customer not found",
                "param": "uuid"
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let err = Customer::retrieve(&config, Args::uuid("missing"))
            .get()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body().unwrap()["message"], "Customer not found");
        assert_eq!(err.user_message(), "Resource not found.");
    }

    /// Test 422 validation errors from the API
    #[tokio::test]
    async fn test_422_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/plans"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "errors": {"interval_unit": "is not included in the list"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let err = Plan::create(&config, Args::new().with("interval_unit", "fortnight"))
            .get()
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(err.body().unwrap()["errors"]["interval_unit"].is_string());
    }

    /// Test missing path parameter is rejected before any request
    #[tokio::test]
    async fn test_missing_path_param_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let err = CustomerSubscription::cancel(
            &config,
            Args::new().data_field("cancelled_at", "2016-01-15T00:00:00"),
        )
        .get()
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    /// Test connection failures surface as transport errors
    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Mock servers are pooled, so use a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let config = Config::new("token")
            .with_base_url(&format!("http://127.0.0.1:{}/v1", port))
            .unwrap();
        let err = Account::retrieve(&config, Args::new()).get().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.status().is_none());
    }

    /// Test request timeout is reported as a transport error
    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "Acme"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = config_for(&server).with_timeout(Duration::from_millis(50));
        let err = Account::retrieve(&config, Args::new()).get().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Transport(chartmogul::TransportError::Timeout)
        ));
    }

    /// Test strict mode rejects unknown fields
    #[tokio::test]
    async fn test_strict_mode_rejects_unknown_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Acme",
                "currency": "EUR",
                "surprise": true
            })))
            .mount(&server)
            .await;

        let lenient = config_for(&server);
        let account = Account::retrieve(&lenient, Args::new()).get().await.unwrap();
        assert_eq!(account.extra().get("surprise"), Some(&FieldValue::Bool(true)));

        let strict = config_for(&server).with_unknown_fields(UnknownFields::Strict);
        let err = Account::retrieve(&strict, Args::new()).get().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Hydration);
    }
}

/// Test module for other resources and request building
mod resource_tests {
    use super::*;

    /// Test auth header carries the secret key when configured
    #[tokio::test]
    async fn test_secret_key_in_auth_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .and(header("Authorization", "Basic dG9rZW46c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Acme"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server).with_secret("secret");
        let account = Account::retrieve(&config, Args::new()).get().await.unwrap();
        assert_eq!(account.get_str("name"), Some("Acme"));
    }

    /// Test query parameters on list operations
    #[tokio::test]
    async fn test_list_with_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("status", "Active"))
            .and(query_param("per_page", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [{"uuid": "cus_1", "customer-since": "2015-06-09T13:16:00-04:00"}],
                "has_more": false,
                "cursor": "c=="
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let customers = Customer::all(&config, Args::new().with("status", "Active").with("per_page", 50))
            .get()
            .await
            .unwrap();

        assert_eq!(customers.len(), 1);
        assert!(customers.entries[0].get("customer_since").unwrap().as_datetime().is_some());
    }

    /// Test create sends leftover arguments as the body
    #[tokio::test]
    async fn test_create_plan() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/plans"))
            .and(body_json(json!({
                "data_source_uuid": "ds_1",
                "name": "Bronze",
                "interval_count": 1,
                "interval_unit": "month"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "uuid": "pl_1",
                "data_source_uuid": "ds_1",
                "name": "Bronze",
                "interval_count": 1,
                "interval_unit": "month",
                "external_id": "bronze"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let plan = Plan::create(
            &config,
            Args::new()
                .with("data_source_uuid", "ds_1")
                .with("name", "Bronze")
                .with("interval_count", 1)
                .with("interval_unit", "month"),
        )
        .get()
        .await
        .unwrap();

        assert_eq!(plan.uuid().as_deref(), Some("pl_1"));
        assert_eq!(plan.get("interval_count"), Some(&FieldValue::Int(1)));
    }

    /// Test destroy with an empty 204 response
    #[tokio::test]
    async fn test_destroy_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/data_sources/ds_1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        DataSource::destroy(&config, Args::uuid("ds_1"))
            .get()
            .await
            .expect("destroy should succeed");
        assert_single_request_without_query(&server).await;
    }

    /// Test invoice import returns the keyed invoice collection
    #[tokio::test]
    async fn test_invoice_import() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/import/customers/cus_1/invoices"))
            .and(body_json(json!({
                "invoices": [{"external_id": "INV0001", "date": "2015-11-01T00:00:00", "currency": "USD"}]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "customer_uuid": "cus_1",
                "invoices": [{
                    "uuid": "inv_1",
                    "external_id": "INV0001",
                    "date": "2015-11-01T00:00:00.000Z",
                    "currency": "USD",
                    "line_items": [],
                    "transactions": []
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let date = NaiveDate::from_ymd_opt(2015, 11, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let invoice = Record::new("Invoice")
            .with("external_id", "INV0001")
            .with("date", date)
            .with("currency", "USD");
        let invoice_body = invoice.to_body(Invoice::definition().unwrap());

        let result = Invoice::create(
            &config,
            Args::uuid("cus_1").data_json(json!({ "invoices": [invoice_body] })),
        )
        .get()
        .await
        .unwrap();

        assert_eq!(result.items_key, "invoices");
        assert_eq!(result.meta_str("customer_uuid"), Some("cus_1"));
        assert_eq!(result.entries[0].uuid().as_deref(), Some("inv_1"));
    }

    /// Test metrics endpoints keep the summary as collection metadata
    #[tokio::test]
    async fn test_metrics_mrr() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/metrics/mrr"))
            .and(query_param("start-date", "2015-01-01"))
            .and(query_param("end-date", "2015-02-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [
                    {"date": "2015-01-31", "mrr": 30000, "mrr-new-business": 10000},
                    {"date": "2015-02-01", "mrr": 30500, "mrr-new-business": 500}
                ],
                "summary": {"current": 30500, "previous": 30000, "percentage-change": 1.67}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2015, 2, 1).unwrap();
        let result = Metrics::mrr(&config, Args::new().with("start-date", start).with("end-date", end))
            .get()
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.entries[1].get("mrr_new_business"),
            Some(&FieldValue::Int(500))
        );
        let summary = result.meta("summary").unwrap().as_map().unwrap();
        assert_eq!(summary.get("current"), Some(&FieldValue::Int(30500)));
    }

    /// Test tag removal sends a DELETE with a JSON body
    #[tokio::test]
    async fn test_remove_tags() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/customers/cus_1/attributes/tags"))
            .and(body_json(json!({"tags": ["vip"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tags": ["enterprise"]})))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let tags = Tag::remove(&config, Args::uuid("cus_1").data([("tags", vec!["vip"])]))
            .get()
            .await
            .unwrap();

        assert_eq!(
            tags.get("tags"),
            Some(&FieldValue::List(vec!["enterprise".into()]))
        );
    }

    /// Test the generic call path with a caller-supplied registry
    #[tokio::test]
    async fn test_custom_registry_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/widgets/w_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "w_1", "size": 3})))
            .expect(1)
            .mount(&server)
            .await;

        let registry = chartmogul::Registry::from_json(
            r#"{"resources": {"widget": {"name": "Widget",
                "fields": [{"name": "uuid", "type": "string"}, {"name": "size", "type": "integer"}],
                "operations": {"retrieve": {"method": "GET", "path": "/widgets/{uuid}", "response": "single"}}}}}"#,
        )
        .unwrap();

        let config = config_for(&server);
        let response = chartmogul::call(
            &config,
            registry.get("widget").unwrap(),
            "retrieve",
            Args::uuid("w_1"),
        )
        .get()
        .await
        .unwrap();

        let Response::Record(widget) = response else {
            panic!("expected a record");
        };
        assert_eq!(widget.kind(), "Widget");
        assert_eq!(widget.get("size"), Some(&FieldValue::Int(3)));
    }

    /// Test the default transport identifies the crate
    #[tokio::test]
    async fn test_default_user_agent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .and(header(
                "user-agent",
                concat!("chartmogul-rust/", env!("CARGO_PKG_VERSION")),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Acme"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let account = Account::retrieve(&config, Args::new()).get().await.unwrap();
        assert_eq!(account.get_str("name"), Some("Acme"));
    }

    /// Test a retrieved invoice can be sent back with its timestamps untouched
    #[tokio::test]
    async fn test_retrieved_invoice_round_trips_dates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/inv_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "inv_1",
                "external_id": "INV0001",
                "date": "2015-11-01T00:00:00.000Z",
                "due_date": "2015-11-15T00:00:00.000Z",
                "currency": "USD"
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let invoice = Invoice::retrieve(&config, Args::uuid("inv_1")).get().await.unwrap();
        let body = invoice.to_body(Invoice::definition().unwrap());

        assert_eq!(
            body,
            json!({
                "external_id": "INV0001",
                "date": "2015-11-01T00:00:00.000Z",
                "due_date": "2015-11-15T00:00:00.000Z",
                "currency": "USD"
            })
        );
    }

    /// Test a custom transport can be plugged in
    #[tokio::test]
    async fn test_reqwest_transport_from_client() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .and(header("user-agent", "custom-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Acme"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .user_agent("custom-agent")
            .build()
            .unwrap();
        let config = config_for(&server).with_transport(Arc::new(ReqwestTransport::from_client(client)));

        let account = Account::retrieve(&config, Args::new()).get().await.unwrap();
        assert_eq!(account.get_str("name"), Some("Acme"));
    }
}

/// Test module for pagination
mod pagination_tests {
    use super::*;

    /// Test cursor pagination stops when has_more is false
    #[tokio::test]
    async fn test_pages_follow_cursor() {
        let server = MockServer::start().await;

        // Second page
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("cursor", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [{"uuid": "cus_3"}],
                "has_more": false,
                "cursor": "page-3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        // First page
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [{"uuid": "cus_1"}, {"uuid": "cus_2"}],
                "has_more": true,
                "cursor": "page-2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let pages = Customer::pages(&config, "all", Args::new().with("per_page", 2)).unwrap();
        let all = pages.collect_all().await.unwrap();

        let uuids: Vec<String> = all.iter().filter_map(Record::uuid).collect();
        assert_eq!(uuids, vec!["cus_1", "cus_2", "cus_3"]);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    /// Test page-number pagination
    #[tokio::test]
    async fn test_pages_follow_page_numbers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/plans"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "plans": [{"uuid": "pl_2"}],
                "current_page": 2,
                "total_pages": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/plans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "plans": [{"uuid": "pl_1"}],
                "current_page": 1,
                "total_pages": 2
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let mut pages = Plan::pages(&config, "all", Args::new()).unwrap();

        let first = pages.next_page().await.unwrap().unwrap();
        assert_eq!(first.entries[0].uuid().as_deref(), Some("pl_1"));
        let second = pages.next_page().await.unwrap().unwrap();
        assert_eq!(second.entries[0].uuid().as_deref(), Some("pl_2"));
        assert!(pages.next_page().await.unwrap().is_none());
    }
}
