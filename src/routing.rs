//! Application router configuration for the JSON API and the HTML pages.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    employee::{
        create_employee_endpoint, edit_employee_endpoint, get_employee_endpoint,
        get_employee_page, get_employees_page, list_employees_endpoint, search_employees_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, edit_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::EMPLOYEES_API,
            post(create_employee_endpoint).get(list_employees_endpoint),
        )
        .route(
            endpoints::SEARCH_EMPLOYEES_API,
            get(search_employees_endpoint),
        )
        .route(
            endpoints::EMPLOYEE_API,
            get(get_employee_endpoint).put(edit_employee_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            get(get_transaction_endpoint).put(edit_transaction_endpoint),
        );

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::EMPLOYEES_VIEW, get(get_employees_page))
        .route(endpoints::EMPLOYEE_VIEW, get(get_employee_page));

    api_routes
        .merge(page_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the employees page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EMPLOYEES_VIEW)
}


#[cfg(test)]
mod api_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        build_router,
        endpoints::{self, format_endpoint},
        test_utils::must_create_test_state,
    };

    fn must_create_test_server() -> TestServer {
        TestServer::try_new(build_router(must_create_test_state()))
            .expect("Could not create test server.")
    }

    async fn must_create_employee(server: &TestServer, employee_id: &str, name: &str) {
        server
            .post(endpoints::EMPLOYEES_API)
            .json(&json!({ "employeeId": employee_id, "name": name }))
            .await
            .assert_status_ok();
    }

    async fn must_create_transaction(
        server: &TestServer,
        employee_id: &str,
        amount: f64,
        transaction_time: &str,
    ) {
        server
            .post(&format_endpoint(endpoints::TRANSACTIONS_API, &[employee_id]))
            .json(&json!({
                "amount": amount,
                "transactionType": "إيداع",
                "transactionTime": transaction_time,
            }))
            .await
            .assert_status_ok();
    }

    async fn must_get_transactions(server: &TestServer, employee_id: &str) -> Vec<Value> {
        server
            .get(&format_endpoint(endpoints::TRANSACTIONS_API, &[employee_id]))
            .await
            .json::<Vec<Value>>()
    }

    #[tokio::test]
    async fn create_duplicate_and_get_employee() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::EMPLOYEES_API)
            .json(&json!({ "employeeId": "100", "name": "سارة" }))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "id": "100", "message": "تم إضافة العميل بنجاح" })
        );

        let response = server
            .post(endpoints::EMPLOYEES_API)
            .json(&json!({ "employeeId": "100", "name": "سارة" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            response.json::<Value>(),
            json!({ "message": "يوجد عميل بنفس الرقم" })
        );

        let response = server
            .get(&format_endpoint(endpoints::EMPLOYEE_API, &["100"]))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["name"], "سارة");
    }

    #[tokio::test]
    async fn create_employee_validates_input() {
        let server = must_create_test_server();

        for body in [
            json!({ "employeeId": "12a", "name": "سارة" }),
            json!({ "employeeId": "", "name": "سارة" }),
            json!({ "employeeId": "-5", "name": "سارة" }),
            json!({ "employeeId": "100", "name": "Sara" }),
            json!({ "employeeId": "100", "name": "سارة", "age": -1 }),
        ] {
            server
                .post(endpoints::EMPLOYEES_API)
                .json(&body)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }

        server
            .get(&format_endpoint(endpoints::EMPLOYEE_API, &["100"]))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::EMPLOYEES_API)
            .content_type("application/json")
            .bytes("{not json".into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(body["message"].is_string());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn update_employee() {
        let server = must_create_test_server();
        must_create_employee(&server, "100", "سارة").await;

        server
            .put(&format_endpoint(endpoints::EMPLOYEE_API, &["100"]))
            .json(&json!({ "name": "سارة محمد", "age": 31 }))
            .await
            .assert_json(&json!({ "id": "100", "message": "تم تحديث العميل بنجاح" }));

        let employee = server
            .get(&format_endpoint(endpoints::EMPLOYEE_API, &["100"]))
            .await
            .json::<Value>();
        assert_eq!(employee["name"], "سارة محمد");
        assert_eq!(employee["age"], 31);
        assert!(employee["updatedAt"].is_string());

        server
            .put(&format_endpoint(endpoints::EMPLOYEE_API, &["100"]))
            .json(&json!({ "name": "Sara" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .put(&format_endpoint(endpoints::EMPLOYEE_API, &["404"]))
            .json(&json!({ "name": "سارة" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_and_search_employees() {
        let server = must_create_test_server();
        must_create_employee(&server, "300", "محمد").await;
        must_create_employee(&server, "100", "سارة").await;
        must_create_employee(&server, "200", "سامي").await;

        let employees = server
            .get(endpoints::EMPLOYEES_API)
            .add_query_param("limit", 2)
            .await
            .json::<Vec<Value>>();
        let ids: Vec<&str> = employees
            .iter()
            .map(|employee| employee["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["100", "200"]);

        let results = server
            .get(endpoints::SEARCH_EMPLOYEES_API)
            .add_query_param("query", "سا")
            .await
            .json::<Vec<Value>>();
        assert_eq!(results.len(), 2);
        assert!(results[0]["joinDate"].is_string());

        server
            .get(endpoints::SEARCH_EMPLOYEES_API)
            .await
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn create_transaction_validates_input() {
        let server = must_create_test_server();
        must_create_employee(&server, "100", "سارة").await;
        let url = format_endpoint(endpoints::TRANSACTIONS_API, &["100"]);

        server
            .post(&url)
            .json(&json!({ "amount": 0, "transactionType": "إيداع" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post(&url)
            .json(&json!({ "amount": -10, "transactionType": "إيداع" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post(&format_endpoint(endpoints::TRANSACTIONS_API, &["999"]))
            .json(&json!({ "amount": 10, "transactionType": "إيداع" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post(&url)
            .json(&json!({ "amount": "10.50", "transactionType": "إيداع", "boxNumber": "4" }))
            .await
            .assert_json(&json!({ "ok": true, "message": "تم إضافة المعاملة بنجاح" }));
    }

    #[tokio::test]
    async fn transactions_are_listed_newest_first() {
        let server = must_create_test_server();
        must_create_employee(&server, "100", "سارة").await;
        must_create_transaction(&server, "100", 1.0, "2025-01-01T10:00:00Z").await;
        must_create_transaction(&server, "100", 3.0, "2025-03-01T10:00:00Z").await;
        must_create_transaction(&server, "100", 2.0, "2025-02-01T10:00:00Z").await;

        let transactions = must_get_transactions(&server, "100").await;

        let times: Vec<&str> = transactions
            .iter()
            .map(|transaction| transaction["transactionTime"].as_str().unwrap())
            .collect();
        assert_eq!(
            times,
            vec!["2025/03/01 10:00", "2025/02/01 10:00", "2025/01/01 10:00"]
        );
    }

    #[tokio::test]
    async fn get_and_update_transaction() {
        let server = must_create_test_server();
        must_create_employee(&server, "100", "سارة").await;
        must_create_employee(&server, "200", "محمد").await;
        must_create_transaction(&server, "100", 5.0, "2025-01-01T10:00:00Z").await;
        let transactions = must_get_transactions(&server, "100").await;
        let document_id = transactions[0]["documentId"].as_str().unwrap();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION_API, &["100", document_id]))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["amount"], 5.0);

        server
            .get(&format_endpoint(endpoints::TRANSACTION_API, &["200", document_id]))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get(&format_endpoint(endpoints::TRANSACTION_API, &["100", "missing"]))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .put(&format_endpoint(endpoints::TRANSACTION_API, &["100", document_id]))
            .json(&json!({
                "amount": 7.25,
                "transactionType": "سحب",
                "transactionTime": "2025-04-01T08:00:00Z",
            }))
            .await
            .assert_json(&json!({ "ok": true, "message": "تم تحديث المعاملة بنجاح" }));

        let updated = server
            .get(&format_endpoint(endpoints::TRANSACTION_API, &["100", document_id]))
            .await
            .json::<Value>();
        assert_eq!(updated["amount"], 7.25);
        assert_eq!(updated["transactionType"], "سحب");
        assert_eq!(updated["transactionTime"], "2025/04/01 08:00");
        assert_eq!(updated["employeeId"], "100");

        server
            .put(&format_endpoint(endpoints::TRANSACTION_API, &["100", "missing"]))
            .json(&json!({ "amount": 1, "transactionType": "سحب" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_across_requests() {
        let state = must_create_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute_batch(
                    "INSERT INTO employee (employee_id, name, created_at)
                    VALUES ('100', 'سارة', 'أمس'), ('200', 'سامي', NULL);
                    INSERT INTO employee_transaction (employee_id, amount, transaction_time)
                    VALUES ('200', 5, 'x');",
                )
                .unwrap();
        }
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        for _ in 0..2 {
            let response = server.get(endpoints::EMPLOYEES_API).await;
            response.assert_status_ok();
            assert_eq!(response.json::<Vec<Value>>().len(), 1);

            let response = server
                .get(endpoints::SEARCH_EMPLOYEES_API)
                .add_query_param("query", "سا")
                .await;
            response.assert_status_ok();
            assert_eq!(response.json::<Vec<Value>>().len(), 1);

            server
                .get(&format_endpoint(endpoints::TRANSACTIONS_API, &["200"]))
                .await
                .assert_json(&json!([]));
        }

        server
            .get(&format_endpoint(endpoints::EMPLOYEE_API, &["100"]))
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        server
            .get(&format_endpoint(endpoints::EMPLOYEE_API, &["200"]))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn pages_render_and_unknown_paths_get_404() {
        let server = must_create_test_server();
        must_create_employee(&server, "100", "سارة").await;

        server.get(endpoints::EMPLOYEES_VIEW).await.assert_status_ok();
        server
            .get(&format_endpoint(endpoints::EMPLOYEE_VIEW, &["100"]))
            .await
            .assert_status_ok();
        server
            .get(&format_endpoint(endpoints::EMPLOYEE_VIEW, &["404"]))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/no/such/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
