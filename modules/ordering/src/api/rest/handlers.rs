use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, OriginalUri, Path, Query};

use super::dto::{CreateOrderRequest, DateRangeQuery, ItemAvailabilityDto, OrderLineDto};
use super::error::{ApiResult, domain_error_to_problem};
use crate::domain::error::DomainError;
use crate::domain::model::{DateRange, StoreCode};
use crate::domain::service::Service;

fn date_range(query: Result<Query<DateRangeQuery>, QueryRejection>) -> Result<DateRange, DomainError> {
    let Query(query) = query.map_err(|r| DomainError::invalid_input("query", r.body_text()))?;
    query.to_range()
}

/// `GET /{orgCode}/orders?dayFrom&dayTo`
///
/// # Errors
/// A problem response for invalid input and failed store calls.
pub async fn list_orders(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(org_code): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<OrderLineDto>>> {
    let result = async {
        let store = StoreCode::parse(&org_code)?;
        let range = date_range(query)?;
        svc.list_orders(&store, range).await
    }
    .await;

    result
        .map(|lines| Json(lines.into_iter().map(Into::into).collect()))
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

/// `POST /{orgCode}/orders`; answers with the bare order number.
///
/// # Errors
/// A problem response for invalid input, unknown store, date or item, and
/// failed store calls.
pub async fn create_order(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(org_code): Path<String>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<Json<u64>> {
    let result = async {
        let store = StoreCode::parse(&org_code)?;
        let Json(req) = body.map_err(|r| DomainError::invalid_input("body", r.body_text()))?;
        let order = req.to_new_order()?;
        svc.create_order(&store, order).await
    }
    .await;

    result
        .map(|order_no| Json(order_no.0))
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

/// `GET /{orgCode}/items?dayFrom&dayTo`
///
/// # Errors
/// A problem response for invalid input and failed store calls.
pub async fn list_items(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(org_code): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ItemAvailabilityDto>>> {
    let result = async {
        let store = StoreCode::parse(&org_code)?;
        let range = date_range(query)?;
        svc.list_items(&store, range).await
    }
    .await;

    result
        .map(|rows| Json(rows.into_iter().map(Into::into).collect()))
        .map_err(|e| domain_error_to_problem(&e, uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        AvailableItem, CalendarEntry, CatalogItem, ItemCode, OrderDraft, OrderNo, RecordId,
    };
    use crate::domain::repo::OrderingRepository;
    use crate::domain::service::ServiceConfig;
    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use chrono::NaiveDate;
    use serde_json::Value;
    use tower::ServiceExt as _;

    struct StubRepository;

    fn first_of_december() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 12, 1).unwrap()
    }

    #[async_trait]
    impl OrderingRepository for StubRepository {
        async fn calendar_entries(
            &self,
            _store: &StoreCode,
            _range: DateRange,
        ) -> Result<Vec<CalendarEntry>, DomainError> {
            Ok(vec![CalendarEntry {
                id: RecordId::new("recCal"),
                date: first_of_december(),
                store_codes: vec!["1001".to_owned()],
                available: vec![AvailableItem {
                    item_code: ItemCode::new(7),
                    item_name: Some("eggs".to_owned()),
                }],
                placed: vec![],
            }])
        }

        async fn catalog(&self) -> Result<Vec<CatalogItem>, DomainError> {
            Ok(vec![CatalogItem {
                code: ItemCode::new(7),
                name: "eggs".to_owned(),
            }])
        }

        async fn find_store(&self, _store: &StoreCode) -> Result<Option<RecordId>, DomainError> {
            Ok(Some(RecordId::new("recStore")))
        }

        async fn find_calendar_entry(
            &self,
            _store: &StoreCode,
            date: NaiveDate,
        ) -> Result<Option<RecordId>, DomainError> {
            Ok((date == first_of_december()).then(|| RecordId::new("recCal")))
        }

        async fn find_item(&self, _item: ItemCode) -> Result<Option<RecordId>, DomainError> {
            Ok(Some(RecordId::new("recItem")))
        }

        async fn create_order(&self, _draft: &OrderDraft) -> Result<OrderNo, DomainError> {
            Ok(OrderNo(77))
        }
    }

    fn create_test_router() -> Router {
        let service = Arc::new(Service::new(Arc::new(StubRepository), ServiceConfig::default()));
        Router::new()
            .route("/{org_code}/orders", get(list_orders).post(create_order))
            .route("/{org_code}/items", get(list_items))
            .layer(Extension(service))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = create_test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, serde_json::from_slice(&body).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_orders_returns_lines() {
        let (status, _, json) =
            send(get_request("/1001/orders?dayFrom=2020-12-01&dayTo=2020-12-07")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([{
                "targetDate": "2020-12-01",
                "itemCode": 7,
                "itemName": "eggs",
                "pcs": 0,
                "orderNo": null
            }])
        );
    }

    #[tokio::test]
    async fn test_list_items_returns_catalog_rows() {
        let (status, _, json) =
            send(get_request("/1001/items?dayFrom=2020-12-01&dayTo=2020-12-01")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([{"itemCode": 7, "itemName": "eggs", "open": true, "pcs": 0}])
        );
    }

    #[tokio::test]
    async fn test_missing_bound_is_a_problem() {
        let (status, content_type, json) = send(get_request("/1001/items?dayFrom=2020-12-01")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/problem+json"));
        assert_eq!(json["code"], "ORDERING_INVALID_INPUT");
        assert_eq!(json["instance"], "/1001/items");
        assert_eq!(json["errors"][0]["field"], "dayTo");
    }

    #[tokio::test]
    async fn test_reversed_range_is_empty_list() {
        let (status, _, json) =
            send(get_request("/1001/orders?dayFrom=2020-12-07&dayTo=2020-12-01")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_org_code_with_formula_syntax_is_rejected() {
        let (status, _, json) =
            send(get_request("/1001'%29/orders?dayFrom=2020-12-01&dayTo=2020-12-01")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["field"], "orgCode");
    }

    #[tokio::test]
    async fn test_create_order_returns_bare_order_number() {
        let (status, _, json) = send(post_request(
            "/1001/orders",
            r#"{"itemCode": 7, "orderDate": "2020-12-01", "pcs": 3}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!(77));
    }

    #[tokio::test]
    async fn test_create_order_for_unknown_date_is_not_found() {
        let (status, content_type, json) = send(post_request(
            "/1001/orders",
            r#"{"itemCode": 7, "orderDate": "2020-12-02", "pcs": 3}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type.as_deref(), Some("application/problem+json"));
        assert_eq!(json["code"], "ORDERING_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_order_with_bad_body_is_invalid_input() {
        let (status, _, json) =
            send(post_request("/1001/orders", r#"{"itemCode": 7, "pcs": 3}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["field"], "body");

        let (status, _, json) = send(post_request(
            "/1001/orders",
            r#"{"itemCode": 7, "orderDate": "2020-12-01", "pcs": 0}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["field"], "pcs");
    }
}
