use super::test_support::{MockTransport, TestItem, TestItemDraft, client, page_body};
use super::*;
use crate::error::{GENERIC_ERROR_MESSAGE, STATUS_NO_RESPONSE};
use mesa_shared::protocol::LoginRequest;

#[tokio::test]
async fn login_returns_session_and_token_authorizes_next_request() {
    // 登录成功：mock 返回令牌与用户
    let transport = MockTransport::respond_with(
        200,
        r#"{"token":"tok-1","user":{"id":"1","name":"John","email":"john@example.com"}}"#,
    );
    let api = client(None, transport.clone());

    let auth = api
        .send(&LoginRequest {
            email: "john@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(auth.user.name, "John");
    assert_eq!(auth.token, "tok-1");

    // 登录请求本身不带 Authorization
    let first = &transport.requests()[0];
    assert_eq!(first.url, "https://api.example.com/auth/login");
    assert!(first.header("Authorization").is_none());
    assert_eq!(first.header("Content-Type"), Some("application/json"));

    // 换发令牌后，后续请求全部携带 Bearer
    transport.push_ok(200, &page_body(&[], 1, 0));
    let api = api.with_token(Some(auth.token));
    let _: Page<TestItem> = api.list(&ListQuery::default()).await.unwrap();

    let second = &transport.requests()[1];
    assert_eq!(second.header("Authorization"), Some("Bearer tok-1"));
}

#[tokio::test]
async fn token_cleared_requests_carry_no_authorization_header() {
    let transport = MockTransport::respond_with(200, &page_body(&[], 1, 0));
    let api = client(Some("tok-1"), transport.clone());

    // 清除令牌后构造的任何请求都不再带 Authorization
    let api = api.with_token(None);
    let _: Page<TestItem> = api.list(&ListQuery::default()).await.unwrap();

    assert!(transport.requests()[0].header("Authorization").is_none());
}

#[tokio::test]
async fn list_builds_paged_search_url() {
    let transport = MockTransport::respond_with(200, &page_body(&["a"], 2, 3));
    let api = client(Some("t"), transport.clone());

    let mut query = ListQuery::default();
    query.set_search("foo");
    query.page = 2;

    let page: Page<TestItem> = api.list(&query).await.unwrap();
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 1);

    let req = &transport.requests()[0];
    assert_eq!(
        req.url,
        "https://api.example.com/items?page=2&pageSize=10&search=foo"
    );
    assert_eq!(req.method, HttpMethod::Get);
    assert!(req.body.is_none());
}

#[tokio::test]
async fn get_by_id_decodes_entity_verbatim() {
    let transport =
        MockTransport::respond_with(200, r#"{"id":"42","name":"X","description":"Y"}"#);
    let api = client(Some("t"), transport.clone());

    let item: TestItem = api.get_by_id("42").await.unwrap();
    assert_eq!(item.name, "X");
    assert_eq!(item.description, "Y");
    assert_eq!(
        transport.requests()[0].url,
        "https://api.example.com/items/42"
    );
}

#[tokio::test]
async fn non_2xx_prefers_server_message() {
    let transport = MockTransport::respond_with(403, r#"{"message":"没有权限"}"#);
    let api = client(Some("t"), transport);

    let err = api.get_by_id::<TestItem>("1").await.unwrap_err();
    assert_eq!(err.status_code, 403);
    assert_eq!(err.message, "没有权限");
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn non_2xx_without_message_falls_back_to_generic() {
    let transport = MockTransport::respond_with(500, "");
    let api = client(Some("t"), transport);

    let err = api.get_by_id::<TestItem>("1").await.unwrap_err();
    assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn malformed_success_body_collapses_to_normalized_error() {
    let transport = MockTransport::respond_with(200, "{not json");
    let api = client(Some("t"), transport);

    let err = api.get_by_id::<TestItem>("1").await.unwrap_err();
    assert_eq!(err.status_code, STATUS_NO_RESPONSE);
}

#[tokio::test]
async fn network_failure_propagates_sentinel_status() {
    let transport = MockTransport::default();
    transport.push_err(ApiError::network("请求超时，请检查网络后重试"));
    let api = client(Some("t"), transport);

    let err = api.get_by_id::<TestItem>("1").await.unwrap_err();
    assert_eq!(err.status_code, STATUS_NO_RESPONSE);
    assert!(err.message.contains("超时"));
}

#[tokio::test]
async fn create_posts_draft_and_update_puts_to_id_path() {
    let transport = MockTransport::respond_with(201, r#"{"id":"9","name":"N","description":"D"}"#);
    transport.push_ok(200, r#"{"id":"9","name":"N2","description":"D"}"#);
    let api = client(Some("t"), transport.clone());

    let draft = TestItemDraft {
        name: "N".into(),
        description: "D".into(),
    };
    let created: TestItem = api.create(&draft).await.unwrap();
    assert_eq!(created.id, "9");

    let _: TestItem = api.update("9", &draft).await.unwrap();

    let reqs = transport.requests();
    assert_eq!(reqs[0].method, HttpMethod::Post);
    assert_eq!(reqs[0].url, "https://api.example.com/items");
    assert!(reqs[0].body.as_deref().unwrap().contains("\"name\":\"N\""));
    assert_eq!(reqs[1].method, HttpMethod::Put);
    assert_eq!(reqs[1].url, "https://api.example.com/items/9");
}

#[tokio::test]
async fn delete_accepts_empty_204() {
    let transport = MockTransport::respond_with(204, "");
    let api = client(Some("t"), transport.clone());

    api.delete::<TestItem>("9").await.unwrap();
    assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
}

#[tokio::test]
async fn empty_body_with_unit_response_decodes() {
    // 登出端点：204 空响应体按 () 解码
    let transport = MockTransport::respond_with(204, "");
    let api = client(Some("t"), transport);

    api.send(&mesa_shared::protocol::LogoutRequest)
        .await
        .unwrap();
}
