//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, sign-in, record CRUD).

mod fixtures;
use fixtures::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_anonymous_sign_in_and_session_lookup() {
    // テスト項目: 匿名サインインで得たトークンでセッションを照会できる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let (uid, token) = server.sign_in_anonymous(&client).await;
    let response = client
        .get(format!("{}/api/auth/session", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["uid"], uid);
}

#[tokio::test]
async fn test_session_lookup_with_bogus_token() {
    // テスト項目: 不正なトークンでのセッション照会は 401 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/auth/session", server.base_url()))
        .bearer_auth("bogus")
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_custom_token_is_single_use() {
    // テスト項目: カスタムトークンは一度だけ使え、二度目は 401 になる
    // given (前提条件):
    let server = TestServer::start_with_tokens(&[("welcome", "coach")]).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/auth/custom-token", server.base_url());

    // when (操作):
    let first = client
        .post(&url)
        .json(&json!({"token": "welcome"}))
        .send()
        .await
        .expect("Failed to send request");
    let second = client
        .post(&url)
        .json(&json!({"token": "welcome"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(first.status(), 201);
    let body: serde_json::Value = first.json().await.expect("Failed to parse JSON");
    assert_eq!(body["uid"], "coach");
    assert_eq!(body["anonymous"], false);
    assert_eq!(second.status(), 401);
}

#[tokio::test]
async fn test_create_record_requires_session() {
    // テスト項目: セッションなしのレコード作成は 401 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(server.collection_url("messages"))
        .json(&json!({"fields": {"text": "hi"}}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_append_then_list_stamps_author() {
    // テスト項目: 追加したレコードが一覧に現れ、authorId は呼び出し元になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (uid, token) = server.sign_in_anonymous(&client).await;

    // when (操作): authorId を偽装して送信する
    let created = client
        .post(server.collection_url("messages"))
        .bearer_auth(&token)
        .json(&json!({"fields": {"text": "hi", "authorId": "someone-else"}}))
        .send()
        .await
        .expect("Failed to send request");
    let listed = client
        .get(server.collection_url("messages"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(created.status(), 201);
    let created: serde_json::Value = created.json().await.expect("Failed to parse JSON");
    let records: serde_json::Value = listed.json().await.expect("Failed to parse JSON");
    let records = records.as_array().expect("array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], created["id"]);
    assert_eq!(records[0]["authorId"], uid);
    assert_eq!(records[0]["fields"]["text"], "hi");
    assert!(records[0]["fields"].get("authorId").is_none());
    assert!(records[0]["createdAt"].is_i64());
}

#[tokio::test]
async fn test_delete_is_restricted_to_author() {
    // テスト項目: 他人は削除できず (403)、作成者は削除できる (204)
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (_, owner) = server.sign_in_anonymous(&client).await;
    let (_, stranger) = server.sign_in_anonymous(&client).await;
    let created: serde_json::Value = client
        .post(server.collection_url("messages"))
        .bearer_auth(&owner)
        .json(&json!({"fields": {"text": "mine"}}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let record_url = format!(
        "{}/{}",
        server.collection_url("messages"),
        created["id"].as_str().expect("id")
    );

    // when (操作):
    let forbidden = client
        .delete(&record_url)
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to send request");
    let still_there = client
        .get(&record_url)
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to send request");
    let deleted = client
        .delete(&record_url)
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    let gone = client
        .get(&record_url)
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(forbidden.status(), 403);
    assert_eq!(still_there.status(), 200);
    assert_eq!(deleted.status(), 204);
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn test_invalid_payloads_are_rejected() {
    // テスト項目: 空のフィールドや不正なコレクション名は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (_, token) = server.sign_in_anonymous(&client).await;

    // when (操作):
    let empty_fields = client
        .post(server.collection_url("messages"))
        .bearer_auth(&token)
        .json(&json!({"fields": {}}))
        .send()
        .await
        .expect("Failed to send request");
    let bad_collection = client
        .post(server.collection_url("bad.name"))
        .bearer_auth(&token)
        .json(&json!({"fields": {"text": "hi"}}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(empty_fields.status(), 400);
    assert_eq!(bad_collection.status(), 400);
}
