//! 进程内调用 router，并解析 `{ success, data | code, message, traceId }` 信封

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct ApiReply {
    pub status: StatusCode,
    /// 响应头里回写的请求 id
    pub request_id: Option<String>,
    pub body: Value,
}

async fn dispatch(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.expect("router response")
}

/// 发送请求并返回原始响应，SSE 测试需要直接读 body 流
pub async fn send(app: &Router, method: Method, path: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(path);
    let req = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");
    dispatch(app, req).await
}

/// 带调用方请求 id 的 GET
pub async fn send_traced(app: &Router, path: &str, request_id: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(REQUEST_ID_HEADER, request_id)
        .body(Body::empty())
        .expect("build request");
    dispatch(app, req).await
}

pub async fn read_reply(resp: Response) -> ApiReply {
    let status = resp.status();
    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    ApiReply {
        status,
        request_id,
        body,
    }
}

pub async fn call(app: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let reply = read_reply(send(app, method, path, body).await).await;
    (reply.status, reply.body)
}

/// 成功信封，返回 `data` 便于继续断言
pub fn assert_api_ok(status: StatusCode, body: &Value) -> &Value {
    assert!(status.is_success(), "status {status}, body {body}");
    assert_eq!(body["success"], true, "{body}");
    assert!(body.get("code").is_none(), "{body}");
    &body["data"]
}

/// 错误信封：业务码、对外消息与 traceId 都要在
pub fn assert_api_error(body: &Value, code: &str) {
    assert_eq!(body["success"], false, "{body}");
    assert_eq!(body["code"], code, "{body}");
    assert!(body["message"].is_string(), "{body}");
    assert!(body["traceId"].is_string(), "{body}");
}
