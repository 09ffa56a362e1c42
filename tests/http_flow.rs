use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Method, Request, StatusCode,
        header::{CONTENT_TYPE, LOCATION},
    },
    response::Response,
};
use tower::ServiceExt;

use postdeck::application::posts::PostsManager;
use postdeck::domain::posts::{Post, PostId};
use postdeck::infra::http::{AppState, build_router};
use postdeck::infra::store::MemoryPostStore;

fn seeded() -> Vec<Post> {
    vec![
        Post {
            id: PostId::Number(1),
            title: "First".to_string(),
            content: "one".to_string(),
        },
        Post {
            id: PostId::Number(2),
            title: "Second".to_string(),
            content: "two".to_string(),
        },
    ]
}

async fn app(posts: Vec<Post>) -> (Router, Arc<PostsManager>) {
    let manager = PostsManager::mount(Arc::new(MemoryPostStore::with_posts(posts))).await;
    (build_router(AppState::new(manager.clone())), manager)
}

async fn send(router: &Router, method: Method, uri: &str, form: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    router
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("router should respond")
}

async fn page(router: &Router) -> String {
    let response = send(router, Method::GET, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 page")
}

fn assert_redirects_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

#[tokio::test]
async fn page_lists_posts_and_empty_state() {
    let (router, _) = app(seeded()).await;
    let html = page(&router).await;
    assert!(html.contains("First"));
    assert!(html.contains("Second"));
    assert!(html.contains("Add Post"));
    assert!(!html.contains("No posts found."));

    let (router, _) = app(Vec::new()).await;
    let html = page(&router).await;
    assert!(html.contains("No posts found."));
}

#[tokio::test]
async fn create_flow_adds_post_and_hides_editor() {
    let (router, manager) = app(seeded()).await;

    let response = send(&router, Method::POST, "/editor/new", None).await;
    assert_redirects_home(&response);
    assert!(page(&router).await.contains("Add New Post"));

    let response = send(
        &router,
        Method::POST,
        "/editor/save",
        Some("title=Third&content=three"),
    )
    .await;
    assert_redirects_home(&response);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.posts.len(), 3);
    assert_eq!(snapshot.posts[2].title, "Third");
    assert!(!snapshot.editor.visible);
    assert!(!page(&router).await.contains("Add New Post"));
}

#[tokio::test]
async fn edit_flow_updates_target_post() {
    let (router, manager) = app(seeded()).await;

    let response = send(&router, Method::POST, "/posts/2/edit", None).await;
    assert_redirects_home(&response);
    let html = page(&router).await;
    assert!(html.contains("Edit Post"));
    assert!(html.contains("Update Post"));

    let response = send(
        &router,
        Method::POST,
        "/editor/save",
        Some("title=Renamed&content=two"),
    )
    .await;
    assert_redirects_home(&response);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.posts[1].title, "Renamed");
    assert_eq!(snapshot.posts[0].title, "First");
}

#[tokio::test]
async fn blank_save_keeps_editor_open() {
    let (router, manager) = app(seeded()).await;
    send(&router, Method::POST, "/editor/new", None).await;

    let response = send(
        &router,
        Method::POST,
        "/editor/save",
        Some("title=%20%20&content=body"),
    )
    .await;
    assert_redirects_home(&response);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.posts.len(), 2);
    assert!(snapshot.editor.visible);
    assert!(snapshot.status.last_error.is_none());
}

#[tokio::test]
async fn cancel_closes_editor_without_store_calls() {
    let (router, manager) = app(seeded()).await;
    send(&router, Method::POST, "/posts/1/edit", None).await;

    let response = send(&router, Method::POST, "/editor/close", None).await;
    assert_redirects_home(&response);

    let snapshot = manager.snapshot().await;
    assert!(!snapshot.editor.visible);
    assert_eq!(snapshot.posts, seeded());
}

#[tokio::test]
async fn delete_removes_post() {
    let (router, manager) = app(seeded()).await;

    let response = send(&router, Method::POST, "/posts/1/delete", None).await;
    assert_redirects_home(&response);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.posts.len(), 1);
    assert_eq!(snapshot.posts[0].id, PostId::Number(2));
}

#[tokio::test]
async fn editing_unknown_post_is_not_found() {
    let (router, manager) = app(seeded()).await;

    let response = send(&router, Method::POST, "/posts/99/edit", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!manager.snapshot().await.editor.visible);
}

#[tokio::test]
async fn health_returns_no_content() {
    let (router, _) = app(Vec::new()).await;
    let response = send(&router, Method::GET, "/_health", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn numeric_looking_text_ids_resolve_to_their_rows() {
    let rows = vec![
        Post {
            id: PostId::Text("42".to_string()),
            title: "Answer".to_string(),
            content: "text key".to_string(),
        },
        Post {
            id: PostId::Text("007".to_string()),
            title: "Padded".to_string(),
            content: "leading zeros".to_string(),
        },
    ];
    let (router, manager) = app(rows).await;

    let response = send(&router, Method::POST, "/posts/42/edit", None).await;
    assert_redirects_home(&response);
    let editor = manager.snapshot().await.editor;
    assert!(editor.visible);
    assert_eq!(editor.target_id(), Some(&PostId::Text("42".to_string())));

    let response = send(&router, Method::POST, "/posts/007/delete", None).await;
    assert_redirects_home(&response);
    let posts = manager.snapshot().await.posts;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, PostId::Text("42".to_string()));
}

#[tokio::test]
async fn deleting_unknown_post_is_not_found() {
    let (router, manager) = app(seeded()).await;

    let response = send(&router, Method::POST, "/posts/99/delete", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(manager.snapshot().await.posts, seeded());
}

#[tokio::test]
async fn save_after_cancel_writes_nothing() {
    let (router, manager) = app(seeded()).await;
    send(&router, Method::POST, "/posts/1/edit", None).await;
    send(&router, Method::POST, "/editor/close", None).await;

    let response = send(
        &router,
        Method::POST,
        "/editor/save",
        Some("title=Stale&content=resubmit"),
    )
    .await;
    assert_redirects_home(&response);

    let snapshot = manager.snapshot().await;
    assert_eq!(snapshot.posts, seeded());
    assert!(!snapshot.editor.visible);
}
