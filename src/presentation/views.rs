use crate::application::error::{ErrorReport, HttpError};
use crate::application::posts::{EditorState, PostsSnapshot};
use crate::domain::posts::Post;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

const OPEN_LABEL: &str = "Add Post";
const OPEN_LABEL_LOADING: &str = "Loading...";
const SUBMIT_LABEL_SAVING: &str = "Saving...";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let view = ErrorPageView::not_found();
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

pub struct PostCardView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub edit_action: String,
    pub delete_action: String,
}

impl From<&Post> for PostCardView {
    fn from(post: &Post) -> Self {
        let id = post.id.to_string();
        Self {
            edit_action: format!("/posts/{id}/edit"),
            delete_action: format!("/posts/{id}/delete"),
            title: post.title.clone(),
            content: post.content.clone(),
            id,
        }
    }
}

/// The create/edit modal.
pub struct EditorView {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub title_draft: String,
    pub content_draft: String,
    pub error: Option<String>,
    pub busy: bool,
}

impl EditorView {
    fn new(editor: &EditorState, error: Option<String>, busy: bool) -> Self {
        let (heading, submit_label) = if editor.is_editing() {
            ("Edit Post", "Update Post")
        } else {
            ("Add New Post", "Add Post")
        };
        Self {
            heading,
            submit_label: if busy { SUBMIT_LABEL_SAVING } else { submit_label },
            title_draft: editor.title_draft.clone(),
            content_draft: editor.content_draft.clone(),
            error,
            busy,
        }
    }
}

pub struct PostsPageView {
    pub posts: Vec<PostCardView>,
    pub editor: Option<EditorView>,
    pub loading: bool,
    pub open_label: &'static str,
}

impl From<PostsSnapshot> for PostsPageView {
    fn from(snapshot: PostsSnapshot) -> Self {
        let PostsSnapshot {
            posts,
            editor,
            status,
        } = snapshot;

        let editor = editor
            .visible
            .then(|| EditorView::new(&editor, status.last_error, status.loading));

        Self {
            posts: posts.iter().map(PostCardView::from).collect(),
            editor,
            loading: status.loading,
            open_label: if status.loading {
                OPEN_LABEL_LOADING
            } else {
                OPEN_LABEL
            },
        }
    }
}

#[derive(Template)]
#[template(path = "posts.html")]
pub struct PostsPageTemplate {
    pub view: PostsPageView,
}

pub struct ErrorPageView {
    pub title: &'static str,
    pub message: &'static str,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Post Not Found",
            message: "The post you picked is no longer in the list.",
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ErrorPageView,
}
