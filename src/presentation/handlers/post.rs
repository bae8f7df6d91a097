use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::application::content_service::ContentService;
use crate::data::comment_repository::SqliteCommentRepository;
use crate::data::post_repository::SqlitePostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CommentForm, PostForm};
use crate::presentation::guards::{AdminUser, AuthenticatedUser};
use crate::presentation::handlers::{flash_redirect, render_page, request_id, see_other};
use crate::presentation::views::{CommentView, Notice, Renderer, View};

type Content = web::Data<ContentService<SqlitePostRepository, SqliteCommentRepository>>;

#[get("/")]
pub async fn index(
    req: HttpRequest,
    content: Content,
    renderer: web::Data<dyn Renderer>,
    viewer: Option<AuthenticatedUser>,
) -> Result<HttpResponse, DomainError> {
    let posts = content.list_posts().await?;
    Ok(render_page(
        &req,
        renderer.get_ref(),
        viewer.as_ref().map(|v| &v.0),
        View::Home { posts: &posts },
    ))
}

#[get("/post/{id}")]
pub async fn show_post(
    req: HttpRequest,
    content: Content,
    renderer: web::Data<dyn Renderer>,
    viewer: Option<AuthenticatedUser>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let detail = content.get_post(path.into_inner()).await?;
    let comments: Vec<CommentView> = detail.comments.iter().map(CommentView::from).collect();
    Ok(render_page(
        &req,
        renderer.get_ref(),
        viewer.as_ref().map(|v| &v.0),
        View::Post {
            post: &detail.post,
            comments: &comments,
        },
    ))
}

#[post("/post/{id}")]
pub async fn add_comment(
    req: HttpRequest,
    content: Content,
    viewer: Option<AuthenticatedUser>,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let Some(user) = viewer else {
        return Ok(flash_redirect("/login", Notice::LoginToComment));
    };

    let text = form.text.trim();
    let back = format!("/post/{}", post_id);
    if text.is_empty() {
        return Ok(flash_redirect(&back, Notice::EmptyComment));
    }

    let comment = content.add_comment(&user.0, post_id, text).await?;
    info!(
        request_id = %request_id(&req),
        comment_id = %comment.id,
        post_id = %post_id,
        "comment added"
    );
    Ok(see_other(&back))
}

#[get("/new-post")]
pub async fn new_post_form(
    req: HttpRequest,
    admin: AdminUser,
    renderer: web::Data<dyn Renderer>,
) -> HttpResponse {
    render_page(
        &req,
        renderer.get_ref(),
        Some(&admin.0),
        View::PostForm { existing: None },
    )
}

#[post("/new-post")]
pub async fn create_post(
    req: HttpRequest,
    admin: AdminUser,
    content: Content,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    match content
        .create_post(
            &admin.0,
            form.title.trim(),
            &form.subtitle,
            &form.body,
            &form.img_url,
        )
        .await
    {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                post_id = %post.id,
                "post created"
            );
            Ok(see_other("/"))
        }
        Err(DomainError::DuplicateTitle(_)) => {
            Ok(flash_redirect("/new-post", Notice::DuplicateTitle))
        }
        Err(e) => Err(e),
    }
}

#[get("/edit-post/{id}")]
pub async fn edit_post_form(
    req: HttpRequest,
    admin: AdminUser,
    content: Content,
    renderer: web::Data<dyn Renderer>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let detail = content.get_post(path.into_inner()).await?;
    Ok(render_page(
        &req,
        renderer.get_ref(),
        Some(&admin.0),
        View::PostForm {
            existing: Some(&detail.post),
        },
    ))
}

#[post("/edit-post/{id}")]
pub async fn update_post(
    req: HttpRequest,
    _admin: AdminUser,
    content: Content,
    path: web::Path<i64>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    match content
        .update_post(
            post_id,
            form.title.trim(),
            &form.subtitle,
            &form.body,
            &form.img_url,
        )
        .await
    {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                post_id = %post.id,
                "post updated"
            );
            Ok(see_other(&format!("/post/{}", post.id)))
        }
        Err(DomainError::DuplicateTitle(_)) => Ok(flash_redirect(
            &format!("/edit-post/{}", post_id),
            Notice::DuplicateTitle,
        )),
        Err(e) => Err(e),
    }
}

#[get("/delete/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    _admin: AdminUser,
    content: Content,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    content.delete_post(post_id).await?;
    info!(
        request_id = %request_id(&req),
        post_id = %post_id,
        "post deleted"
    );
    Ok(see_other("/"))
}
