use crate::domain::comment::CommentWithAuthor;
use crate::domain::post::{Post, PostWithAuthor};
use crate::domain::user::User;

/// One-shot notice shown on the next page view. Carried across the
/// redirect as a short code in a cookie, never as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AlreadyRegistered,
    BadCredentials,
    LoginToComment,
    DuplicateTitle,
    EmptyComment,
}

impl Notice {
    pub fn code(self) -> &'static str {
        match self {
            Notice::AlreadyRegistered => "already-registered",
            Notice::BadCredentials => "bad-credentials",
            Notice::LoginToComment => "login-to-comment",
            Notice::DuplicateTitle => "duplicate-title",
            Notice::EmptyComment => "empty-comment",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "already-registered" => Some(Notice::AlreadyRegistered),
            "bad-credentials" => Some(Notice::BadCredentials),
            "login-to-comment" => Some(Notice::LoginToComment),
            "duplicate-title" => Some(Notice::DuplicateTitle),
            "empty-comment" => Some(Notice::EmptyComment),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::AlreadyRegistered => {
                "You've already signed up with that email, log in instead!"
            }
            Notice::BadCredentials => "Invalid email or password, please try again!",
            Notice::LoginToComment => "You need to login or register to comment!",
            Notice::DuplicateTitle => "A post with that title already exists!",
            Notice::EmptyComment => "Comments can't be empty!",
        }
    }
}

/// Avatar URL for a commenter, keyed by the md5 of the normalized email.
pub fn gravatar_url(email: &str) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?s=100&d=retro&r=g", digest)
}

/// A comment as shown on a post page; the author's email has already been
/// folded into the avatar URL.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub body: String,
    pub author_name: String,
    pub avatar_url: String,
}

impl From<&CommentWithAuthor> for CommentView {
    fn from(c: &CommentWithAuthor) -> Self {
        Self {
            body: c.body.clone(),
            author_name: c.author_name.clone(),
            avatar_url: gravatar_url(&c.author_email),
        }
    }
}

/// The typed context handed to the render boundary, one variant per page.
#[derive(Debug)]
pub enum View<'a> {
    Home { posts: &'a [Post] },
    Register,
    Login,
    Post {
        post: &'a PostWithAuthor,
        comments: &'a [CommentView],
    },
    PostForm { existing: Option<&'a PostWithAuthor> },
    About,
    Contact,
}

#[derive(Debug)]
pub struct PageContext<'a> {
    pub viewer: Option<&'a User>,
    pub notice: Option<Notice>,
    pub view: View<'a>,
}

/// Template rendering is an external collaborator: it receives a typed
/// page context and hands back the document. The built-in implementation
/// lives in `render`.
pub trait Renderer: Send + Sync {
    fn render(&self, page: &PageContext<'_>) -> String;
}
