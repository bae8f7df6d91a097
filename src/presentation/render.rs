use std::fmt::Write as _;

use crate::domain::user::User;
use crate::presentation::views::{PageContext, Renderer, View};

/// Fallback document renderer. Deliberately plain: it turns the typed page
/// context into minimal semantic HTML so the server runs standalone; a real
/// template engine can be swapped in behind the `Renderer` trait.
pub struct PlainRenderer;

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn nav(html: &mut String, viewer: Option<&User>) {
    html.push_str("<nav><a href=\"/\">Home</a> <a href=\"/about\">About</a> <a href=\"/contact\">Contact</a> ");
    match viewer {
        Some(user) => {
            if user.is_admin() {
                html.push_str("<a href=\"/new-post\">New Post</a> ");
            }
            let _ = write!(
                html,
                "<span>Hi, {}!</span> <a href=\"/logout\">Log Out</a>",
                escape(&user.name)
            );
        }
        None => {
            html.push_str("<a href=\"/login\">Login</a> <a href=\"/register\">Register</a>");
        }
    }
    html.push_str("</nav>");
}

fn post_form(html: &mut String, action: &str, view: &View<'_>) {
    let (title, subtitle, body, img_url) = match view {
        View::PostForm {
            existing: Some(post),
        } => (
            post.title.as_str(),
            post.subtitle.as_str(),
            post.body.as_str(),
            post.img_url.as_str(),
        ),
        _ => ("", "", "", ""),
    };
    let _ = write!(
        html,
        concat!(
            "<form method=\"post\" action=\"{}\">",
            "<input name=\"title\" value=\"{}\" placeholder=\"Title\">",
            "<input name=\"subtitle\" value=\"{}\" placeholder=\"Subtitle\">",
            "<input name=\"img_url\" value=\"{}\" placeholder=\"Image URL\">",
            "<textarea name=\"body\">{}</textarea>",
            "<button type=\"submit\">Save</button>",
            "</form>"
        ),
        escape(action),
        escape(title),
        escape(subtitle),
        escape(img_url),
        escape(body),
    );
}

impl Renderer for PlainRenderer {
    fn render(&self, page: &PageContext<'_>) -> String {
        let mut html = String::from(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>Inkpost</title></head><body>",
        );
        nav(&mut html, page.viewer);
        if let Some(notice) = page.notice {
            let _ = write!(html, "<p class=\"notice\">{}</p>", escape(notice.message()));
        }

        match &page.view {
            View::Home { posts } => {
                html.push_str("<h1>Inkpost</h1>");
                for post in posts.iter() {
                    let _ = write!(
                        html,
                        "<article><h2><a href=\"/post/{}\">{}</a></h2><p>{}</p><small>{}</small>",
                        post.id,
                        escape(&post.title),
                        escape(&post.subtitle),
                        escape(&post.published_on),
                    );
                    if page.viewer.is_some_and(|u| u.is_admin()) {
                        let _ = write!(
                            html,
                            " <a href=\"/edit-post/{}\">Edit</a> <a href=\"/delete/{}\">Delete</a>",
                            post.id, post.id
                        );
                    }
                    html.push_str("</article>");
                }
            }
            View::Register => {
                html.push_str(concat!(
                    "<h1>Register</h1>",
                    "<form method=\"post\" action=\"/register\">",
                    "<input name=\"name\" placeholder=\"Name\">",
                    "<input name=\"email\" placeholder=\"Email\">",
                    "<input name=\"password\" type=\"password\" placeholder=\"Password\">",
                    "<button type=\"submit\">Sign Up</button>",
                    "</form>"
                ));
            }
            View::Login => {
                html.push_str(concat!(
                    "<h1>Log In</h1>",
                    "<form method=\"post\" action=\"/login\">",
                    "<input name=\"email\" placeholder=\"Email\">",
                    "<input name=\"password\" type=\"password\" placeholder=\"Password\">",
                    "<button type=\"submit\">Log In</button>",
                    "</form>"
                ));
            }
            View::Post { post, comments } => {
                let _ = write!(
                    html,
                    concat!(
                        "<article><h1>{}</h1><h2>{}</h2>",
                        "<small>by {} on {}</small>",
                        "<img src=\"{}\" alt=\"\">",
                        "<div>{}</div></article>"
                    ),
                    escape(&post.title),
                    escape(&post.subtitle),
                    escape(&post.author_name),
                    escape(&post.published_on),
                    escape(&post.img_url),
                    escape(&post.body),
                );
                html.push_str("<section><h3>Comments</h3>");
                for comment in comments.iter() {
                    let _ = write!(
                        html,
                        "<div><img src=\"{}\" alt=\"\"><strong>{}</strong><p>{}</p></div>",
                        escape(&comment.avatar_url),
                        escape(&comment.author_name),
                        escape(&comment.body),
                    );
                }
                if page.viewer.is_some() {
                    let _ = write!(
                        html,
                        concat!(
                            "<form method=\"post\" action=\"/post/{}\">",
                            "<textarea name=\"text\"></textarea>",
                            "<button type=\"submit\">Comment</button>",
                            "</form>"
                        ),
                        post.id
                    );
                } else {
                    html.push_str("<p><a href=\"/login\">Log in</a> to comment.</p>");
                }
                html.push_str("</section>");
            }
            View::PostForm { existing } => {
                let action = match existing {
                    Some(post) => format!("/edit-post/{}", post.id),
                    None => "/new-post".to_string(),
                };
                let heading = if existing.is_some() {
                    "Edit Post"
                } else {
                    "New Post"
                };
                let _ = write!(html, "<h1>{}</h1>", heading);
                post_form(&mut html, &action, &page.view);
            }
            View::About => {
                html.push_str("<h1>About</h1><p>A small blog, hand-rolled.</p>");
            }
            View::Contact => {
                html.push_str("<h1>Contact</h1><p>Say hello at the usual address.</p>");
            }
        }

        html.push_str("</body></html>");
        html
    }
}
