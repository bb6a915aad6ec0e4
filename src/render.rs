//! Server-side page rendering
//!
//! Every page shares one layout: site header, a nav bar listing all
//! categories, and the session links for the current user. Bodies are
//! plain HTML strings assembled by the route handlers.

use crate::models::{Article, Category, Tag, User};

const SITE_NAME: &str = "Pressroom";

const STYLE: &str = r#"
    body { font-family: Georgia, 'Times New Roman', serif; max-width: 860px; margin: 0 auto; padding: 0 16px; color: #1d1d1f; }
    nav { border-bottom: 1px solid #ddd; padding: 12px 0; margin-bottom: 24px; }
    nav a { margin-right: 14px; color: #2a4d8f; text-decoration: none; }
    nav .session { float: right; }
    .article-card { border: 1px solid #ddd; border-radius: 8px; padding: 12px 16px; margin-bottom: 12px; }
    .article-card h3 { margin: 0 0 4px 0; }
    .meta { color: #777; font-size: 0.85em; }
    form.panel { border: 1px solid #ddd; border-radius: 8px; padding: 16px; margin-bottom: 16px; }
    label { display: block; margin-top: 8px; font-weight: 600; }
    input, select { padding: 6px; margin-top: 2px; }
    button { margin-top: 12px; padding: 6px 14px; }
    table { border-collapse: collapse; }
    td, th { border: 1px solid #ddd; padding: 6px 10px; }
"#;

/// Escape text destined for HTML element content or attribute values.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shared page chrome: title, nav bar with every category, session links.
pub fn layout(title: &str, categories: &[Category], user: Option<&User>, body: &str) -> String {
    let mut nav_links = String::from(r#"<a href="/">Home</a>"#);
    for category in categories {
        nav_links.push_str(&format!(
            r#"<a href="/category/{}">{}</a>"#,
            category.id,
            escape(&category.name)
        ));
    }

    let session = match user {
        Some(user) => {
            let mut links = String::new();
            if user.role.can_publish() {
                links.push_str(r#"<a href="/admin">Admin</a>"#);
            }
            if user.role.is_dev() {
                links.push_str(r#"<a href="/dev">Dev</a>"#);
            }
            format!(
                r#"{links}<span class="meta">{}</span> <a href="/logout">Log out</a>"#,
                escape(&user.username)
            )
        }
        None => r#"<a href="/login">Log in</a><a href="/signup">Sign up</a>"#.to_string(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title} - {SITE_NAME}</title>
  <style>{STYLE}</style>
</head>
<body>
  <nav>{nav_links}<span class="session">{session}</span></nav>
  {body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn article_card(article: &Article) -> String {
    format!(
        r#"<div class="article-card"><h3><a href="/article/{id}">{title}</a></h3><span class="meta">{date} by {creator}</span></div>"#,
        id = article.id,
        title = escape(&article.title),
        date = article.date_display(),
        creator = escape(&article.creator_email),
    )
}

/// Overview listing, used for the front page and tag/category filters.
pub fn overview_body(heading: &str, articles: &[Article]) -> String {
    let mut body = format!("<h1>{}</h1>", escape(heading));
    if articles.is_empty() {
        body.push_str("<p>No articles yet.</p>");
    }
    for article in articles {
        body.push_str(&article_card(article));
    }
    body
}

/// A single article page. The stored content is converter output and is
/// embedded as-is.
pub fn article_body(article: &Article, creator: Option<&User>) -> String {
    let creator_name = creator
        .map(|user| escape(&user.username))
        .unwrap_or_else(|| escape(&article.creator_email));

    format!(
        r#"<h1>{title}</h1><p class="meta">{date} by {creator_name}</p><article>{content}</article>"#,
        title = escape(&article.title),
        date = article.date_display(),
        content = article.content_html,
    )
}

pub fn login_body(error: Option<&str>) -> String {
    let notice = error
        .map(|e| format!(r#"<p class="meta">{}</p>"#, escape(e)))
        .unwrap_or_default();
    format!(
        r#"<h1>Log in</h1>{notice}
<form class="panel" method="post" action="/login">
  <label>Email</label><input name="email" type="email" required />
  <label>Password</label><input name="password" type="password" required />
  <button type="submit">Log in</button>
</form>"#
    )
}

pub fn signup_body(error: Option<&str>) -> String {
    let notice = error
        .map(|e| format!(r#"<p class="meta">{}</p>"#, escape(e)))
        .unwrap_or_default();
    format!(
        r#"<h1>Sign up</h1>{notice}
<form class="panel" method="post" action="/signup">
  <label>Username</label><input name="username" required />
  <label>Email</label><input name="email" type="email" required />
  <label>Password</label><input name="password" type="password" required />
  <button type="submit">Sign up</button>
</form>"#
    )
}

/// Admin panel: upload form plus the article list with delete buttons.
pub fn admin_body(articles: &[Article], categories: &[Category]) -> String {
    let mut category_options = String::from(r#"<option value="">(none)</option>"#);
    for category in categories {
        category_options.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            category.id,
            escape(&category.name)
        ));
    }

    let mut rows = String::new();
    for article in articles {
        rows.push_str(&format!(
            r#"<tr><td>{id}</td><td><a href="/article/{id}">{title}</a></td><td>{date}</td>
<td><form method="post" action="/admin/delete/{id}"><button type="submit">Delete</button></form></td></tr>"#,
            id = article.id,
            title = escape(&article.title),
            date = article.date_display(),
        ));
    }

    format!(
        r#"<h1>Admin panel</h1>
<form class="panel" method="post" action="/admin/upload" enctype="multipart/form-data">
  <h2>Publish from Word document</h2>
  <label>Title</label><input name="title" required />
  <label>Category</label><select name="category_id">{category_options}</select>
  <label>Tags (comma separated)</label><input name="tags" />
  <label>Document (.docx)</label><input name="file" type="file" accept=".docx" required />
  <button type="submit">Publish</button>
</form>
<h2>Articles</h2>
<table><tr><th>Id</th><th>Title</th><th>Created</th><th></th></tr>{rows}</table>"#
    )
}

/// Dev panel: role management and category administration.
pub fn dev_body(users: &[User], categories: &[Category], tags: &[Tag]) -> String {
    let mut user_rows = String::new();
    for user in users {
        user_rows.push_str(&format!(
            r#"<tr><td>{id}</td><td>{username}</td><td>{email}</td>
<td><form method="post" action="/dev/role">
<input type="hidden" name="user_id" value="{id}" />
<select name="role">
  <option value="user"{su}>user</option>
  <option value="admin"{sa}>admin</option>
  <option value="dev"{sd}>dev</option>
</select>
<button type="submit">Set</button></form></td></tr>"#,
            id = user.id,
            username = escape(&user.username),
            email = escape(&user.email),
            su = selected(user.role == crate::types::Role::User),
            sa = selected(user.role == crate::types::Role::Admin),
            sd = selected(user.role == crate::types::Role::Dev),
        ));
    }

    let mut category_rows = String::new();
    for category in categories {
        category_rows.push_str(&format!(
            r#"<tr><td>{id}</td><td>{name}</td>
<td><form method="post" action="/dev/category/delete/{id}"><button type="submit">Delete</button></form></td></tr>"#,
            id = category.id,
            name = escape(&category.name),
        ));
    }

    let tag_list = tags
        .iter()
        .map(|tag| format!(r#"<a href="/tags/{0}">{0}</a>"#, escape(&tag.name)))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"<h1>Dev panel</h1>
<h2>Users</h2>
<table><tr><th>Id</th><th>Username</th><th>Email</th><th>Role</th></tr>{user_rows}</table>
<h2>Categories</h2>
<form class="panel" method="post" action="/dev/category">
  <label>New category</label><input name="name" required />
  <button type="submit">Create</button>
</form>
<table><tr><th>Id</th><th>Name</th><th></th></tr>{category_rows}</table>
<h2>Tags</h2>
<p>{tag_list}</p>"#
    )
}

fn selected(on: bool) -> &'static str {
    if on {
        " selected"
    } else {
        ""
    }
}

/// Standalone 404 page, also used by the error responder.
pub fn not_found_page() -> String {
    layout(
        "Page not found",
        &[],
        None,
        r#"<h1>404</h1><p>This page does not exist. <a href="/">Back to the overview.</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<b>&"x"#), "&lt;b&gt;&amp;&quot;x");
    }

    #[test]
    fn layout_lists_every_category() {
        let categories = vec![category(1, "science"), category(2, "art & craft")];
        let page = layout("Home", &categories, None, "<p>body</p>");
        assert!(page.contains(r#"<a href="/category/1">science</a>"#));
        assert!(page.contains(r#"<a href="/category/2">art &amp; craft</a>"#));
        assert!(page.contains(r#"<a href="/login">Log in</a>"#));
    }

    #[test]
    fn layout_shows_panel_links_by_role() {
        let user = User {
            id: 1,
            username: "dee".to_string(),
            email: "dee@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Dev,
            created_at: chrono::Utc::now().naive_utc(),
        };
        let page = layout("Home", &[], Some(&user), "");
        assert!(page.contains(r#"<a href="/admin">Admin</a>"#));
        assert!(page.contains(r#"<a href="/dev">Dev</a>"#));
        assert!(page.contains(r#"<a href="/logout">Log out</a>"#));
    }

    #[test]
    fn article_content_is_embedded_unescaped() {
        let article = Article {
            id: 3,
            title: "Styled".to_string(),
            content_html: "<p style='text-align: center;'>hi</p>\n".to_string(),
            creator_email: "e@e".to_string(),
            category_id: None,
            date_created: chrono::Utc::now().naive_utc(),
        };
        let body = article_body(&article, None);
        assert!(body.contains("<p style='text-align: center;'>hi</p>"));
    }
}
