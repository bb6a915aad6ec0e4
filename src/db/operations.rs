use sqlx::SqlitePool;

use crate::models::{Article, Category, Tag, User};
use crate::types::{AppResult, Role};

pub struct DatabaseOperations;

impl DatabaseOperations {
    // User operations

    pub async fn create_user(
        pool: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES (?, ?, ?, 'user')
            RETURNING id, username, email, password_hash, role, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(pool: &SqlitePool, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn list_users(pool: &SqlitePool) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    pub async fn set_user_role(pool: &SqlitePool, user_id: i64, role: Role) -> AppResult<()> {
        sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    // Article operations

    pub async fn create_article(
        pool: &SqlitePool,
        title: &str,
        content_html: &str,
        creator_email: &str,
        category_id: Option<i64>,
    ) -> AppResult<Article> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, content_html, creator_email, category_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, content_html, creator_email, category_id, date_created
            "#,
        )
        .bind(title)
        .bind(content_html)
        .bind(creator_email)
        .bind(category_id)
        .fetch_one(pool)
        .await?;

        Ok(article)
    }

    pub async fn get_article(pool: &SqlitePool, id: i64) -> AppResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content_html, creator_email, category_id, date_created
            FROM articles WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(article)
    }

    pub async fn list_articles(pool: &SqlitePool) -> AppResult<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content_html, creator_email, category_id, date_created
            FROM articles ORDER BY date_created DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(articles)
    }

    pub async fn delete_article(pool: &SqlitePool, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Category operations

    pub async fn list_categories(pool: &SqlitePool) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(pool)
                .await?;

        Ok(categories)
    }

    pub async fn create_category(pool: &SqlitePool, name: &str) -> AppResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    pub async fn delete_category(pool: &SqlitePool, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Tag operations

    /// Find or create a tag by name.
    pub async fn ensure_tag(pool: &SqlitePool, name: &str) -> AppResult<Tag> {
        if let Some(tag) = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?
        {
            return Ok(tag);
        }

        let tag = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES (?) RETURNING id, name")
            .bind(name)
            .fetch_one(pool)
            .await?;

        Ok(tag)
    }

    pub async fn tag_article(pool: &SqlitePool, article_id: i64, tag_id: i64) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(tag_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn list_tags(pool: &SqlitePool) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(tags)
    }

    pub async fn list_articles_by_tag(pool: &SqlitePool, tag: &str) -> AppResult<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT a.id, a.title, a.content_html, a.creator_email, a.category_id, a.date_created
            FROM articles a
            JOIN article_tags at ON at.article_id = a.id
            JOIN tags t ON t.id = at.tag_id
            WHERE t.name = ?
            ORDER BY a.date_created DESC, a.id DESC
            "#,
        )
        .bind(tag)
        .fetch_all(pool)
        .await?;

        Ok(articles)
    }

    pub async fn list_articles_by_category(
        pool: &SqlitePool,
        category_id: i64,
    ) -> AppResult<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content_html, creator_email, category_id, date_created
            FROM articles WHERE category_id = ?
            ORDER BY date_created DESC, id DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(pool)
        .await?;

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn user_lifecycle() {
        let pool = test_pool().await;

        let user = DatabaseOperations::create_user(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);

        let by_email = DatabaseOperations::get_user_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        DatabaseOperations::set_user_role(&pool, user.id, Role::Admin)
            .await
            .unwrap();
        let promoted = DatabaseOperations::get_user(&pool, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promoted.role, Role::Admin);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = test_pool().await;

        DatabaseOperations::create_user(&pool, "a", "same@example.com", "h")
            .await
            .unwrap();
        let dup = DatabaseOperations::create_user(&pool, "b", "same@example.com", "h").await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn article_crud_and_tagging() {
        let pool = test_pool().await;

        let article = DatabaseOperations::create_article(
            &pool,
            "First Post",
            "<p>hello</p>\n",
            "editor@example.com",
            None,
        )
        .await
        .unwrap();

        let fetched = DatabaseOperations::get_article(&pool, article.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "First Post");
        assert_eq!(fetched.content_html, "<p>hello</p>\n");

        let tag = DatabaseOperations::ensure_tag(&pool, "rust").await.unwrap();
        DatabaseOperations::tag_article(&pool, article.id, tag.id)
            .await
            .unwrap();

        // ensure_tag is idempotent
        let same = DatabaseOperations::ensure_tag(&pool, "rust").await.unwrap();
        assert_eq!(same.id, tag.id);

        let tagged = DatabaseOperations::list_articles_by_tag(&pool, "rust")
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, article.id);

        assert!(DatabaseOperations::delete_article(&pool, article.id)
            .await
            .unwrap());
        assert!(DatabaseOperations::get_article(&pool, article.id)
            .await
            .unwrap()
            .is_none());
        // second delete finds nothing
        assert!(!DatabaseOperations::delete_article(&pool, article.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn categories_drive_navigation() {
        let pool = test_pool().await;

        DatabaseOperations::create_category(&pool, "science").await.unwrap();
        DatabaseOperations::create_category(&pool, "art").await.unwrap();

        let categories = DatabaseOperations::list_categories(&pool).await.unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["art", "science"]);

        let art = categories.iter().find(|c| c.name == "art").unwrap();
        DatabaseOperations::create_article(&pool, "Sculpture", "<p>x</p>", "e@e", Some(art.id))
            .await
            .unwrap();
        let in_art = DatabaseOperations::list_articles_by_category(&pool, art.id)
            .await
            .unwrap();
        assert_eq!(in_art.len(), 1);
    }
}
