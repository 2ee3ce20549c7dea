mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn post_lifecycle_with_likes_and_comments() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let author = common::register_user(&client, server, "author").await?;
    let reader = common::register_user(&client, server, "reader").await?;

    let post_id = common::create_post(&client, server, &author, "  hello world  ").await?;
    let post_url = server.url(&format!("/api/posts/{}", post_id));
    let like_url = server.url(&format!("/api/posts/{}/like", post_id));

    // Anonymous read
    let res = client.get(&post_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["content"], "hello world");
    assert_eq!(body["data"]["user"]["username"], author.username.as_str());
    assert_eq!(body["data"]["is_liked"], false);

    // Like twice
    let res = client.post(&like_url).bearer_auth(&reader.token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.post(&like_url).bearer_auth(&reader.token).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Post already liked");

    let res = client.get(&post_url).bearer_auth(&reader.token).send().await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["likes_count"], 1);
    assert_eq!(body["data"]["is_liked"], true);

    // Unlike, then unlike again
    for _ in 0..2 {
        let res = client.delete(&like_url).bearer_auth(&reader.token).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
    }
    let res = client.get(&post_url).bearer_auth(&reader.token).send().await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["likes_count"], 0);
    assert_eq!(body["data"]["is_liked"], false);

    // Comment
    let res = client
        .post(server.url(&format!("/api/posts/{}/comment", post_id)))
        .bearer_auth(&reader.token)
        .json(&json!({ "content": "nice" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["user"]["username"], reader.username.as_str());

    let res = client
        .get(server.url(&format!("/api/posts/{}/comments", post_id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    // Only the owner may change or remove the post
    let res = client
        .put(&post_url)
        .bearer_auth(&reader.token)
        .json(&json!({ "content": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = client.delete(&post_url).bearer_auth(&reader.token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(&post_url)
        .bearer_auth(&author.token)
        .json(&json!({ "content": "edited" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["content"], "edited");
    assert_eq!(body["data"]["comments_count"], 1);

    let res = client.delete(&post_url).bearer_auth(&author.token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(&post_url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn post_content_is_validated() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let user = common::register_user(&client, server, "valid").await?;

    for content in [json!("   "), json!("x".repeat(1001)), Value::Null] {
        let res = client
            .post(server.url("/api/posts/create"))
            .bearer_auth(&user.token)
            .json(&json!({ "content": content }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let missing = server.url(&format!("/api/posts/{}/like", uuid::Uuid::new_v4()));
    let res = client.post(&missing).bearer_auth(&user.token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn comment_rules() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let owner = common::register_user(&client, server, "owner").await?;
    let commenter = common::register_user(&client, server, "critic").await?;
    let post_id = common::create_post(&client, server, &owner, "comment on me").await?;
    let comment_url = server.url(&format!("/api/posts/{}/comment", post_id));

    // Length limit and blank content
    for content in [json!("x".repeat(501)), json!("  ")] {
        let res = client
            .post(&comment_url)
            .bearer_auth(&commenter.token)
            .json(&json!({ "content": content }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
    let res = client
        .post(&comment_url)
        .bearer_auth(&commenter.token)
        .json(&json!({ "content": "x".repeat(501) }))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Comment content must be at most 500 characters");

    // Exactly at the limit is fine
    let res = client
        .post(&comment_url)
        .bearer_auth(&commenter.token)
        .json(&json!({ "content": "x".repeat(500) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Comment created successfully");

    // Unknown post, both directions
    let missing = uuid::Uuid::new_v4();
    let res = client
        .post(server.url(&format!("/api/posts/{}/comment", missing)))
        .bearer_auth(&commenter.token)
        .json(&json!({ "content": "hello?" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Post not found");

    let res = client
        .get(server.url(&format!("/api/posts/{}/comments", missing)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owner hears about the comment, exactly once
    let res = client
        .get(server.url("/api/notifications"))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["total_count"], 1);
    let notification = &body["data"]["notifications"][0];
    assert_eq!(notification["type"], "comment");
    assert_eq!(notification["content"], format!("{} commented on your post", commenter.username));
    assert_eq!(notification["related_user"]["id"], commenter.id.as_str());
    assert_eq!(notification["related_post"]["id"], post_id.as_str());

    // Commenting on your own post stays quiet
    let res = client
        .post(&comment_url)
        .bearer_auth(&owner.token)
        .json(&json!({ "content": "thanks" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = client
        .get(server.url("/api/notifications/unread-count"))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["unread_count"], 1);

    Ok(())
}
