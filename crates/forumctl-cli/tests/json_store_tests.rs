use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use forumctl_cli::{
    handle_engagement_list_users, handle_engagement_recalculate, handle_favorite_add,
    handle_favorite_list_topics, handle_favorite_remove, handle_moderator_list,
    handle_moderator_remove, handle_user_permalink, handle_user_set_role, handle_user_spam,
    report, CommandContext, ConfirmationDecision, OperationOptions, Outcome, Prompter,
};
use forumctl_core::{FormatMode, ForumRole};
use forumctl_store_json::JsonForumStore;
use serde_json::{json, Value};
use tempfile::TempDir;

const SITE: &str = "https://forum.example.org/";

struct NeverAsked;

impl Prompter for NeverAsked {
    fn ask(&self, prompt: &str) -> ConfirmationDecision {
        panic!("unexpected confirmation prompt: {}", prompt);
    }
}

fn fixture() -> Value {
    json!({
        "users": [
            { "id": 1, "login": "admin", "display_name": "Site Admin", "role": "keymaster" },
            { "id": 5465, "login": "alice", "display_name": "Alice" },
            { "id": 77, "login": "bob", "display_name": "Bob" }
        ],
        "forums": [
            { "id": 545646, "title": "General", "moderators": [5465, 77] }
        ],
        "topics": [
            { "id": 65476, "forum_id": 545646, "title": "Welcome", "slug": "welcome", "author_id": 1 },
            { "id": 65477, "forum_id": 545646, "title": "Rules", "slug": "rules", "author_id": 77,
              "favoriters": [5465] }
        ],
        "replies": [
            { "id": 9001, "topic_id": 65476, "author_id": 77 },
            { "id": 9002, "topic_id": 65476, "author_id": 5465 },
            { "id": 9003, "topic_id": 65476, "author_id": 77 }
        ]
    })
}

fn write_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("store.json");
    fs::write(&path, fixture().to_string()).expect("write fixture");
    path
}

fn context(path: &Path, opts: OperationOptions) -> CommandContext {
    let store = JsonForumStore::open(path, SITE).expect("open store");
    CommandContext::new(Arc::new(store), opts, Arc::new(NeverAsked))
}

fn confirmed_opts() -> OperationOptions {
    OperationOptions::new(false, true, false)
        .with_pre_confirmed(Some(ConfirmationDecision::Confirmed))
}

fn on_disk(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read store")).expect("valid json")
}

#[tokio::test]
async fn favorite_add_persists_across_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);

    let ctx = context(&path, confirmed_opts());
    let outcome = handle_favorite_add(&ctx, "bob", 65476).await.expect("add");
    assert_eq!(
        outcome,
        Outcome::Success("Favorite successfully added.".to_string())
    );

    let ctx = context(&path, confirmed_opts());
    let outcome = handle_favorite_list_topics(&ctx, "77", Some(FormatMode::Ids), None)
        .await
        .expect("list");
    assert_eq!(outcome, Outcome::Rendered("65476".to_string()));

    // second add of the same favorite is refused by the store
    let result = handle_favorite_add(&ctx, "bob", 65476).await;
    let mut out = Vec::new();
    let mut err = Vec::new();
    assert_eq!(report(result, &confirmed_opts().output, &mut out, &mut err), 1);
    assert_eq!(
        String::from_utf8(err).expect("utf8"),
        "❌ Error: Could not add favorite.\n"
    );
}

#[tokio::test]
async fn favorite_remove_with_pre_confirmation_updates_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let ctx = context(&path, confirmed_opts());

    handle_favorite_remove(&ctx, "alice", 65477)
        .await
        .expect("remove");

    let stored = on_disk(&path);
    assert_eq!(stored["topics"][1]["favoriters"], json!([]));
}

#[tokio::test]
async fn dry_run_leaves_store_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let before = fs::read_to_string(&path).expect("read");

    let ctx = context(&path, OperationOptions::new(true, true, false));
    let outcome = handle_moderator_remove(&ctx, 545646, "alice")
        .await
        .expect("dry run");

    assert!(matches!(outcome, Outcome::Success(ref m) if m.starts_with("DRY-RUN")));
    assert_eq!(fs::read_to_string(&path).expect("read"), before);
}

#[tokio::test]
async fn moderator_list_formats() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let ctx = context(&path, confirmed_opts());

    let ids = handle_moderator_list(&ctx, 545646, Some(FormatMode::Ids))
        .await
        .expect("ids");
    assert_eq!(ids, Outcome::Rendered("5465 77".to_string()));

    let count = handle_moderator_list(&ctx, 545646, Some(FormatMode::Count))
        .await
        .expect("count");
    assert_eq!(count, Outcome::Rendered("2".to_string()));

    let Outcome::Rendered(yaml) = handle_moderator_list(&ctx, 545646, Some(FormatMode::Yaml))
        .await
        .expect("yaml")
    else {
        panic!("expected rendered yaml");
    };
    assert!(yaml.contains("login: alice"));
    assert!(yaml.contains("login: bob"));

    let err = handle_moderator_list(&ctx, 1, None).await.unwrap_err();
    assert!(err.to_string().contains("No forum found by that ID: 1"));
}

#[tokio::test]
async fn recalculate_rebuilds_engagements_from_replies() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let ctx = context(&path, confirmed_opts());

    let err = handle_engagement_list_users(&ctx, 65476, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Could not find any users.");

    handle_engagement_recalculate(&ctx, 65476)
        .await
        .expect("recalculate");

    let outcome = handle_engagement_list_users(&ctx, 65476, Some(FormatMode::Json))
        .await
        .expect("json");
    let Outcome::Rendered(json) = outcome else {
        panic!("expected rendered json");
    };
    let parsed: Vec<Value> = serde_json::from_str(&json).expect("valid json");
    let ids: Vec<u64> = parsed
        .iter()
        .map(|row| row["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![1, 77, 5465]);
}

#[tokio::test]
async fn spam_marks_content_of_user() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let ctx = context(&path, confirmed_opts());

    handle_user_spam(&ctx, "bob").await.expect("spam");

    let stored = on_disk(&path);
    assert_eq!(stored["topics"][1]["status"], "spam");
    assert_eq!(stored["topics"][0]["status"], "publish");
    assert_eq!(stored["replies"][0]["status"], "spam");
    assert_eq!(stored["replies"][1]["status"], "publish");
}

#[tokio::test]
async fn set_role_and_permalink() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let ctx = context(&path, confirmed_opts());

    handle_user_set_role(&ctx, "alice", "blocked")
        .await
        .expect("set role");
    let stored = on_disk(&path);
    assert_eq!(stored["users"][1]["role"], ForumRole::Blocked.as_str());

    let outcome = handle_user_permalink(&ctx, "alice").await.expect("permalink");
    assert_eq!(
        outcome,
        Outcome::Success(
            "User profile page: https://forum.example.org/forums/users/alice/".to_string()
        )
    );
}

#[tokio::test]
async fn topic_table_links_to_topic_pages() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(&dir);
    let ctx = context(&path, confirmed_opts());

    let Outcome::Rendered(table) = handle_favorite_list_topics(&ctx, "alice", None, None)
        .await
        .expect("table")
    else {
        panic!("expected rendered table");
    };
    assert!(table.contains("Rules"));
    assert!(table.contains("https://forum.example.org/forums/topic/rules/"));
}
