//! Integration tests for the project repository.
//!
//! Exercises create, list, partial update, and soft delete against a real
//! database.

use assert_matches::assert_matches;
use coder_core::files::FileWrite;
use coder_core::project::{ProjectChange, ProjectStatus};
use coder_db::models::conversation::NewConversation;
use coder_db::models::project::CreateProject;
use coder_db::repositories::{ConversationRepo, ProjectFileRepo, ProjectRepo};
use coder_db::RepoError;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(user_id: &str, name: &str) -> CreateProject {
    CreateProject {
        user_id: user_id.to_string(),
        name: name.to_string(),
        description: String::new(),
        template_used: None,
        settings: None,
    }
}

// ---------------------------------------------------------------------------
// Create / find
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_persisted_row(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("alice", "Demo"))
        .await
        .unwrap();

    assert_eq!(project.user_id, "alice");
    assert_eq!(project.name, "Demo");
    assert_eq!(project.description, "");
    assert_eq!(project.status, "active");
    assert!(project.template_used.is_none());
    assert_eq!(project.created_at, project.updated_at);

    let found = ProjectRepo::find_for_user(&pool, project.id, "alice")
        .await
        .unwrap()
        .expect("project should be found");
    assert_eq!(found.id, project.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_files_seeds_scaffold(pool: PgPool) {
    let mut input = new_project("alice", "Seeded");
    input.template_used = Some("react".to_string());
    let files = vec![
        FileWrite::new("package.json", "{}"),
        FileWrite::new("src/App.tsx", "export default 1;"),
    ];

    let project = ProjectRepo::create_with_files(&pool, &input, &files)
        .await
        .unwrap();
    assert_eq!(project.template_used.as_deref(), Some("react"));

    let stored = ProjectFileRepo::list_for_project(&pool, project.id, "alice")
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].file_path, "package.json");
    assert_eq!(stored[1].file_path, "src/App.tsx");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_counts_children_and_orders_by_activity(pool: PgPool) {
    let first = ProjectRepo::create(&pool, &new_project("alice", "First"))
        .await
        .unwrap();
    let second = ProjectRepo::create(&pool, &new_project("alice", "Second"))
        .await
        .unwrap();
    ProjectRepo::create(&pool, &new_project("bob", "Not Alice's"))
        .await
        .unwrap();

    // Touch the first project so it becomes the most recently active.
    ProjectFileRepo::save(&pool, first.id, "alice", &FileWrite::new("a.txt", "a"))
        .await
        .unwrap()
        .unwrap();
    ProjectFileRepo::save(&pool, first.id, "alice", &FileWrite::new("b.txt", "b"))
        .await
        .unwrap()
        .unwrap();
    let convo = ConversationRepo::save(
        &pool,
        first.id,
        "alice",
        &NewConversation {
            message: "hi".to_string(),
            response: "hello".to_string(),
            ai_model: "test-model".to_string(),
            tokens_used: 7,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let list = ProjectRepo::list_for_user(&pool, "alice").await.unwrap();
    assert_eq!(list.len(), 2);

    assert_eq!(list[0].project.id, first.id);
    assert_eq!(list[0].file_count, 2);
    assert_eq!(list[0].conversation_count, 1);
    assert_eq!(list[0].last_conversation_at, Some(convo.created_at));

    assert_eq!(list[1].project.id, second.id);
    assert_eq!(list[1].file_count, 0);
    assert_eq!(list[1].conversation_count, 0);
    assert!(list[1].last_conversation_at.is_none());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_only_given_fields(pool: PgPool) {
    let mut input = new_project("alice", "Original");
    input.description = "keep me".to_string();
    input.settings = Some(json!({"indent": 2}));
    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        "alice",
        &[ProjectChange::Name("Renamed".to_string())],
    )
    .await
    .unwrap()
    .expect("update should match the row");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description, "keep me");
    assert_eq!(updated.settings, Some(json!({"indent": 2})));
    assert_eq!(updated.status, "active");
    assert_eq!(updated.created_at, project.created_at);
    assert!(updated.updated_at > project.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_multiple_fields(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("alice", "P"))
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        "alice",
        &[
            ProjectChange::Description("new description".to_string()),
            ProjectChange::Settings(json!({"theme": "dark"})),
        ],
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "P");
    assert_eq!(updated.description, "new description");
    assert_eq!(updated.settings, Some(json!({"theme": "dark"})));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_update_is_rejected_without_touching_row(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("alice", "P"))
        .await
        .unwrap();

    let result = ProjectRepo::update(&pool, project.id, "alice", &[]).await;
    assert_matches!(result, Err(RepoError::EmptyUpdate(_)));

    let unchanged = ProjectRepo::find_for_user(&pool, project.id, "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.updated_at, project.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_change_to_deleted_hides_project(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("alice", "P"))
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        "alice",
        &[ProjectChange::Status(ProjectStatus::Deleted)],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, "deleted");

    assert!(ProjectRepo::find_for_user(&pool, project.id, "alice")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_delete_hides_but_retains_row_and_children(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("alice", "Doomed"))
        .await
        .unwrap();
    ProjectFileRepo::save(&pool, project.id, "alice", &FileWrite::new("a.txt", "a"))
        .await
        .unwrap()
        .unwrap();

    let deleted = ProjectRepo::soft_delete(&pool, project.id, "alice")
        .await
        .unwrap()
        .expect("soft delete should match");
    assert_eq!(deleted.status, "deleted");

    // Hidden from the ownership-checked read paths.
    assert!(ProjectRepo::find_for_user(&pool, project.id, "alice")
        .await
        .unwrap()
        .is_none());
    assert!(ProjectRepo::list_for_user(&pool, "alice")
        .await
        .unwrap()
        .is_empty());
    assert!(ProjectFileRepo::list_for_project(&pool, project.id, "alice")
        .await
        .unwrap()
        .is_empty());

    // Still present underneath, children included.
    let raw = ProjectRepo::find_by_id_include_deleted(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw.status, "deleted");

    let file_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM project_files WHERE project_id = $1")
            .bind(project.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(file_rows, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_delete_twice_returns_none(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("alice", "P"))
        .await
        .unwrap();

    assert!(ProjectRepo::soft_delete(&pool, project.id, "alice")
        .await
        .unwrap()
        .is_some());
    assert!(ProjectRepo::soft_delete(&pool, project.id, "alice")
        .await
        .unwrap()
        .is_none());
}
