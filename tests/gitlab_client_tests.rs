use gitlabctl::config::{EnvConfig, GitlabConfig};
use gitlabctl::error::{GitlabctlError, RemoteError};
use gitlabctl::gitlab::*;
use httpmock::Method::{GET, POST, PUT};
use httpmock::MockServer;
use serde_json::json;

fn client_for(server: &MockServer) -> GitlabClient {
    let env = EnvConfig::from_pairs([
        ("GITLAB_HTTP_URL", server.base_url()),
        ("GITLAB_PRIVATE_TOKEN", "secret-token".to_string()),
    ]);
    GitlabClient::new(GitlabConfig::from_env(&env).expect("config")).expect("client")
}

#[tokio::test]
async fn functional_list_group_projects_sends_only_given_filters() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/groups/team1/projects")
            .header("private-token", "secret-token")
            .query_param("order_by", "created_at")
            .query_param("sort", "asc");
        then.status(200).json_body(json!([
            {
                "id": 7,
                "name": "app",
                "path": "app",
                "path_with_namespace": "team1/app",
                "web_url": "https://gitlab.com/team1/app",
                "created_at": "2024-01-02T03:04:05Z"
            }
        ]));
    });

    let opts = ListGroupProjectsOptions {
        order_by: Some("created_at".to_string()),
        sort: Some("asc".to_string()),
        ..Default::default()
    };
    let projects = client_for(&server)
        .list_group_projects("team1", &opts)
        .await
        .expect("list group projects");

    mock.assert();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, 7);
    assert_eq!(projects[0].path_with_namespace, "team1/app");
    assert!(projects[0].created_at.is_some());
}

#[tokio::test]
async fn functional_create_release_posts_json_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v4/projects/42/releases")
            .json_body(json!({
                "tag_name": "v1.0",
                "description": "Sample"
            }));
        then.status(201).json_body(json!({
            "tag_name": "v1.0",
            "name": "v1.0",
            "description": "Sample"
        }));
    });

    let opts = CreateReleaseOptions {
        tag_name: "v1.0".to_string(),
        name: None,
        description: Some("Sample".to_string()),
    };
    let release = client_for(&server)
        .create_release("42", &opts)
        .await
        .expect("create release");

    mock.assert();
    assert_eq!(release.tag_name, "v1.0");
    assert_eq!(release.description.as_deref(), Some("Sample"));
}

#[tokio::test]
async fn functional_create_tag_renames_ref_field() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v4/projects/42/repository/tags")
            .body_includes("\"ref\":\"master\"")
            .body_includes("\"tag_name\":\"v1.0\"");
        then.status(201).json_body(json!({
            "name": "v1.0",
            "target": "2695effb5807a22ff3d138d593fd856244e155e7",
            "commit": {"id": "2695effb5807a22ff3d138d593fd856244e155e7", "short_id": "2695effb", "title": "Initial"}
        }));
    });

    let opts = CreateTagOptions {
        tag_name: "v1.0".to_string(),
        git_ref: "master".to_string(),
        ..Default::default()
    };
    let tag = client_for(&server)
        .create_tag("42", &opts)
        .await
        .expect("create tag");

    mock.assert();
    assert_eq!(tag.name, "v1.0");
    assert_eq!(tag.commit.map(|c| c.short_id).as_deref(), Some("2695effb"));
}

#[tokio::test]
async fn functional_edit_project_puts_only_given_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/v4/projects/42")
            .json_body(json!({"wiki_enabled": false}));
        then.status(200).json_body(json!({"id": 42, "name": "myapp"}));
    });

    let opts = EditProjectOptions {
        settings: ProjectSettings {
            wiki_enabled: Some(false),
            ..Default::default()
        },
        ..Default::default()
    };
    let project = client_for(&server)
        .edit_project("42", &opts)
        .await
        .expect("edit project");

    mock.assert();
    assert_eq!(project.id, 42);
}

#[tokio::test]
async fn regression_not_found_maps_to_api_error_with_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v4/groups/missing/subgroups");
        then.status(404)
            .json_body(json!({"message": "404 Group Not Found"}));
    });

    let err = client_for(&server)
        .list_subgroups("missing", &ListGroupsOptions::default())
        .await
        .unwrap_err();

    mock.assert();
    match err {
        GitlabctlError::Remote(RemoteError::Api {
            status, message, ..
        }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "404 Group Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn regression_undecodable_body_maps_to_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v4/groups");
        then.status(200).body("<html>maintenance</html>");
    });

    let err = client_for(&server)
        .list_groups(&ListGroupsOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GitlabctlError::Remote(RemoteError::Decode { .. })
    ));
}
