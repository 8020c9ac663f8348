use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

fn fastly_cmd(server: &MockServer, project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fastly").expect("fastly binary");
    cmd.env("FASTLY_PROJECT_DIR", project.path())
        .env_remove("FASTLY_SERVICE_ID")
        .env_remove("FASTLY_API_TOKEN")
        .env_remove("FASTLY_API_ENDPOINT")
        .env_remove("RUST_LOG")
        .arg("--endpoint")
        .arg(server.base_url())
        .arg("--token")
        .arg("test-token");
    cmd
}

fn project() -> TempDir {
    TempDir::new().expect("temp dir")
}

#[test]
fn autoclone_clones_active_version_before_creating_acl() {
    let server = MockServer::start();
    let project = project();

    let versions = server.mock(|when, then| {
        when.method(GET)
            .path("/service/svc1/version")
            .header("Fastly-Key", "test-token");
        then.status(200)
            .json_body(json!([{"number": 1, "active": true, "locked": false}]));
    });
    let clone = server.mock(|when, then| {
        when.method(PUT).path("/service/svc1/version/1/clone");
        then.status(200)
            .json_body(json!({"number": 2, "active": false, "locked": false}));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/service/svc1/version/2/acl");
        then.status(200).json_body(json!({
            "id": "acl1",
            "name": "blocklist",
            "service_id": "svc1",
            "version": 2
        }));
    });

    fastly_cmd(&server, &project)
        .args(["acl", "create", "--service-id", "svc1", "--name", "blocklist", "--autoclone"])
        .assert()
        .success()
        .stdout(contains("SUCCESS: Created ACL 'blocklist' (id: acl1, service: svc1, version: 2)"))
        .stderr(contains("Now operating on version 2"));

    versions.assert_hits(1);
    clone.assert_hits(1);
    create.assert_hits(1);
}

#[test]
fn active_version_without_autoclone_is_rejected() {
    let server = MockServer::start();
    let project = project();

    server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version");
        then.status(200)
            .json_body(json!([{"number": 1, "active": true, "locked": false}]));
    });
    let clone = server.mock(|when, then| {
        when.method(PUT).path("/service/svc1/version/1/clone");
        then.status(200).json_body(json!({"number": 2}));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path_contains("/acl");
        then.status(200).json_body(json!({"id": "acl1", "name": "blocklist"}));
    });

    fastly_cmd(&server, &project)
        .args(["acl", "create", "-s", "svc1", "--name", "blocklist"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("VERSION_NOT_EDITABLE").and(contains("--autoclone")));

    clone.assert_hits(0);
    create.assert_hits(0);
}

#[test]
fn service_id_flag_wins_over_service_name() {
    let server = MockServer::start();
    let project = project();

    let search = server.mock(|when, then| {
        when.method(GET).path("/service/search");
        then.status(200).json_body(json!({"id": "other", "name": "www"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version");
        then.status(200)
            .json_body(json!([{"number": 1, "active": true}, {"number": 2}]));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version/2/acl");
        then.status(200)
            .json_body(json!([{"id": "acl1", "name": "blocklist"}]));
    });

    fastly_cmd(&server, &project)
        .args(["acl", "list", "--service-id", "svc1", "--service-name", "www"])
        .assert()
        .success()
        .stdout(contains("blocklist").and(contains("acl1")));

    search.assert_hits(0);
    list.assert_hits(1);
}

#[test]
fn service_name_is_looked_up_and_reported_in_verbose_mode() {
    let server = MockServer::start();
    let project = project();

    let search = server.mock(|when, then| {
        when.method(GET).path("/service/search").query_param("name", "www");
        then.status(200)
            .json_body(json!({"id": "svc-by-name", "name": "www"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/service/svc-by-name/version");
        then.status(200).json_body(json!([{"number": 1, "active": true}]));
    });

    fastly_cmd(&server, &project)
        .args(["service-version", "list", "--service-name", "www", "--verbose"])
        .assert()
        .success()
        .stdout(contains("NUMBER"))
        .stderr(contains("Service ID (via --service-name): svc-by-name"));

    search.assert_hits(1);
}

#[test]
fn manifest_supplies_service_id() {
    let server = MockServer::start();
    let project = project();
    std::fs::write(
        project.path().join("fastly.toml"),
        "manifest_version = 2\nname = \"app\"\nservice_id = \"svc-file\"\n",
    )
    .unwrap();

    let versions = server.mock(|when, then| {
        when.method(GET).path("/service/svc-file/version");
        then.status(200)
            .json_body(json!([{"number": 1, "active": true, "comment": "initial"}]));
    });

    fastly_cmd(&server, &project)
        .args(["service-version", "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"type\":\"result\"").and(contains("\"service_id\":\"svc-file\"")));

    versions.assert_hits(1);
}

#[test]
fn environment_beats_manifest() {
    let server = MockServer::start();
    let project = project();
    std::fs::write(project.path().join("fastly.toml"), "service_id = \"svc-file\"\n").unwrap();

    let versions = server.mock(|when, then| {
        when.method(GET).path("/service/svc-env/version");
        then.status(200).json_body(json!([{"number": 1}]));
    });

    fastly_cmd(&server, &project)
        .env("FASTLY_SERVICE_ID", "svc-env")
        .args(["service-version", "list"])
        .assert()
        .success();

    versions.assert_hits(1);
}

#[test]
fn missing_service_id_fails_without_network() {
    let server = MockServer::start();
    let project = project();

    let any = server.mock(|when, then| {
        when.path_contains("/service");
        then.status(500);
    });

    fastly_cmd(&server, &project)
        .args(["acl", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("NO_SERVICE_ID"));

    any.assert_hits(0);
}

#[test]
fn version_zero_is_rejected_before_any_request() {
    let server = MockServer::start();
    let project = project();

    let versions = server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version");
        then.status(200).json_body(json!([{"number": 1}]));
    });

    fastly_cmd(&server, &project)
        .args(["dictionary", "create", "-s", "svc1", "--version", "0", "--name", "d"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("INVALID_VERSION"));

    versions.assert_hits(0);
}

#[test]
fn unknown_version_number_is_reported() {
    let server = MockServer::start();
    let project = project();

    server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version");
        then.status(200).json_body(json!([{"number": 1}, {"number": 2}]));
    });

    fastly_cmd(&server, &project)
        .args(["acl", "describe", "-s", "svc1", "--version", "7", "--name", "blocklist"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("VERSION_NOT_FOUND"));
}

#[test]
fn acl_entry_list_follows_pages() {
    let server = MockServer::start();
    let project = project();
    let next = format!(
        "<{}/service/svc1/acl/acl1/entries?page=2&per_page=1>; rel=\"next\", <{}/service/svc1/acl/acl1/entries?page=2&per_page=1>; rel=\"last\"",
        server.base_url(),
        server.base_url()
    );

    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/service/svc1/acl/acl1/entries")
            .query_param("page", "1");
        then.status(200)
            .header("Link", next.as_str())
            .json_body(json!([{"id": "e1", "ip": "10.0.0.1", "negated": "0"}]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/service/svc1/acl/acl1/entries")
            .query_param("page", "2");
        then.status(200)
            .json_body(json!([{"id": "e2", "ip": "10.0.0.2", "subnet": 24, "negated": "1"}]));
    });

    fastly_cmd(&server, &project)
        .args(["acl-entry", "list", "-s", "svc1", "--acl-id", "acl1", "--per-page", "1", "--json"])
        .assert()
        .success()
        .stdout(contains("\"ip\":\"10.0.0.1\"").and(contains("\"ip\":\"10.0.0.2\"")));

    page1.assert_hits(1);
    page2.assert_hits(1);
}

#[test]
fn acl_entry_list_surfaces_page_errors() {
    let server = MockServer::start();
    let project = project();
    let next = format!(
        "<{}/service/svc1/acl/acl1/entries?page=2>; rel=\"next\", <{}/service/svc1/acl/acl1/entries?page=3>; rel=\"last\"",
        server.base_url(),
        server.base_url()
    );

    server.mock(|when, then| {
        when.method(GET)
            .path("/service/svc1/acl/acl1/entries")
            .query_param("page", "1");
        then.status(200)
            .header("Link", next.as_str())
            .json_body(json!([{"id": "e1", "ip": "10.0.0.1"}]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/service/svc1/acl/acl1/entries")
            .query_param("page", "2");
        then.status(503).json_body(json!({"msg": "Service unavailable"}));
    });
    let page3 = server.mock(|when, then| {
        when.method(GET)
            .path("/service/svc1/acl/acl1/entries")
            .query_param("page", "3");
        then.status(200).json_body(json!([]));
    });

    fastly_cmd(&server, &project)
        .args(["acl-entry", "list", "-s", "svc1", "--acl-id", "acl1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("2 page(s) remaining").and(contains("Service unavailable")));

    page3.assert_hits(0);
}

#[test]
fn missing_token_is_a_configuration_error() {
    let project = project();
    Command::cargo_bin("fastly")
        .expect("fastly binary")
        .env("FASTLY_PROJECT_DIR", project.path())
        .env_remove("FASTLY_API_TOKEN")
        .args(["service", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("MISSING_TOKEN"));
}

#[test]
fn malformed_manifest_is_ignored_when_a_flag_names_the_service() {
    let server = MockServer::start();
    let project = project();
    std::fs::write(project.path().join("fastly.toml"), "service_id = [\n").unwrap();

    server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version");
        then.status(200).json_body(json!([{"number": 1, "active": true}]));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version/1/acl");
        then.status(200)
            .json_body(json!([{"id": "acl1", "name": "blocklist"}]));
    });

    fastly_cmd(&server, &project)
        .args(["acl", "list", "--service-id", "svc1"])
        .assert()
        .success()
        .stdout(contains("blocklist"));
    list.assert_hits(1);

    fastly_cmd(&server, &project)
        .args(["acl", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("MANIFEST_INVALID"));
}

#[test]
fn malformed_api_payload_is_an_upstream_error() {
    let server = MockServer::start();
    let project = project();

    server.mock(|when, then| {
        when.method(GET).path("/service/svc1/version");
        then.status(200)
            .header("Content-Type", "application/json")
            .body("<html>maintenance</html>");
    });

    fastly_cmd(&server, &project)
        .args(["service-version", "list", "-s", "svc1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("[ext][INVALID_RESPONSE]"));
}
