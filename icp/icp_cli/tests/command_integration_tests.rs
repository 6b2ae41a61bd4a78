use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

const SECRET: &str = "sb-service-role-do-not-print";
const PROFILE_ID: &str = "42b581ec-7aa8-4eba-9e48-e94c6bf36afa";

/// A command with no ambient credentials or proxies.
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("icp_cli").unwrap();
    for var in [
        "SUPABASE_URL",
        "NEXT_PUBLIC_SUPABASE_URL",
        "SUPABASE_SERVICE_ROLE_KEY",
        "RUST_LOG",
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Serve one request per body, in order, and return the raw request texts.
fn serve(bodies: Vec<&'static str>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for body in bodies {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_lowercase().strip_prefix("content-length:") {
                    length = value.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut request_body = vec![0; length];
            reader.read_exact(&mut request_body).unwrap();

            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();

            requests.push(head + &String::from_utf8(request_body).unwrap());
        }
        requests
    });

    (url, handle)
}

/// Serve a single request with a JSON body and return the raw request text.
fn serve_once(body: &'static str) -> (String, thread::JoinHandle<String>) {
    let (url, handle) = serve(vec![body]);
    let single = thread::spawn(move || handle.join().unwrap().remove(0));
    (url, single)
}

#[test]
fn test_help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push-icp"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("reset-phase"));
}

#[test]
fn test_dry_run_with_embedded_payload() {
    cli()
        .args(["push-icp", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("where id = {PROFILE_ID}")))
        .stdout(predicate::str::contains("\"phase_2_icp_report\""))
        .stdout(predicate::str::contains("\"workflow_status\": \"icp_ready\""))
        .stdout(predicate::str::contains("Dry run! ICP Count: 0"));
}

#[test]
fn test_dry_run_counts_payload_file() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("icp.json");
    fs::write(
        &payload,
        r#"{"icp_reports": [{"icp_id": "ICP-001"}, {"icp_id": "ICP-002"}, {"icp_id": "ICP-003"}]}"#,
    )
    .unwrap();

    cli()
        .args(["push-icp", "--dry-run", "--payload"])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("ICP-003"))
        .stdout(predicate::str::contains("Dry run! ICP Count: 3"));
}

#[test]
fn test_dry_run_never_prints_secret() {
    cli()
        .args(["-vv", "push-icp", "--dry-run"])
        .env("SUPABASE_URL", "https://example.supabase.co")
        .env("SUPABASE_SERVICE_ROLE_KEY", SECRET)
        .assert()
        .success()
        .stdout(predicate::str::contains(SECRET).not())
        .stderr(predicate::str::contains(SECRET).not());
}

#[test]
fn test_missing_credentials_fail() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .current_dir(dir.path())
        .arg("push-icp")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing Supabase credentials"));
}

#[test]
fn test_invalid_profile_id_rejected() {
    cli()
        .args(["push-icp", "--dry-run", "--profile-id", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid profile id"));
}

#[test]
fn test_missing_payload_file_fails() {
    cli()
        .args(["push-icp", "--dry-run", "--payload", "/nonexistent/icp.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load ICP payload"));
}

#[test]
fn test_push_sends_one_patch_and_prints_count() {
    let (url, server) = serve_once(r#"[{"id": "42b581ec-7aa8-4eba-9e48-e94c6bf36afa"}]"#);
    let dir = tempfile::tempdir().unwrap();

    cli()
        .current_dir(dir.path())
        .args(["-vvv", "push-icp"])
        .env("SUPABASE_URL", &url)
        .env("SUPABASE_SERVICE_ROLE_KEY", SECRET)
        .assert()
        .success()
        .stdout(predicate::str::diff("Updated! ICP Count: 0\n"))
        .stderr(predicate::str::contains(SECRET).not());

    let request = server.join().unwrap();
    assert!(request.starts_with(&format!(
        "PATCH /rest/v1/company_profiles?id=eq.{PROFILE_ID} HTTP/1.1"
    )));
    assert!(request.contains(r#""workflow_status":"icp_ready""#));
}

#[test]
fn test_config_file_supplies_credentials() {
    let (url, server) = serve_once(r#"[{"company_report": {"phase_data": {"phase_2_icp_report": {"icp_reports": [1, 2]}}}}]"#);
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("icp.toml");
    fs::write(
        &config,
        format!("[store]\nurl = \"{url}\"\nservice_key = \"{SECRET}\"\n"),
    )
    .unwrap();

    cli()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("phase_2_icp_report exists? true"))
        .stdout(predicate::str::contains("ICP Count: 2"));

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /rest/v1/company_profiles?id=eq."));
    assert!(request.contains("select=company_report"));
}

#[test]
fn test_inspect_json_output_parses() {
    let (url, server) = serve_once(
        r#"[{"company_report": {"phase_data": {"phase_2_icp_report": null, "phase_2": {"x": 1}}}}]"#,
    );
    let dir = tempfile::tempdir().unwrap();

    let output = cli()
        .current_dir(dir.path())
        .args(["-v", "inspect", "--json"])
        .env("SUPABASE_URL", &url)
        .env("SUPABASE_SERVICE_ROLE_KEY", SECRET)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["profile_id"], PROFILE_ID);
    assert_eq!(parsed["has_icp_report"], false);
    assert_eq!(parsed["has_phase_2"], true);
    assert_eq!(parsed["icp_count"], serde_json::Value::Null);
    server.join().unwrap();
}

#[test]
fn test_dry_run_merge_explains_body() {
    cli()
        .args(["push-icp", "--dry-run", "--merge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge mode: the stored company_report is read first"))
        .stdout(predicate::str::contains("Dry run! ICP Count: 0"));
}

#[test]
fn test_reset_phase_reads_then_patches() {
    let (url, server) = serve(vec![
        r#"[{"company_report": {"current_phase": "phase_2_icp_creation"}}]"#,
        r#"[{"id": "42b581ec-7aa8-4eba-9e48-e94c6bf36afa"}]"#,
    ]);
    let dir = tempfile::tempdir().unwrap();

    cli()
        .current_dir(dir.path())
        .arg("reset-phase")
        .env("SUPABASE_URL", &url)
        .env("SUPABASE_SERVICE_ROLE_KEY", SECRET)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully reset project to Phase 1. User can now regenerate ICPs.",
        ));

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET "));
    assert!(requests[1].starts_with("PATCH "));
    assert!(requests[1].contains(r#""workflow_status":"completed""#));
    assert!(requests[1].contains(r#""phase_data":{}"#));
}
