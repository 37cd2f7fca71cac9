//! CLI smoke tests. None of these reach the network: every failing case is
//! rejected by local checks before the RPC endpoint is contacted.

use assert_cmd::Command;
use serde_json::Value;
use solana_sdk::signature::{write_keypair_file, Keypair};

const UNREACHABLE_RPC: &str = "http://127.0.0.1:9";

fn verigrad() -> Command {
    let mut cmd = Command::cargo_bin("verigrad").unwrap();
    for var in [
        "VERIGRAD_RPC_URL",
        "VERIGRAD_PROGRAM_ID",
        "VERIGRAD_COMMITMENT",
        "VERIGRAD_KEYPAIR",
        "VERIGRAD_METADATA_BASE_URI",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

const FORM: [&str; 10] = [
    "--student-name",
    "Jane Smith",
    "--degree-program",
    "Computer Science",
    "--degree-type",
    "BSc",
    "--institution",
    "Tech University",
    "--year",
    "2024",
];

#[test]
fn idl_prints_interface_summary() {
    let output = verigrad().args(["--json", "idl"]).output().unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["name"], "verigrad");
    assert_eq!(v["instructions"][0]["name"], "issueDiploma");
    assert_eq!(v["instructions"][0]["discriminator"].as_array().unwrap().len(), 8);
    assert_eq!(v["accounts"][0]["name"], "Diploma");
}

#[test]
fn issue_without_keypair_reports_disconnected_wallet() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("id.json");

    let output = verigrad()
        .args(["--json", "--rpc-url", UNREACHABLE_RPC, "--keypair"])
        .arg(&missing)
        .arg("issue")
        .args(FORM)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["ok"], false);
    assert_eq!(v["kind"], "signer_missing");
    assert_eq!(v["message"], "Please connect your wallet first.");
}

#[test]
fn record_with_blank_name_reports_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let keypair = dir.path().join("id.json");
    write_keypair_file(&Keypair::new(), &keypair).unwrap();

    let mut form = FORM;
    form[1] = "  ";
    let output = verigrad()
        .args(["--json", "--rpc-url", UNREACHABLE_RPC, "--keypair"])
        .arg(&keypair)
        .arg("record")
        .args(form)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["kind"], "missing_fields");
    assert_eq!(v["message"], "Please fill in all required fields.");
    assert!(v["detail"].as_str().unwrap().contains("studentName"));
}

#[test]
fn non_http_rpc_url_is_rejected() {
    let output = verigrad()
        .args(["--rpc-url", "ftp://example.com", "show", "11111111111111111111111111111111"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "stderr: {stderr}");
}

#[test]
fn list_requires_a_view() {
    let output = verigrad().arg("list").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn malformed_address_is_rejected_locally() {
    let output = verigrad()
        .args([
            "--rpc-url",
            UNREACHABLE_RPC,
            "verify",
            "--mint",
            "0xabc",
            "--holder",
            "11111111111111111111111111111111",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid mint address"), "stderr: {stderr}");
}
