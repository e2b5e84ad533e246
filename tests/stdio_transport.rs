use std::{path::PathBuf, process::Stdio, time::Duration};

use serde_json::Value;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::Command,
    time::timeout,
};

const INITIALIZE: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"stdio-test","version":"0.0.0"}}}"#;

/// A font without widths makes pdf-extract print diagnostics while the résumé loads; none of
/// that may precede the first JSON-RPC reply.
#[tokio::test]
async fn pdf_diagnostics_stay_off_the_protocol_stream() {
    let workdir = tempfile::tempdir().expect("temp dir");
    let resume = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/no_widths.pdf");

    let mut child = Command::new(env!("CARGO_BIN_EXE_cv-mcp-stdio"))
        .current_dir(workdir.path())
        .env("RESUME_PATH", &resume)
        .env("EMBEDDING_PROVIDER", "none")
        .env("CVMCP_LOG_FILE", workdir.path().join("cvmcp.log"))
        .env_remove("OPENAI_API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("spawn stdio server");

    let mut stdin = child.stdin.take().expect("stdin");
    stdin
        .write_all(format!("{INITIALIZE}\n").as_bytes())
        .await
        .expect("send initialize");
    stdin.flush().await.expect("flush");

    let stdout = child.stdout.take().expect("stdout");
    let mut lines = BufReader::new(stdout).lines();
    let first = timeout(Duration::from_secs(30), lines.next_line())
        .await
        .expect("reply before timeout")
        .expect("read stdout")
        .expect("server wrote a line");

    let reply: Value = serde_json::from_str(&first)
        .unwrap_or_else(|err| panic!("first stdout line is not JSON ({err}): {first}"));
    assert_eq!(reply["jsonrpc"], "2.0");
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["serverInfo"]["name"], "cv-mcp");

    drop(stdin);
    let _ = child.kill().await;
}
