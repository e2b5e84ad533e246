use cvmcp::{
    embedding::Embedder,
    resume::{Answer, ExtractError, ResumeApi, ResumeService, ServiceError, extract::extract_text},
};
use std::io::Write;
use std::path::PathBuf;

const RESUME: &str = "Jane Doe\n\nEXPERIENCE\n• Sep 2023 - Present\n• Platform Lead\n• Initech\n\nSkills\nRust, Go\n";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn write_resume(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(body.as_bytes()).expect("write resume");
    file
}

#[tokio::test]
async fn loads_markdown_resume_from_disk() {
    let file = write_resume(".md", RESUME);
    let service = ResumeService::load(file.path(), Embedder::Disabled)
        .await
        .expect("load resume");

    assert_eq!(service.sections().len(), 2);
    assert_eq!(service.chunk_count(), 3);
    assert!(!service.embeddings_enabled());

    match service
        .answer("What is my latest job title?")
        .await
        .expect("answer")
    {
        Answer::Synthesized { answer, evidence } => {
            assert_eq!(
                answer,
                "Your latest job title is Platform Lead at Initech (Sep 2023 - Present)."
            );
            assert_eq!(evidence.idx, 2);
        }
        other => panic!("expected synthesized answer, got {other:?}"),
    }

    match service.answer("rust").await.expect("answer") {
        Answer::Snippets { answer, snippets } => {
            assert!(answer.is_none());
            assert_eq!(snippets.len(), 3);
        }
        other => panic!("expected snippets, got {other:?}"),
    }

    let snapshot = service.metrics_snapshot();
    assert_eq!(snapshot.synthesized_answers, 1);
    assert_eq!(snapshot.snippet_answers, 1);
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let file = write_resume(".rtf", RESUME);
    let err = ResumeService::load(file.path(), Embedder::Disabled)
        .await
        .err()
        .expect("rtf should fail");
    assert!(matches!(
        err,
        ServiceError::Extract(ExtractError::UnsupportedFormat { .. })
    ));
}

#[tokio::test]
async fn missing_file_reports_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ResumeService::load(&dir.path().join("resume.pdf"), Embedder::Disabled)
        .await
        .err()
        .expect("missing file should fail");
    assert!(matches!(err, ServiceError::Extract(ExtractError::NotFound { .. })));
}

#[tokio::test]
async fn pdf_text_layer_is_extracted() {
    let text = extract_text(&fixture("resume.pdf"))
        .await
        .expect("text-layer pdf");
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Acme Corp"));
    assert!(text.chars().filter(|ch| !ch.is_whitespace()).count() >= 30);
}

#[tokio::test]
async fn sparse_pdf_is_treated_as_scan() {
    let err = extract_text(&fixture("scanned.pdf"))
        .await
        .expect_err("ten characters is below the text-layer threshold");
    assert!(matches!(err, ExtractError::NoExtractableText));
}
