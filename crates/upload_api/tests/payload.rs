use upload_api::{SkippedFile, UploadResponse};

#[test]
fn decodes_mixed_upload_outcome() {
    let body = r#"{
        "uploaded_files": [
            "https://uploads.example/u/abc/report.pdf",
            "https://uploads.example/u/abc/notes.txt"
        ],
        "skipped_files": [
            { "name": "binary.exe", "reason": "executable files are not allowed" }
        ]
    }"#;

    let decoded: UploadResponse = serde_json::from_str(body).expect("response should decode");
    assert_eq!(decoded.uploaded_files.len(), 2);
    assert_eq!(
        decoded.skipped_files,
        vec![SkippedFile {
            name: "binary.exe".to_string(),
            reason: "executable files are not allowed".to_string(),
        }]
    );
}

#[test]
fn missing_fields_decode_as_empty_lists() {
    let decoded: UploadResponse = serde_json::from_str("{}").expect("response should decode");
    assert!(decoded.uploaded_files.is_empty());
    assert!(decoded.skipped_files.is_empty());

    let uploads_only: UploadResponse =
        serde_json::from_str(r#"{"uploaded_files":["https://uploads.example/u/1/a.txt"]}"#)
            .expect("response should decode");
    assert_eq!(uploads_only.uploaded_files.len(), 1);
    assert!(uploads_only.skipped_files.is_empty());
}

#[test]
fn response_round_trips_through_json() {
    let response = UploadResponse {
        uploaded_files: vec!["https://uploads.example/u/1/a.txt".to_string()],
        skipped_files: vec![SkippedFile {
            name: "b.bin".to_string(),
            reason: "unsupported type".to_string(),
        }],
    };

    let encoded = serde_json::to_string(&response).expect("serializes");
    let decoded: UploadResponse = serde_json::from_str(&encoded).expect("deserializes");
    assert_eq!(decoded, response);
}
