
use serde_json::json;
use std::sync::atomic::Ordering;
use test_support::{base_student, connect, request_err, request_ok, spawn_sidecar, start_stub};

#[test]
fn create_update_delete_roundtrip() {
    let stub = start_stub("tok", vec![], vec![], vec![]);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    connect(&mut stdin, &mut reader, &stub.base_url, "tok");

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({ "input": {
            "firstName": "Zeynep",
            "lastName": "Arslan",
            "nationalId": "23456789012",
            "phone": "0542 111 22 33",
            "licenseType": "B"
        }}),
    );
    let student = &created["student"];
    let id = student["id"].as_str().expect("student id").to_string();
    assert_eq!(student["examStatus"]["written"]["display"], "Henüz Girmedi");
    assert_eq!(student["overall"]["status"], "waiting");
    assert_eq!(student["canAttempt"]["written"], true);
    // Driving waits for the written exam.
    assert_eq!(student["canAttempt"]["driving"], false);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.update",
        json!({ "studentId": id, "input": {
            "firstName": "Zeynep",
            "lastName": "Arslan-Koç",
            "nationalId": "23456789012",
            "phone": "05421112233"
        }}),
    );
    assert_eq!(updated["student"]["lastName"], "Arslan-Koç");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.delete",
        json!({ "studentId": id }),
    );
    let err = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "students.get",
        json!({ "studentId": id }),
    );
    assert_eq!(err.get("code").and_then(|v| v.as_str()), Some("api_error"));
    assert_eq!(
        err.get("message").and_then(|v| v.as_str()),
        Some("Öğrenci bulunamadı")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn validation_failures_never_reach_the_network() {
    let stub = start_stub("tok", vec![], vec![], vec![]);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    connect(&mut stdin, &mut reader, &stub.base_url, "tok");

    let before = stub.hits.load(Ordering::SeqCst);

    let err = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({ "input": {
            "firstName": "Zeynep",
            "lastName": "Arslan",
            "nationalId": "23456789012",
            "phone": "0212 123 45 67"
        }}),
    );
    assert_eq!(
        err.get("code").and_then(|v| v.as_str()),
        Some("validation_failed")
    );
    assert_eq!(err["details"]["field"], "phone");

    let err = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({ "input": {
            "firstName": "Zeynep",
            "lastName": "Arslan",
            "nationalId": "1234",
            "phone": "05421112233"
        }}),
    );
    assert_eq!(err["details"]["field"], "nationalId");

    // A well-formed record proves the counter moves at all.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        json!({ "input": {
            "firstName": "Zeynep",
            "lastName": "Arslan",
            "nationalId": "23456789012",
            "phone": "05421112233"
        }}),
    );
    assert_eq!(stub.hits.load(Ordering::SeqCst), before + 1);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn list_filter_passes_through_as_query() {
    let mut active = base_student("s1", "Ayşe", "Yilmaz");
    active["status"] = json!("active");
    let mut inactive = base_student("s2", "Ali", "Kaya");
    inactive["status"] = json!("inactive");
    let stub = start_stub("tok", vec![active, inactive], vec![], vec![]);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    connect(&mut stdin, &mut reader, &stub.base_url, "tok");

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.list",
        json!({ "status": "inactive" }),
    );
    let students = result["students"].as_array().expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["id"], "s2");

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "search": "Yilmaz" }),
    );
    let students = result["students"].as_array().expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["id"], "s1");

    drop(stdin);
    let _ = child.wait();
}
