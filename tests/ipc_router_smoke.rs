
use serde_json::json;
use test_support::{
    base_student, instructor, lesson, request, request_ok, spawn_sidecar, start_stub,
};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let mut s1 = base_student("s1", "Ayşe", "Yılmaz");
    s1["instructorId"] = json!("i1");
    let stub = start_stub(
        "smoke-token",
        vec![s1, base_student("s2", "Ali", "Kaya")],
        vec![lesson("l1", "s1", "i1", 1, "2026-04-14", "SCHEDULED")],
        vec![instructor("i1", "Mehmet", "Demir")],
    );
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health.get("connected"), Some(&json!(false)));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.connect",
        json!({ "baseUrl": stub.base_url, "token": "smoke-token" }),
    );
    let status = request_ok(&mut stdin, &mut reader, "3", "session.status", json!({}));
    assert_eq!(status.get("connected"), Some(&json!(true)));

    let methods: Vec<(&str, serde_json::Value)> = vec![
        ("students.list", json!({})),
        ("students.get", json!({ "studentId": "s1" })),
        (
            "students.create",
            json!({ "input": {
                "firstName": "Zeynep",
                "lastName": "Arslan",
                "nationalId": "23456789012",
                "phone": "05421112233"
            }}),
        ),
        ("students.completed", json!({})),
        ("students.passedWrittenExam", json!({})),
        (
            "exams.markWritten",
            json!({ "studentId": "s2", "status": "passed", "examDate": "2026-04-10" }),
        ),
        ("exams.reset", json!({ "studentId": "s2", "examType": "written" })),
        ("cohorts.multipleDrivingFailures", json!({})),
        ("cohorts.rightsExhausted", json!({})),
        ("lessons.eligibleStudents", json!({})),
        ("lessons.list", json!({})),
        (
            "lessons.scheduleTomorrow",
            json!({ "studentIds": ["s1"], "date": "2026-04-15" }),
        ),
        ("payments.rows", json!({ "studentId": "s1" })),
        ("instructors.list", json!({})),
    ];
    for (i, (method, params)) in methods.into_iter().enumerate() {
        let resp = request(&mut stdin, &mut reader, &format!("m{}", i), method, params);
        let code = resp
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        assert_ne!(code, "not_implemented", "unknown method {}", method);
        assert_ne!(code, "bad_params", "bad params for {}: {}", method, resp);
    }

    let _ = request_ok(&mut stdin, &mut reader, "out", "session.logout", json!({}));

    drop(stdin);
    let _ = child.wait();
}
