use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    writeln!(
        stdin,
        "{}",
        json!({ "id": id, "method": method, "params": params })
    )
    .expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn result_of(resp: serde_json::Value) -> serde_json::Value {
    assert_eq!(resp["ok"], json!(true), "expected ok response: {}", resp);
    resp["result"].clone()
}

fn error_code(resp: serde_json::Value) -> String {
    assert_eq!(resp["ok"], json!(false), "expected error response: {}", resp);
    resp["error"]["code"].as_str().expect("error code").to_string()
}

/// Anita (101), anand (102), bob (103).
fn seed_names(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    for (i, (name, score)) in [("Anita", "80"), ("anand", "92"), ("bob", "75")]
        .iter()
        .enumerate()
    {
        let resp = request(
            stdin,
            reader,
            &format!("seed{}", i),
            "students.create",
            json!({ "name": name, "score": score }),
        );
        let _ = result_of(resp);
    }
}

#[test]
fn id_search_returns_exactly_the_matching_student() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let found = result_of(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.search",
        json!({ "type": "ID", "query": "102" }),
    ));
    let matches = found["matches"].as_array().expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], json!("anand"));

    let missing = result_of(request(
        &mut stdin,
        &mut reader,
        "2",
        "students.search",
        json!({ "type": "ID", "query": "999" }),
    ));
    assert_eq!(missing["matches"].as_array().map(|a| a.len()), Some(0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn name_search_is_case_insensitive_substring() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let found = result_of(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.search",
        json!({ "type": "Name", "query": "an" }),
    ));
    let names: Vec<&str> = found["matches"]
        .as_array()
        .expect("matches")
        .iter()
        .map(|m| m["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Anita", "anand"]);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn non_numeric_id_search_is_invalid_query_and_mutates_nothing() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let code = error_code(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.search",
        json!({ "type": "ID", "query": "abc" }),
    ));
    assert_eq!(code, "invalid_query");

    let listed = result_of(request(&mut stdin, &mut reader, "2", "students.list", json!({})));
    assert_eq!(listed["students"].as_array().map(|a| a.len()), Some(3));
    assert_eq!(listed["nextId"], json!(104));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn unknown_search_type_is_bad_params() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let code = error_code(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.search",
        json!({ "type": "Score", "query": "90" }),
    ));
    assert_eq!(code, "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn lookup_dispatches_on_numeric_vs_text() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let by_id = result_of(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.lookup",
        json!({ "query": "101" }),
    ));
    assert_eq!(by_id["matches"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(by_id["ambiguous"], json!(false));

    let by_name = result_of(request(
        &mut stdin,
        &mut reader,
        "2",
        "students.lookup",
        json!({ "query": "AN" }),
    ));
    assert_eq!(by_name["matches"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(by_name["ambiguous"], json!(true));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn lookup_misses_and_empty_input_are_reported() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let code = error_code(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.lookup",
        json!({ "query": "zzz" }),
    ));
    assert_eq!(code, "not_found");

    let code = error_code(request(
        &mut stdin,
        &mut reader,
        "2",
        "students.lookup",
        json!({ "query": "   " }),
    ));
    assert_eq!(code, "validation_error");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn ambiguous_lookup_then_explicit_update_touches_only_the_chosen_row() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    seed_names(&mut stdin, &mut reader);

    let found = result_of(request(
        &mut stdin,
        &mut reader,
        "1",
        "students.lookup",
        json!({ "query": "an" }),
    ));
    assert_eq!(found["ambiguous"], json!(true));
    let ids: Vec<i64> = found["matches"]
        .as_array()
        .expect("matches")
        .iter()
        .map(|m| m["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![101, 102]);

    // The frontend picked the second candidate; only that row changes.
    let _ = result_of(request(
        &mut stdin,
        &mut reader,
        "2",
        "students.update",
        json!({ "id": 102, "name": "anand v", "score": "93" }),
    ));

    let listed = result_of(request(&mut stdin, &mut reader, "3", "students.list", json!({})));
    let students = listed["students"].as_array().expect("students");
    assert_eq!(students[0]["id"], json!(101));
    assert_eq!(students[0]["name"], json!("Anita"));
    assert_eq!(students[0]["score"], json!(80.0));
    assert_eq!(students[1]["id"], json!(102));
    assert_eq!(students[1]["name"], json!("anand v"));
    assert_eq!(students[1]["score"], json!(93.0));

    drop(stdin);
    let _ = child.wait();
}
