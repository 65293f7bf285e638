use uritemplate::cli::{expand_command, match_command, order_command, parse_key_value};

fn kv(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_expand_with_vars_and_lists() {
    let out = expand_command(
        "/search{?q,tags}",
        &kv(&[("q", "a b")]),
        &kv(&[("tags", "x,y")]),
        None,
    )
    .unwrap();
    assert_eq!(out, "/search?q=a%20b&tags=x,y");
}

#[test]
fn test_expand_with_json_and_override() {
    let out = expand_command(
        "/users/{id}{?fields*}",
        &kv(&[("id", "7")]),
        &[],
        Some(r#"{"id": 1, "fields": ["name", "email"]}"#),
    )
    .unwrap();
    assert_eq!(out, "/users/7?fields=name&fields=email");
}

#[test]
fn test_expand_rejects_bad_input() {
    assert!(expand_command("/a/{b", &[], &[], None).is_err());
    assert!(expand_command("/a", &[], &[], Some("[1, 2]")).is_err());
    assert!(expand_command("/a", &[], &[], Some("{not json")).is_err());
}

#[test]
fn test_match_prints_json() {
    let out = match_command("/users/{id}/posts/{post}", "/users/1/posts/2").unwrap();
    assert_eq!(out.as_deref(), Some(r#"{"id":"1","post":"2"}"#));
    assert_eq!(match_command("/users/{id}", "/pets/1").unwrap(), None);
}

#[test]
fn test_order_templates() {
    let templates = vec![
        "/{path}".to_string(),
        "/users/{id}".to_string(),
        "/users/list".to_string(),
    ];
    assert_eq!(
        order_command(&templates).unwrap(),
        vec!["/users/list", "/users/{id}", "/{path}"]
    );
    assert!(order_command(&["/a}".to_string()]).is_err());
}

#[test]
fn test_parse_key_value() {
    assert_eq!(
        parse_key_value("q=a=b"),
        Ok(("q".to_string(), "a=b".to_string()))
    );
    assert!(parse_key_value("q").is_err());
}
