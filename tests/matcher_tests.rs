use std::collections::HashMap;
use std::sync::Arc;
use uritemplate::{UriTemplateError, UriTemplateMatcher};

fn captured(template: &str, uri: &str) -> Option<Vec<(String, String)>> {
    UriTemplateMatcher::new(template)
        .unwrap()
        .match_uri(uri)
        .map(|info| {
            info.values()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        })
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_nested_resource_paths() {
    assert_eq!(
        captured("/users/{id}/posts/{post}", "/users/99/posts/abc"),
        Some(pairs(&[("id", "99"), ("post", "abc")]))
    );
    assert_eq!(
        captured("/users/{id}/posts", "/users/99/posts/?page=2"),
        Some(pairs(&[("id", "99")]))
    );
    assert_eq!(captured("/users/{id}/posts", "/users/99"), None);
}

#[test]
fn test_percent_encoded_values_are_returned_raw() {
    assert_eq!(
        captured("/books/{title}", "/books/moby%20dick"),
        Some(pairs(&[("title", "moby%20dick")]))
    );
}

#[test]
fn test_regex_modifiers() {
    let m = UriTemplateMatcher::new("/reports/{year:[0-9]{4}}{.format}").unwrap();
    let info = m.match_uri("/reports/2024.json").unwrap();
    assert_eq!(info.get("year"), Some("2024"));
    assert_eq!(info.get("format"), Some("json"));
    assert!(m.match_uri("/reports/24.json").is_none());
    assert!(m.match_uri("/reports/2024").is_none());
}

#[test]
fn test_optional_path_segment() {
    let m = UriTemplateMatcher::new("/docs{/page}").unwrap();
    assert_eq!(m.match_uri("/docs/intro").unwrap().get("page"), Some("intro"));
    assert!(m.match_uri("/docs").unwrap().values().is_empty());
}

#[test]
fn test_reserved_expansion_spans_slashes() {
    assert_eq!(
        captured("/static/{+file}", "/static/css/site.css"),
        Some(pairs(&[("file", "css/site.css")]))
    );
    assert_eq!(captured("/static/{file}", "/static/css/site.css"), None);
}

#[test]
fn test_variable_metadata() {
    let m = UriTemplateMatcher::new("/files/{+path}{?q}{#frag}").unwrap();
    let variables = m.variables();
    assert_eq!(m.variable_names(), vec!["path", "q", "frag"]);

    assert_eq!(variables[0].operator(), '+');
    assert_eq!(variables[0].modifier(), '0');
    assert!(!variables[0].is_optional());
    assert!(!variables[0].is_query());

    assert!(variables[1].is_query());
    assert!(variables[1].is_optional());
    assert!(variables[2].is_query());

    let exploded = UriTemplateMatcher::new("/a{/rest*}").unwrap();
    assert!(exploded.variables()[0].is_exploded());
}

#[test]
fn test_root_template() {
    let m = UriTemplateMatcher::new("/").unwrap();
    assert!(m.is_root());
    assert!(m.matches("/"));
    assert!(m.matches(""));
    assert!(m.matches("/?x=1"));
    assert!(!m.matches("/x"));
    assert_eq!(m.match_uri("/").unwrap().uri(), "/");
}

#[test]
fn test_sorting_prefers_specific_templates() {
    let mut matchers: Vec<UriTemplateMatcher> = [
        "/{a}/{b}",
        "/static/{+file}",
        "/static/index.html",
        "/{a}",
        "/static/{file}",
    ]
    .iter()
    .map(|t| t.parse().unwrap())
    .collect();
    matchers.sort();
    let ordered: Vec<String> = matchers.iter().map(ToString::to_string).collect();
    assert_eq!(
        ordered,
        vec![
            "/static/index.html",
            "/static/{+file}",
            "/static/{file}",
            "/{a}/{b}",
            "/{a}",
        ]
    );
}

#[test]
fn test_invalid_regex_modifier() {
    assert!(matches!(
        UriTemplateMatcher::new("/items/{id:[0-9}"),
        Err(UriTemplateError::InvalidPattern { .. })
    ));
}

#[test]
fn test_shared_between_threads() {
    let m = Arc::new(UriTemplateMatcher::new("/users/{id}").unwrap());
    let results: Vec<HashMap<String, String>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let m = Arc::clone(&m);
                s.spawn(move || {
                    m.match_uri(&format!("/users/{i}"))
                        .unwrap()
                        .variable_values()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (i, values) in results.iter().enumerate() {
        assert_eq!(values.get("id"), Some(&i.to_string()));
    }
}
