use uritemplate::template::{concat, parse, parts_to_template, ExpressionType, Part, Variable};
use uritemplate::{UriTemplate, UriTemplateError};

fn var(name: &str) -> Variable {
    Variable {
        name: name.to_string(),
        modifier: None,
        explode: false,
    }
}

#[test]
fn test_parse_literals_and_expressions() {
    let parts = parse("/users/{id}{?q,limit}").unwrap();
    assert_eq!(
        parts,
        vec![
            Part::Literal("/users/".to_string()),
            Part::Expression {
                kind: ExpressionType::None,
                variables: vec![var("id")],
            },
            Part::Expression {
                kind: ExpressionType::FormStyleParameterExpansion,
                variables: vec![var("q"), var("limit")],
            },
        ]
    );
}

#[test]
fn test_every_operator_is_recognized() {
    let cases = [
        ("{x}", ExpressionType::None),
        ("{+x}", ExpressionType::ReservedExpansion),
        ("{#x}", ExpressionType::FragmentExpansion),
        ("{.x}", ExpressionType::LabelExpansion),
        ("{/x}", ExpressionType::PathSegmentExpansion),
        ("{;x}", ExpressionType::PathStyleParameterExpansion),
        ("{?x}", ExpressionType::FormStyleParameterExpansion),
        ("{&x}", ExpressionType::FormStyleQueryContinuation),
    ];
    for (template, expected) in cases {
        let parts = parse(template).unwrap();
        assert_eq!(parts.len(), 1, "{template}");
        assert_eq!(parts[0].expression_type(), Some(expected), "{template}");
    }
}

#[test]
fn test_variable_modifiers() {
    let parts = parse("{name:3}{list*}{id:[0-9]{1,3}}").unwrap();
    let variables: Vec<&Variable> = parts
        .iter()
        .flat_map(|part| match part {
            Part::Expression { variables, .. } => variables.iter().collect::<Vec<_>>(),
            Part::Literal(_) => Vec::new(),
        })
        .collect();

    assert_eq!(variables[0].max_length(), Some(3));
    assert!(variables[1].explode);
    assert!(variables[1].modifier.is_none());
    assert_eq!(variables[2].modifier.as_deref(), Some("[0-9]{1,3}"));
    assert_eq!(variables[2].max_length(), None);
}

#[test]
fn test_illegal_character_reports_position() {
    match parse("/ab|c") {
        Err(UriTemplateError::IllegalCharacter {
            character,
            position,
            ..
        }) => {
            assert_eq!(character, '|');
            assert_eq!(position, 3);
        }
        other => panic!("expected IllegalCharacter, got {other:?}"),
    }
}

#[test]
fn test_malformed_expressions() {
    assert!(matches!(
        parse("/a/{id"),
        Err(UriTemplateError::UnterminatedExpression { position: 3, .. })
    ));
    assert!(matches!(
        parse("/a/{}"),
        Err(UriTemplateError::EmptyExpression { position: 3, .. })
    ));
    let message = UriTemplate::new("/a/{id").unwrap_err().to_string();
    assert!(message.contains("/a/{id"), "{message}");
}

#[test]
fn test_display_round_trip() {
    for template in [
        "/",
        "/users/{id}",
        "/a{/b*}{?c:3}",
        "{+path}/here{#frag}",
        "/map{;keys*}{&more}",
    ] {
        assert_eq!(parts_to_template(&parse(template).unwrap()), template);
        assert_eq!(UriTemplate::new(template).unwrap().to_string(), template);
    }
}

#[test]
fn test_concat_moves_query_and_fragment_last() {
    let joined = concat(
        &parse("/api{?version}").unwrap(),
        &parse("/books/{id}{#section}{?max}").unwrap(),
    );
    assert_eq!(
        parts_to_template(&joined),
        "/api/books/{id}{#section}{?version}{?max}"
    );
}

#[test]
fn test_concat_normalizes_slashes() {
    let cases = [
        ("/api", "/{id}", "/api/{id}"),
        ("/api/", "/{id}", "/api/{id}"),
        ("/api", "{id}", "/api{id}"),
        ("/api", "/", "/api"),
        ("/api/", "{/id}", "/api{/id}"),
    ];
    for (first, second, expected) in cases {
        let joined = concat(&parse(first).unwrap(), &parse(second).unwrap());
        assert_eq!(parts_to_template(&joined), expected, "{first} + {second}");
    }
}
