use paxkv::{Command, ParseError};

#[test]
fn test_parse_put() {
    assert_eq!(
        Command::parse("PUT color red"),
        Ok(Command::Put {
            key: "color".to_string(),
            value: "red".to_string(),
        })
    );
}

#[test]
fn test_parse_put_value_keeps_spaces() {
    assert_eq!(
        Command::parse("put weakness leg spin"),
        Ok(Command::Put {
            key: "weakness".to_string(),
            value: "leg spin".to_string(),
        })
    );
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(
        Command::parse("get color"),
        Ok(Command::Get {
            key: "color".to_string(),
        })
    );
    assert_eq!(
        Command::parse("Delete color"),
        Ok(Command::Delete {
            key: "color".to_string(),
        })
    );
}

#[test]
fn test_put_without_value_is_malformed() {
    assert_eq!(Command::parse("PUT key"), Err(ParseError::Malformed));
}

#[test]
fn test_get_without_key_is_malformed() {
    assert_eq!(Command::parse("GET"), Err(ParseError::Malformed));
    assert_eq!(Command::parse("GET "), Err(ParseError::Malformed));
}

#[test]
fn test_get_with_extra_token_is_malformed() {
    assert_eq!(Command::parse("GET key extra"), Err(ParseError::Malformed));
}

#[test]
fn test_delete_with_extra_token_is_malformed() {
    assert_eq!(Command::parse("DELETE key extra"), Err(ParseError::Malformed));
}

#[test]
fn test_unknown_verb() {
    assert_eq!(
        Command::parse("FOO bar baz"),
        Err(ParseError::UnknownOperation)
    );
    assert_eq!(Command::parse(""), Err(ParseError::UnknownOperation));
}
