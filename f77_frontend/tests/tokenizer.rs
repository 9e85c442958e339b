use f77_frontend::lexical::{count_tokens, tokenize, LexicalRegistry, Tokenizer};
use f77_frontend::tokens::{kinds, Category, Token, TokenValue};

fn non_eof(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| !t.is_eof()).collect()
}

#[test]
fn every_stream_ends_with_exactly_one_eof() {
    for source in [
        "",
        "\n\n",
        "      X = 1",
        "C only a comment\n",
        "  IF (A .GE. B) THEN\n  ENDIF\n",
        "  'open string",
        "@#$",
    ] {
        let stream = tokenize(source);
        let tokens = stream.tokens();
        assert!(!tokens.is_empty(), "no tokens for {:?}", source);
        assert!(tokens.last().is_some_and(Token::is_eof), "{:?}", source);
        assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1, "{:?}", source);
    }
}

#[test]
fn blank_and_comment_lines_contribute_nothing() {
    let source = "\n   \t\nC comment\n* star comment\nc lower\n      X = 1\n";
    let stream = tokenize(source);
    let tokens = non_eof(stream.tokens());

    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.line() == 6));
}

#[test]
fn power_is_one_operator() {
    let stream = tokenize("  Y = X ** 2");
    let operators: Vec<&Token> = stream
        .tokens()
        .iter()
        .filter(|t| t.category == Category::Operator)
        .collect();

    assert_eq!(operators.len(), 2);
    assert!(operators[1].is(Category::Operator, "POWER"));
    assert_eq!(operators[1].lexeme, "**");
}

#[test]
fn relational_operator_is_case_insensitive() {
    let stream = tokenize("  IF (A .ge. B) THEN");
    assert!(stream.tokens().iter().any(|t| t.is(Category::Operator, "GE")));
}

#[test]
fn leading_digits_are_a_label() {
    let stream = tokenize("  10 CONTINUE");
    let tokens = stream.tokens();

    assert_eq!(tokens[0].category, Category::Label);
    assert_eq!(tokens[0].value, Some(TokenValue::Int(10)));
    assert_eq!(tokens[1].lexeme, "CONTINUE");
    assert!(matches!(tokens[1].category, Category::Ident | Category::Keyword));
}

#[test]
fn mid_line_digits_are_never_a_label() {
    let stream = tokenize("X = 10 + 1");
    let tokens = stream.tokens();

    assert!(tokens.iter().all(|t| t.category != Category::Label));
    assert!(tokens[2].is(Category::LitInt, kinds::INT));
    assert_eq!(tokens[2].int_value(), Some(10));
}

#[test]
fn real_literals_decode_with_either_exponent_letter() {
    let stream = tokenize("  A = 1.23D-4 + 2.5E-3");
    let reals: Vec<f64> = stream.tokens().iter().filter_map(Token::real_value).collect();

    assert_eq!(reals.len(), 2);
    assert!((reals[0] - 1.23e-4).abs() < 1e-12);
    assert!((reals[1] - 2.5e-3).abs() < 1e-12);
}

#[test]
fn doubled_quote_is_unescaped() {
    let stream = tokenize("  S = 'it''s'");
    let string = stream
        .tokens()
        .iter()
        .find(|t| t.category == Category::LitString)
        .expect("string literal");

    assert_eq!(string.lexeme, "'it''s'");
    assert_eq!(string.str_value(), Some("it's"));
}

#[test]
fn retokenizing_is_idempotent() {
    let source = "      PROGRAM P\n      REAL Z\n  10  Z = 2.5E1 * 'x'\n      END\n";
    let first: Vec<Token> = Tokenizer::new(source).collect();
    let second: Vec<Token> = Tokenizer::new(source).collect();
    assert_eq!(first, second);
}

#[test]
fn lexical_errors_are_collected_without_stopping() {
    let stream = tokenize("  X = 1 @ 2 $\n  Y = 3");
    let counts = count_tokens(stream.tokens());

    assert_eq!(counts.error_count(), 2);
    assert_eq!(counts.error_tokens[0].lexeme, "@");
    assert_eq!(counts.error_tokens[1].lexeme, "$");
    assert!(stream.tokens().iter().any(|t| t.lexeme == "Y"));
}

#[test]
fn registry_additions_reach_the_tokenizer() {
    let mut registry = LexicalRegistry::default();
    registry.add_keyword("do", "DO").unwrap();

    let tokens: Vec<Token> = Tokenizer::with_registry("  DO I", registry).collect();
    assert!(tokens[0].is(Category::Keyword, "DO"));
    assert_eq!(tokens[1].category, Category::Ident);
}
