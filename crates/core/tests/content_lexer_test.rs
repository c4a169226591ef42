use delamina_core::parser::lexer::{ContentLexer, Operator, Token};
use delamina_core::error::StreamError;

fn collect_tokens(data: &[u8]) -> Vec<Token> {
    let mut lexer = ContentLexer::new(data);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next_token() {
        let (_, token) = result.expect("tokenize");
        tokens.push(token);
    }
    tokens
}

#[test]
fn test_basic_tokens() {
    let data = b"BT /F1 12 Tf (Hello) Tj ET";
    let tokens = collect_tokens(data);

    assert_eq!(
        tokens,
        vec![
            Token::Op(Operator::BT),
            Token::Name("F1".to_string()),
            Token::Int(12),
            Token::Op(Operator::Tf),
            Token::String {
                bytes: b"Hello".to_vec(),
                hex: false
            },
            Token::Op(Operator::Tj),
            Token::Op(Operator::ET),
        ]
    );
}

#[test]
fn test_hex_string_whitespace() {
    let tokens = collect_tokens(b"<48 65 6C 6C 6F> Tj");
    assert_eq!(
        tokens,
        vec![
            Token::String {
                bytes: b"Hello".to_vec(),
                hex: true
            },
            Token::Op(Operator::Tj)
        ]
    );
}

#[test]
fn test_hex_string_odd_digit_is_high_nibble() {
    let tokens = collect_tokens(b"<4F3>");
    assert_eq!(
        tokens,
        vec![Token::String {
            bytes: vec![0x4f, 0x30],
            hex: true
        }]
    );
}

#[test]
fn test_name_hex_escape() {
    let tokens = collect_tokens(b"/foo#5fbar");
    assert_eq!(tokens, vec![Token::Name("foo_bar".to_string())]);
}

#[test]
fn test_name_malformed_escape_is_error() {
    let mut lexer = ContentLexer::new(b"/foo#5zbar");
    let result = lexer.next_token().unwrap();
    assert!(matches!(result, Err(StreamError::TokenizeError { .. })));
}

#[test]
fn test_comments_are_surfaced() {
    let tokens = collect_tokens(b"% a comment\r\nBT");
    assert_eq!(
        tokens,
        vec![
            Token::Comment(b" a comment".to_vec()),
            Token::Op(Operator::BT)
        ]
    );
}

#[test]
fn test_string_escapes() {
    let tokens = collect_tokens(b"(a\\(b\\)c \\\\ \\n \\101)");
    assert_eq!(
        tokens,
        vec![Token::String {
            bytes: b"a(b)c \\ \n A".to_vec(),
            hex: false
        }]
    );
}

#[test]
fn test_string_nested_parens() {
    let tokens = collect_tokens(b"(a(b(c))d)");
    assert_eq!(
        tokens,
        vec![Token::String {
            bytes: b"a(b(c))d".to_vec(),
            hex: false
        }]
    );
}

#[test]
fn test_string_line_continuation() {
    let tokens = collect_tokens(b"(ab\\\r\ncd)");
    assert_eq!(
        tokens,
        vec![Token::String {
            bytes: b"abcd".to_vec(),
            hex: false
        }]
    );
}

#[test]
fn test_string_bare_cr_normalized() {
    let tokens = collect_tokens(b"(a\rb\r\nc)");
    assert_eq!(
        tokens,
        vec![Token::String {
            bytes: b"a\nb\nc".to_vec(),
            hex: false
        }]
    );
}

#[test]
fn test_unterminated_string_is_eof() {
    let mut lexer = ContentLexer::new(b"(never closed");
    let result = lexer.next_token().unwrap();
    assert!(matches!(result, Err(StreamError::UnexpectedEof)));
}

#[test]
fn test_even_minus_count_cancels() {
    let tokens = collect_tokens(b"--42 ----1.5 -7 +3");
    assert_eq!(
        tokens,
        vec![
            Token::Int(42),
            Token::Real(1.5),
            Token::Int(-7),
            Token::Int(3),
        ]
    );
}

#[test]
fn test_numbers_terminated_by_delimiters() {
    let tokens = collect_tokens(b"/W 2/H 1");
    assert_eq!(
        tokens,
        vec![
            Token::Name("W".to_string()),
            Token::Int(2),
            Token::Name("H".to_string()),
            Token::Int(1),
        ]
    );
}

#[test]
fn test_star_operators() {
    let tokens = collect_tokens(b"f* B* W* T*");
    assert_eq!(
        tokens,
        vec![
            Token::Op(Operator::FStar),
            Token::Op(Operator::BStar),
            Token::Op(Operator::WStar),
            Token::Op(Operator::TStar),
        ]
    );
}

#[test]
fn test_unknown_operator_preserved() {
    let tokens = collect_tokens(b"xyz");
    assert_eq!(tokens, vec![Token::Op(Operator::Other(b"xyz".to_vec()))]);
}

#[test]
fn test_seek_reinterprets() {
    let mut lexer = ContentLexer::new(b"12 34");
    let (pos, first) = lexer.next_token().unwrap().unwrap();
    assert_eq!(first, Token::Int(12));
    let _ = lexer.next_token().unwrap().unwrap();
    lexer.seek(pos);
    let (_, again) = lexer.next_token().unwrap().unwrap();
    assert_eq!(again, Token::Int(12));
}
