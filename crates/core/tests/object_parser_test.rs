use delamina_core::error::StreamError;
use delamina_core::model::objects::{PdfObject, PdfRef};
use delamina_core::parser::lexer::Operator;
use delamina_core::parser::objects::ObjectParser;

fn read_all(data: &[u8]) -> Vec<PdfObject> {
    let mut parser = ObjectParser::new(data);
    let mut objects = Vec::new();
    while let Some(obj) = parser.read_object().expect("parse") {
        objects.push(obj);
    }
    objects
}

#[test]
fn test_scalars() {
    let objects = read_all(b"1 2.5 true false null /Name (str) <414243>");
    assert_eq!(
        objects,
        vec![
            PdfObject::Int(1),
            PdfObject::Real(2.5),
            PdfObject::Bool(true),
            PdfObject::Bool(false),
            PdfObject::Null,
            PdfObject::Name("Name".to_string()),
            PdfObject::literal_string(b"str".to_vec()),
            PdfObject::String {
                bytes: b"ABC".to_vec(),
                hex: true
            },
        ]
    );
}

#[test]
fn test_nested_containers() {
    let objects = read_all(b"<< /A [1 2 << /B (x) >>] /C /D >>");
    let dict = objects[0].as_dict().unwrap();

    let a = dict.get("A").unwrap().as_array().unwrap();
    assert_eq!(a[0], PdfObject::Int(1));
    assert_eq!(a[1], PdfObject::Int(2));
    let inner = a[2].as_dict().unwrap();
    assert_eq!(inner.get("B"), Some(&PdfObject::literal_string(b"x".to_vec())));

    assert_eq!(dict.get("C"), Some(&PdfObject::Name("D".to_string())));
}

#[test]
fn test_reference_folding_in_containers() {
    let objects = read_all(b"<< /OC 12 0 R >> [3 1 R]");
    let dict = objects[0].as_dict().unwrap();
    assert_eq!(dict.get("OC"), Some(&PdfObject::Ref(PdfRef::new(12, 0))));
    let arr = objects[1].as_array().unwrap();
    assert_eq!(arr[0], PdfObject::Ref(PdfRef::new(3, 1)));
}

#[test]
fn test_reference_requires_full_pattern() {
    // Two ints followed by a non-R operator stay plain numbers
    let objects = read_all(b"100 200 Td 5 0 R");
    assert_eq!(
        objects,
        vec![
            PdfObject::Int(100),
            PdfObject::Int(200),
            PdfObject::Op(Operator::Td),
            PdfObject::Ref(PdfRef::new(5, 0)),
        ]
    );
}

#[test]
fn test_operators_are_objects() {
    let objects = read_all(b"q 1 0 0 1 5 5 cm Q");
    assert_eq!(objects[0], PdfObject::Op(Operator::Qq));
    assert_eq!(objects.last(), Some(&PdfObject::Op(Operator::Q)));
    assert_eq!(objects.len(), 9);
}

#[test]
fn test_malformed_dictionary_key() {
    let mut parser = ObjectParser::new(b"<< /Foo (bar) 5 (baz) >>");
    let err = parser.read_object().unwrap_err();
    assert!(matches!(err, StreamError::MalformedDictionary { .. }));
}

#[test]
fn test_dangling_def_skipped() {
    let objects = read_all(b"<< /A 1 def /B 2 def >>");
    let dict = objects[0].as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get("A"), Some(&PdfObject::Int(1)));
    assert_eq!(dict.get("B"), Some(&PdfObject::Int(2)));
}

#[test]
fn test_unterminated_dict_is_eof() {
    let mut parser = ObjectParser::new(b"<< /A 1");
    assert!(matches!(
        parser.read_object().unwrap_err(),
        StreamError::UnexpectedEof
    ));
}

#[test]
fn test_unterminated_array_is_eof() {
    let mut parser = ObjectParser::new(b"[1 2");
    assert!(matches!(
        parser.read_object().unwrap_err(),
        StreamError::UnexpectedEof
    ));
}

#[test]
fn test_comments_skipped_between_objects() {
    let objects = read_all(b"1 % one\n2");
    assert_eq!(objects, vec![PdfObject::Int(1), PdfObject::Int(2)]);
}

#[test]
fn test_end_of_input_returns_none() {
    let mut parser = ObjectParser::new(b"   % only a comment");
    assert!(parser.read_object().unwrap().is_none());
}
