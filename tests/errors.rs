use nlu_lite::{Error, ErrorKind, Grammar};
use rstest::rstest;

fn load(document: &str) -> Error {
    Grammar::from_xml(document).unwrap_err()
}

#[rstest]
#[case(r#"<grammar><rule id="a"><item>x</item></rule></grammar>"#, "grammar", "root")]
#[case(r#"<grammar root="a"><rule><item>x</item></rule></grammar>"#, "rule", "id")]
#[case(r#"<grammar root="a"><rule id="a"><ruleref/></rule></grammar>"#, "ruleref", "uri")]
fn test_missing_attributes(
    #[case] document: &str,
    #[case] expected_element: &str,
    #[case] expected_attribute: &str,
) {
    let err = load(document);
    assert_eq!(ErrorKind::Structural, err.kind());
    assert_eq!("Parsing error", err.reason());
    match err {
        Error::MissingAttribute {
            element,
            attribute,
        } => {
            assert_eq!(expected_element, element);
            assert_eq!(expected_attribute, attribute);
        }
        err => panic!("unexpected error: {:?}", err),
    }
}

#[test]
fn test_missing_root_without_grammar_element() {
    let err = load(r#"<rule id="a"><item>x</item></rule>"#);
    assert!(matches!(
        err,
        Error::MissingAttribute {
            element: "grammar",
            attribute: "root"
        }
    ));
}

#[test]
fn test_undefined_rule_reference() {
    let err = load(
        r#"<grammar root="a">
             <rule id="a"><item>go to</item><ruleref uri="city"/></rule>
           </grammar>"#,
    );
    assert_eq!(ErrorKind::Reference, err.kind());
    assert_eq!("Incorrect rule reference", err.reason());
    assert_eq!("there is an incorrect rule reference in the grammar: city", err.to_string());
}

#[test]
fn test_undefined_root() {
    let err = load(r#"<grammar root="main"><rule id="a"><item>x</item></rule></grammar>"#);
    assert_eq!(ErrorKind::Reference, err.kind());
    assert!(matches!(err, Error::UndefinedRoot(id) if id == "main"));
}

#[test]
fn test_cyclic_references() {
    let err = load(
        r#"<grammar root="a">
             <rule id="a"><item>x</item><ruleref uri="b"/></rule>
             <rule id="b"><item repeat="0-1"><ruleref uri="a"/></item></rule>
           </grammar>"#,
    );
    assert_eq!(ErrorKind::Reference, err.kind());
    assert!(matches!(err, Error::CyclicReference(_)));
}

#[rstest]
#[case("two")]
#[case("3-1")]
#[case("1-")]
fn test_invalid_repeat(#[case] conditions: &str) {
    let document = format!(
        r#"<grammar root="a"><rule id="a"><item repeat="{}">x</item></rule></grammar>"#,
        conditions
    );
    let err = load(&document);
    assert_eq!(ErrorKind::Structural, err.kind());
    assert_eq!("Could not parse grammar", err.reason());
    assert!(matches!(err, Error::InvalidRepeat(c) if c == conditions));
}

#[rstest]
#[case::nested_rule(
    r#"<grammar root="a"><rule id="a"><rule id="b"><item>x</item></rule></rule></grammar>"#
)]
#[case::one_of_outside_rule(
    r#"<grammar root="a">
         <one-of><item>x</item></one-of>
         <rule id="a"><item>x</item></rule>
       </grammar>"#
)]
#[case::element_in_plain_item(
    r#"<grammar root="a"><rule id="a"><item>x<item>y</item></item></rule></grammar>"#
)]
#[case::element_in_tag(
    r#"<grammar root="a"><rule id="a"><item>x<tag><item>y</item></tag></item></rule></grammar>"#
)]
#[case::tag_without_item(
    r#"<grammar root="a"><rule id="a"><tag>T</tag><item>x</item></rule></grammar>"#
)]
#[case::empty_rule(r#"<grammar root="a"><rule id="a"></rule></grammar>"#)]
#[case::empty_one_of(r#"<grammar root="a"><rule id="a"><one-of></one-of></rule></grammar>"#)]
#[case::empty_repeat(
    r#"<grammar root="a"><rule id="a"><item repeat="1-2"></item></rule></grammar>"#
)]
fn test_ill_formed_grammars(#[case] document: &str) {
    let err = load(document);
    assert_eq!(ErrorKind::Structural, err.kind());
    assert!(matches!(err, Error::IllFormed(_)), "{:?}", err);
}

#[test]
fn test_duplicate_rules() {
    let err = load(
        r#"<grammar root="a">
             <rule id="a"><item>x</item></rule>
             <rule id="a"><item>y</item></rule>
           </grammar>"#,
    );
    assert_eq!(ErrorKind::Structural, err.kind());
    assert!(matches!(err, Error::DuplicateRule(id) if id == "a"));
}

#[rstest]
#[case(r#"<grammar root="a"><rule id="a"><item>x</item></grammar>"#)]
#[case(r#"<grammar root="a"><rule id="a"><item>x</item></rule>"#)]
#[case(r#"<grammar root="a"><rule id="a"></item></rule></grammar>"#)]
fn test_malformed_xml(#[case] document: &str) {
    let err = load(document);
    assert_eq!(ErrorKind::Xml, err.kind());
    assert_eq!("Grammar could not be read, check the format", err.reason());
}
