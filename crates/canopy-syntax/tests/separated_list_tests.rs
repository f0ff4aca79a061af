use crate::annotation::SyntaxAnnotation;
use crate::error::EditError;
use crate::green::GreenNode;
use crate::lists::{SeparatedSyntaxList, SeparatedSyntaxListBuilder};
use crate::red::SyntaxNode;
use crate::testkit::kinds::*;
use crate::testkit::{identifier, parse_member, punctuation, whitespace};

fn parameter(name: &str) -> GreenNode {
    let keyword = GreenNode::token(INT_KEYWORD, "int", None, Some(whitespace(" ")));
    let ty = GreenNode::node(PREDEFINED_TYPE, [Some(keyword)]);
    GreenNode::node(PARAMETER, [Some(ty), Some(identifier(name))])
}

fn parameters_of(source: &str) -> SeparatedSyntaxList {
    let function = parse_member(source);
    let list: SyntaxNode = function
        .descendant_nodes()
        .find(|node| node.kind() == PARAMETER_LIST)
        .expect("parameter list");
    list.separated_list(1)
}

fn names(list: &SeparatedSyntaxList) -> Vec<String> {
    list.iter()
        .map(|parameter| parameter.last_token().expect("name").text().to_string())
        .collect()
}

#[test]
fn test_view_over_parsed_list() {
    let list = parameters_of("int f(int a, int b, int c) { }");
    assert_eq!(list.len(), 3);
    assert_eq!(list.separator_count(), 2);
    assert_eq!(names(&list), vec!["a", "b", "c"]);
    assert!(list.separators().all(|separator| separator.kind() == COMMA_TOKEN));
    assert_eq!(list.separator(0).map(|s| s.position()), Some(11));
    assert_eq!(list.with_separators().len(), 5);
    assert_eq!(list.to_full_string(), "int a, int b, int c");
}

#[test]
fn test_index_lookups() {
    let list = parameters_of("int f(int a, int b, int c) { }");
    let b = list.get(1).expect("b");
    assert_eq!(list.index_of(&b), Some(1));
    let second_comma = list.separator(1).expect("separator");
    assert_eq!(list.separator_index_of(&second_comma), Some(1));
    assert_eq!(list.first().map(|p| p.position()), Some(6));
    assert!(list.get(3).is_none());
}

#[test]
fn test_insert_adds_a_separator_of_the_same_kind() {
    let list = parameters_of("int f(int a, int b, int c) { }");
    let inserted = list.insert(1, parameter("p")).expect("insert");
    assert_eq!(inserted.len(), 4);
    assert_eq!(inserted.separator_count(), 3);
    assert!(inserted.separators().all(|separator| separator.kind() == COMMA_TOKEN));
    assert_eq!(names(&inserted), vec!["a", "p", "b", "c"]);
    assert_eq!(inserted.to_full_string(), "int a,int p, int b, int c");

    let synthesized = inserted.separator(0).expect("new separator");
    assert!(synthesized.has_annotation(&SyntaxAnnotation::elastic()));
    assert!(!inserted.separator(1).expect("old separator").has_annotation(&SyntaxAnnotation::elastic()));
}

#[test]
fn test_insert_at_ends() {
    let list = parameters_of("int f(int a, int b) { }");
    let front = list.insert(0, parameter("p")).expect("insert");
    assert_eq!(names(&front), vec!["p", "a", "b"]);
    assert_eq!(front.separator_count(), 2);

    let back = list.add(parameter("z")).expect("add");
    assert_eq!(names(&back), vec!["a", "b", "z"]);
    assert_eq!(back.to_full_string(), "int a, int b,int z");

    let many = list.add_range(vec![parameter("x"), parameter("y")]).expect("add range");
    assert_eq!(many.len(), 4);
    assert_eq!(many.separator_count(), 3);
}

#[test]
fn test_separator_ending_a_line_stays_with_its_node() {
    let list = parameters_of("int f(int a,\n int b) { }");
    let inserted = list.insert(1, parameter("p")).expect("insert");
    assert_eq!(names(&inserted), vec!["a", "p", "b"]);
    assert_eq!(inserted.to_full_string(), "int a,\nint p, int b");
}

#[test]
fn test_mixed_view_reads_and_edits() {
    let list = parameters_of("int f(int a, int b) { }");
    let mixed = list.with_separators();
    assert_eq!(mixed.len(), 3);
    assert!(mixed.first().expect("first").is_node());
    let comma = mixed.get(1).expect("comma");
    assert!(comma.is_token());
    assert_eq!(comma.kind(), COMMA_TOKEN);
    assert_eq!(mixed.index_of(&comma), Some(1));
    assert_eq!(mixed.full_span(), list.with_separators().full_span());

    let removed = mixed.remove(&comma).expect("remove");
    assert_eq!(removed.len(), 2);
    assert_eq!(removed.to_full_string(), "int a int b");
    assert_eq!(mixed.to_full_string(), "int a, int b");
}

#[test]
fn test_separator_binding_follows_trivia_kind() {
    let commented = parameters_of("int f(int a, // c\n int b) { }");
    let inserted = commented.insert(1, parameter("p")).expect("insert");
    assert_eq!(names(&inserted), vec!["a", "p", "b"]);
    assert_eq!(inserted.to_full_string(), "int a, // c\nint p, int b");

    let block = parameters_of("int f(int a, /* a\n b */ int b) { }");
    let inserted = block.insert(1, parameter("p")).expect("insert");
    assert_eq!(names(&inserted), vec!["a", "p", "b"]);
    assert_eq!(inserted.to_full_string(), "int a,int p, /* a\n b */ int b");
}

#[test]
fn test_remove_takes_a_separator_along() {
    let list = parameters_of("int f(int a, int b, int c) { }");
    let middle = list.remove_at(1);
    assert_eq!(middle.to_full_string(), "int a, int c");
    assert_eq!(middle.separator_count(), 1);

    let last = list.remove_at(2);
    assert_eq!(last.to_full_string(), "int a, int b");

    let b = list.get(1).expect("b");
    assert_eq!(list.remove(&b).expect("remove").len(), 2);
    assert_eq!(list.remove_at(0).remove_at(0).remove_at(0).len(), 0);
}

#[test]
fn test_trailing_separator_is_kept_in_shape() {
    let comma = punctuation(COMMA_TOKEN);
    let list = SeparatedSyntaxList::from_greens(&[parameter("a"), comma.clone(), parameter("b"), comma]);
    assert_eq!(list.len(), 2);
    assert_eq!(list.separator_count(), 2);
    let removed = list.remove_at(1);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed.separator_count(), 1);
    assert_eq!(removed.to_full_string(), "int a,");
}

#[test]
fn test_replace_keeps_separators() {
    let list = parameters_of("int f(int a, int b, int c) { }");
    let b = list.get(1).expect("b");
    let replaced = list.replace(&b, parameter("q")).expect("replace");
    assert_eq!(replaced.to_full_string(), "int a, int q, int c");

    let spread = list.replace_range(&b, vec![parameter("p"), parameter("q")]).expect("replace range");
    assert_eq!(names(&spread), vec!["a", "p", "q", "c"]);
    assert_eq!(spread.separator_count(), 3);

    let emptied = list.replace_range(&b, Vec::new()).expect("remove");
    assert_eq!(names(&emptied), vec!["a", "c"]);
}

#[test]
fn test_single_element_list_needs_a_template() {
    let list = parameters_of("int f(int a) { }");
    assert_eq!(list.len(), 1);
    assert_eq!(list.separator_count(), 0);
    assert_eq!(list.add(parameter("b")).err(), Some(EditError::MissingSeparatorTemplate));

    let templated = list.with_separator_template(punctuation(COMMA_TOKEN));
    let added = templated.add(parameter("b")).expect("add");
    assert_eq!(added.to_full_string(), "int a,int b");
}

#[test]
fn test_empty_list_accepts_a_first_node() {
    let list = parameters_of("int f() { }");
    assert!(list.is_empty());
    let added = list.add(parameter("a")).expect("add");
    assert_eq!(added.len(), 1);
    assert_eq!(added.separator_count(), 0);
}

#[test]
fn test_replace_separator_checks_kind() {
    let list = parameters_of("int f(int a, int b) { }");
    let comma = list.separator(0).expect("separator");
    let spaced = GreenNode::token(COMMA_TOKEN, ",", None, Some(whitespace("  ")));
    let replaced = list.replace_separator(&comma, spaced).expect("replace");
    assert_eq!(replaced.to_full_string(), "int a,  int b");

    match list.replace_separator(&comma, punctuation(SEMICOLON_TOKEN)) {
        Err(EditError::SeparatorKindMismatch { expected, found }) => {
            assert_eq!(expected, COMMA_TOKEN);
            assert_eq!(found, SEMICOLON_TOKEN);
        }
        other => panic!("expected SeparatorKindMismatch, got {other:?}"),
    }
}

#[test]
fn test_builder_alternates() {
    let mut builder = SeparatedSyntaxListBuilder::new();
    builder
        .add(&parameter("a"))
        .add_separator(&punctuation(COMMA_TOKEN))
        .add(&parameter("b"));
    assert_eq!(builder.len(), 3);
    let list = builder.to_list();
    assert_eq!(list.len(), 2);
    assert_eq!(list.to_full_string(), "int a,int b");
}
