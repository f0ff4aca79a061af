use rayon::prelude::*;

use crate::green::{GreenNode, NodeCache};
use crate::testkit::kinds::*;
use crate::testkit::{identifier, punctuation};
use canopy_common::DiagnosticInfo;

#[test]
fn test_same_children_reuse_cached_node() {
    let cache = NodeCache::new();
    let name = identifier("x");
    let first = cache.node(IDENTIFIER_NAME, vec![Some(name.clone())]);
    let second = cache.node(IDENTIFIER_NAME, vec![Some(name)]);
    assert!(GreenNode::ptr_eq(&first, &second));
    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_children_compare_by_identity() {
    let cache = NodeCache::new();
    let first = cache.node(IDENTIFIER_NAME, vec![Some(identifier("x"))]);
    let second = cache.node(IDENTIFIER_NAME, vec![Some(identifier("x"))]);
    assert!(!GreenNode::ptr_eq(&first, &second));
    assert_eq!(first.to_full_string(), second.to_full_string());
}

#[test]
fn test_kind_is_part_of_the_key() {
    let cache = NodeCache::new();
    let name = identifier("x");
    let a = cache.node(IDENTIFIER_NAME, vec![Some(name.clone())]);
    let b = cache.node(LITERAL_EXPRESSION, vec![Some(name)]);
    assert_eq!(a.kind(), IDENTIFIER_NAME);
    assert_eq!(b.kind(), LITERAL_EXPRESSION);
    assert!(!GreenNode::ptr_eq(&a, &b));
}

#[test]
fn test_missing_children_are_not_cached() {
    let cache = NodeCache::new();
    let semicolon = GreenNode::missing_token(SEMICOLON_TOKEN);
    let a = cache.node(EMPTY_STATEMENT, vec![Some(semicolon.clone())]);
    let b = cache.node(EMPTY_STATEMENT, vec![Some(semicolon)]);
    assert!(!GreenNode::ptr_eq(&a, &b));
    assert!(a.is_missing());
}

#[test]
fn test_children_with_diagnostics_are_not_cached() {
    let cache = NodeCache::new();
    let bad = identifier("x").add_error(DiagnosticInfo::error(1, "bad"));
    assert!(!bad.is_cacheable());
    let a = cache.node(IDENTIFIER_NAME, vec![Some(bad.clone())]);
    let b = cache.node(IDENTIFIER_NAME, vec![Some(bad)]);
    assert!(!GreenNode::ptr_eq(&a, &b));
    assert!(a.contains_diagnostics());
}

#[test]
fn test_wide_nodes_are_not_cached() {
    let cache = NodeCache::new();
    let slots = vec![
        Some(punctuation(OPEN_PAREN_TOKEN)),
        Some(identifier("a")),
        Some(punctuation(COMMA_TOKEN)),
        Some(punctuation(CLOSE_PAREN_TOKEN)),
    ];
    assert!(NodeCache::hash_for(ARGUMENT_LIST, crate::NodeFlags::IS_NOT_MISSING, &slots).is_none());
    let a = cache.node(ARGUMENT_LIST, slots.clone());
    let b = cache.node(ARGUMENT_LIST, slots);
    assert!(!GreenNode::ptr_eq(&a, &b));
}

#[test]
fn test_clear_forgets_entries() {
    let cache = NodeCache::new();
    let name = identifier("x");
    let first = cache.node(IDENTIFIER_NAME, vec![Some(name.clone())]);
    cache.clear();
    let second = cache.node(IDENTIFIER_NAME, vec![Some(name)]);
    assert!(!GreenNode::ptr_eq(&first, &second));
}

#[test]
fn test_concurrent_lookups_only_return_equivalent_nodes() {
    let cache = NodeCache::new();
    let names: Vec<GreenNode> = (0..16).map(|i| identifier(&format!("n{i}"))).collect();

    let built: Vec<(usize, GreenNode)> = (0..2048usize)
        .into_par_iter()
        .map(|i| {
            let index = i % names.len();
            (index, cache.node(IDENTIFIER_NAME, vec![Some(names[index].clone())]))
        })
        .collect();

    for (index, node) in &built {
        assert_eq!(node.kind(), IDENTIFIER_NAME);
        let child = node.slot(0).expect("name token");
        assert!(GreenNode::ptr_eq(child, &names[*index]));
    }

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 2048);

    let again = cache.node(IDENTIFIER_NAME, vec![Some(names[0].clone())]);
    let once_more = cache.node(IDENTIFIER_NAME, vec![Some(names[0].clone())]);
    assert!(GreenNode::ptr_eq(&again, &once_more));
}

#[test]
fn test_concurrent_inserts_with_scoped_threads() {
    let cache = NodeCache::new();
    let shared = identifier("shared");
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..256 {
                    let node = cache.node(IDENTIFIER_NAME, vec![Some(shared.clone())]);
                    assert!(GreenNode::ptr_eq(node.slot(0).expect("token"), &shared));
                }
            });
        }
    });
    assert_eq!(cache.stats().hits + cache.stats().misses, 8 * 256);
}
