//! Integration tests for component query building

use canopy_foundation::{ErrorKind, QueryErrorReason};
use canopy_search::{ComponentCatalog, HierarchyQueryBuilder, QueryOptions};

fn builder() -> HierarchyQueryBuilder {
    HierarchyQueryBuilder::new(["Translation", "Rotation", "Health"].into_iter().collect())
}

fn reason(error: Option<&canopy_foundation::Error>) -> Option<QueryErrorReason> {
    match error.map(|e| &e.kind) {
        Some(ErrorKind::InvalidQuery { reason, .. }) => Some(*reason),
        _ => None,
    }
}

#[test]
fn resolves_every_component_token() {
    let mut builder = builder();
    let result = builder.build_query("player c=Translation C=rotation c=translation");

    let query = result.query.unwrap();
    let catalog = builder.catalog();
    assert_eq!(query.all, vec![
        catalog.resolve("Translation").unwrap(),
        catalog.resolve("Rotation").unwrap(),
    ]);
    assert!(query.options.contains(QueryOptions::INCLUDE_DISABLED | QueryOptions::INCLUDE_PREFABS));
    assert_eq!(result.filter, "player");
    assert!(result.error.is_none());
}

#[test]
fn unknown_type_invalidates_but_keeps_text() {
    let mut builder = builder();
    let result = builder.build_query("c=Health c=Mana \"main camera\"");
    assert!(result.query.is_none());
    assert!(result.is_invalid());
    assert_eq!(reason(result.error.as_ref()), Some(QueryErrorReason::UnknownComponent));
    assert_eq!(result.filter, "\"main camera\"");
}

#[test]
fn negation_is_unsupported() {
    let mut builder = builder();
    let result = builder.build_query("c=!Health");
    assert!(result.query.is_none());
    assert_eq!(reason(result.error.as_ref()), Some(QueryErrorReason::NegationUnsupported));
}

#[test]
fn bare_prefix_is_missing_a_type() {
    let mut builder = builder();
    let result = builder.build_query("c=");
    assert_eq!(reason(result.error.as_ref()), Some(QueryErrorReason::MissingTypeName));
}

#[test]
fn text_without_components_has_no_query() {
    let mut builder = HierarchyQueryBuilder::new(ComponentCatalog::new());
    let result = builder.build_query("lamp");
    assert!(result.query.is_none());
    assert!(!result.is_invalid());
    assert_eq!(builder.cached(), 1);
}
