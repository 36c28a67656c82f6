//! Integration tests for error types

use canopy_foundation::{Error, ErrorKind, NodeHandle, QueryErrorReason};

#[test]
fn error_kinds_carry_the_handle() {
    let handle = NodeHandle::game_object(4);
    assert_eq!(Error::not_found(handle).kind, ErrorKind::NotFound(handle));
    assert_eq!(Error::parent_not_found(handle).kind, ErrorKind::ParentNotFound(handle));
    assert_eq!(Error::already_exists(handle).kind, ErrorKind::AlreadyExists(handle));
    assert_eq!(Error::self_parenting(handle).kind, ErrorKind::SelfParenting(handle));
}

#[test]
fn operation_context_is_recorded() {
    let error = Error::invalid_handle(NodeHandle::ROOT).in_operation("remove_node");
    let context = error.context.unwrap();
    assert_eq!(context.operation, Some("remove_node"));
}

#[test]
fn query_errors_describe_the_token() {
    let error = Error::invalid_query("c=!Health", QueryErrorReason::NegationUnsupported);
    let message = error.to_string();
    assert!(message.contains("c=!Health"));
    assert!(message.contains("not supported"));
}
