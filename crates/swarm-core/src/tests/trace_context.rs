use crate::TraceContext;

#[test]
fn given_root_context_when_child_derived_then_root_id_unchanged() {
    let root = TraceContext::new_root();

    let child = root.child();
    let grandchild = child.child();

    assert_eq!(child.root(), root.root());
    assert_eq!(grandchild.root(), root.root());
}

#[test]
fn given_root_context_when_child_derived_then_fresh_parent_span() {
    let root = TraceContext::new_root();

    let child = root.child();

    assert_ne!(child.parent(), root.parent());
}

#[test]
fn given_context_when_formatted_then_header_shape() {
    let context = TraceContext::new_root();

    let header = context.header();

    assert!(header.starts_with("Root=1-"));
    assert!(header.contains(";Parent="));
    assert!(header.ends_with(";Sampled=1"));
}

#[test]
fn given_header_when_parsed_then_round_trips() {
    let context = TraceContext::new_root();

    let parsed = TraceContext::parse(&context.header()).unwrap();

    assert_eq!(parsed, context);
}

#[test]
fn given_header_without_root_when_parsed_then_error() {
    let result = TraceContext::parse("Parent=53995c3f42cd8ad8;Sampled=1");

    assert!(result.is_err());
}

#[test]
fn given_garbage_header_when_parsed_then_error() {
    assert!(TraceContext::parse("").is_err());
    assert!(TraceContext::parse("not-a-header").is_err());
    assert!(TraceContext::parse("Root=;Parent=;Sampled=1").is_err());
}

#[test]
fn given_unsampled_header_when_parsed_then_sampled_false() {
    let parsed =
        TraceContext::parse("Root=1-5759e988-bd862e3fe1be46a994272793;Parent=53995c3f42cd8ad8;Sampled=0")
            .unwrap();

    assert!(!parsed.sampled());
}
