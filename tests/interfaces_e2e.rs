//! Interface queries over a realistic collection hierarchy.

use std::sync::Arc;

use typesieve::{
    all_interfaces, all_open_generic_interfaces, has_interface, has_open_generic_interface,
    TypeShape, ValidationError,
};

/// `List<int>` with the usual collection hierarchy, both generic and not.
fn list_of_int() -> TypeShape {
    let enumerable = Arc::new(TypeShape::interface("IEnumerable"));
    let collection = Arc::new(TypeShape::interface("ICollection").implementing(Arc::clone(&enumerable)));
    let list = Arc::new(TypeShape::interface("IList").implementing(Arc::clone(&collection)));

    let enumerable_t = Arc::new(
        TypeShape::interface("IEnumerable")
            .closed(["int"])
            .implementing(Arc::clone(&enumerable)),
    );
    let collection_t = Arc::new(
        TypeShape::interface("ICollection")
            .closed(["int"])
            .implementing(Arc::clone(&enumerable_t)),
    );
    let list_t = Arc::new(
        TypeShape::interface("IList")
            .closed(["int"])
            .implementing(Arc::clone(&collection_t)),
    );

    TypeShape::class("List")
        .closed(["int"])
        .with_base(Arc::new(TypeShape::class("Object")))
        .implementing(list_t)
        .implementing(collection_t)
        .implementing(enumerable_t)
        .implementing(list)
        .implementing(collection)
        .implementing(enumerable)
}

fn names(shapes: &[Arc<TypeShape>]) -> Vec<String> {
    let mut names: Vec<String> = shapes.iter().map(ToString::to_string).collect();
    names.sort();
    names
}

#[test]
fn test_closed_list_reports_every_interface_once() {
    let all = all_interfaces(&list_of_int());
    assert_eq!(
        names(&all),
        vec![
            "ICollection",
            "ICollection<int>",
            "IEnumerable",
            "IEnumerable<int>",
            "IList",
            "IList<int>",
        ]
    );
}

#[test]
fn test_closed_list_reports_open_definitions() {
    let open = all_open_generic_interfaces(&list_of_int());
    assert_eq!(names(&open), vec!["ICollection<>", "IEnumerable<>", "IList<>"]);
}

#[test]
fn test_closed_and_plain_interface_queries() {
    let list = list_of_int();
    assert!(has_interface(&list, &TypeShape::interface("IList").closed(["int"])).unwrap());
    assert!(has_interface(&list, &TypeShape::interface("IEnumerable")).unwrap());
    assert!(!has_interface(&list, &TypeShape::interface("IList").closed(["string"])).unwrap());
    assert!(!has_interface(&list, &TypeShape::interface("IDisposable")).unwrap());
}

#[test]
fn test_open_generic_queries() {
    let list = list_of_int();
    assert!(has_open_generic_interface(&list, &TypeShape::interface("IList").open(1)).unwrap());
    assert!(has_open_generic_interface(&list, &TypeShape::interface("ICollection").open(1)).unwrap());
    assert!(!has_open_generic_interface(&list, &TypeShape::interface("IDictionary").open(2)).unwrap());
}

#[test]
fn test_interfaces_inherited_through_base_chain() {
    let disposable = Arc::new(TypeShape::interface("IDisposable"));
    let stream = Arc::new(TypeShape::class("Stream").implementing(disposable));
    let buffered = Arc::new(TypeShape::class("BufferedStream").with_base(stream));
    let file = TypeShape::class("FileStream").with_base(buffered);

    assert!(has_interface(&file, &TypeShape::interface("IDisposable")).unwrap());
    assert_eq!(all_interfaces(&file).len(), 1);
}

#[test]
fn test_argument_errors_name_the_parameter() {
    let list = list_of_int();
    let cases = [
        has_interface(&list, &TypeShape::class("Object")).unwrap_err(),
        has_open_generic_interface(&list, &TypeShape::class("List").open(1)).unwrap_err(),
        has_open_generic_interface(&list, &TypeShape::interface("IList").closed(["int"])).unwrap_err(),
        has_open_generic_interface(&list, &TypeShape::interface("IEnumerable")).unwrap_err(),
    ];
    for err in cases {
        assert!(matches!(err, ValidationError::InvalidArgument { .. }));
        assert_eq!(err.param(), Some("interfaceType"));
    }
}
