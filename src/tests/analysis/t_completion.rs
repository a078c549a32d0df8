use crate::analysis::completion::{MAX_COMPLETION_ITEMS, TOP_LEVEL_KEYWORDS};
use crate::analysis::results::CompletionItemKind;
use crate::analysis::test_support::{DocEntry, field_element, fixture, method_element};
use crate::facility::complete::{
    ClassName, Completion, CompletionContext, ContextKind, PackagePart, Snippet,
};
use crate::facility::docs::{DocComment, MethodDoc, MethodDocParam};
use crate::facility::element::Param;
use crate::facility::ptr::Ptr;

fn identifier_context() -> CompletionContext {
    CompletionContext {
        kind: ContextKind::Identifier,
        line: 1,
        character: 1,
        partial_name: String::new(),
        in_class: true,
        in_method: true,
    }
}

fn member_context() -> CompletionContext {
    CompletionContext {
        kind: ContextKind::MemberSelect,
        line: 1,
        character: 20,
        partial_name: String::new(),
        in_class: true,
        in_method: true,
    }
}

#[test]
fn empty_context_offers_top_level_keywords() {
    let mut fx = fixture();
    let uri = "file:///w/A.java";
    fx.service.did_open(uri, "class A { \n}".to_string(), 1);

    let reply = fx.service.completion(uri, 0, 10).unwrap().unwrap();
    assert!(reply.is_incomplete);
    assert_eq!(reply.items.len(), TOP_LEVEL_KEYWORDS.len());
    for (item, keyword) in reply.items.iter().zip(TOP_LEVEL_KEYWORDS) {
        assert_eq!(item.label, *keyword);
        assert_eq!(item.kind, Some(CompletionItemKind::Keyword));
        assert_eq!(item.detail.as_deref(), Some("keyword"));
    }
    // Keyword fallbacks never compile a focus.
    assert_eq!(fx.state.borrow().focus_calls, 0);
}

#[test]
fn member_completion_maps_fields() {
    let mut fx = fixture();
    let uri = "file:///w/B.java";
    fx.service
        .did_open(uri, "class B { int x; void m() { this. } }".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(member_context());
        state.focus.members = vec![Completion::Element(field_element(
            "com.example",
            "B",
            "x",
            "int",
        ))];
    }

    let reply = fx.service.completion(uri, 0, 33).unwrap().unwrap();
    assert!(!reply.is_incomplete);
    let item = &reply.items[0];
    assert_eq!(item.label, "x");
    assert_eq!(item.kind, Some(CompletionItemKind::Field));
    assert_eq!(item.detail.as_deref(), Some("int"));
    assert_eq!(item.sort_text.as_deref(), Some("2x"));
}

#[test]
fn object_members_sort_last() {
    let mut fx = fixture();
    let uri = "file:///w/B.java";
    fx.service.did_open(uri, "class B {}".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(member_context());
        state.focus.members = vec![Completion::Element(method_element(
            "java.lang",
            "Object",
            "hashCode",
        ))];
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    assert_eq!(reply.items[0].sort_text.as_deref(), Some("9hashCode"));
}

#[test]
fn sort_priorities_by_shape() {
    let mut fx = fixture();
    let uri = "file:///w/C.java";
    fx.service.did_open(uri, "class C {}".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(identifier_context());
        state.focus.identifiers = vec![
            Completion::Snippet(Snippet {
                label: "main".to_string(),
                snippet: "public static void main(String[] args) {\n    $0\n}".to_string(),
            }),
            Completion::PackagePart(PackagePart {
                name: "util".to_string(),
                full_name: "java.util".to_string(),
            }),
            Completion::Keyword("return".to_string()),
            Completion::ClassName(ClassName {
                name: "java.util.List".to_string(),
                is_imported: true,
            }),
            Completion::ClassName(ClassName {
                name: "java.util.Map".to_string(),
                is_imported: false,
            }),
        ];
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    let sort: Vec<&str> = reply
        .items
        .iter()
        .map(|i| i.sort_text.as_deref().unwrap())
        .collect();
    assert_eq!(sort, vec!["1main", "2util", "3return", "2List", "4Map"]);
    assert_eq!(reply.items[0].kind, Some(CompletionItemKind::Snippet));
    assert_eq!(
        reply.items[0].insert_text.as_deref(),
        Some("public static void main(String[] args) {\n    $0\n}")
    );
    // Class labels are simple names; the detail keeps the qualified name.
    assert_eq!(reply.items[3].label, "List");
    assert_eq!(reply.items[3].detail.as_deref(), Some("java.util.List"));
}

#[test]
fn identifier_completion_marks_incomplete_at_the_ceiling() {
    let mut fx = fixture();
    let uri = "file:///w/D.java";
    fx.service.did_open(uri, "class D {}".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(identifier_context());
        state.focus.identifiers = (0..MAX_COMPLETION_ITEMS)
            .map(|i| {
                Completion::Element(field_element("com.example", "D", &format!("f{i}"), "int"))
            })
            .collect();
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    assert!(reply.is_incomplete);
    assert_eq!(reply.items.len(), MAX_COMPLETION_ITEMS);
}

#[test]
fn every_item_resolves_against_the_cache() {
    let mut fx = fixture();
    let uri = "file:///w/E.java";
    fx.service.did_open(uri, "class E {}".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(member_context());
        state.focus.members = vec![
            Completion::Element(field_element("com.example", "E", "x", "int")),
            Completion::Element(method_element("com.example", "E", "m")),
        ];
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    for item in &reply.items {
        let id = item.data.as_deref().expect("items carry resolve data");
        assert!(fx.service.resolve_completion(id).is_some());
    }
}

#[test]
fn resolve_miss_leaves_the_item_unchanged() {
    let fx = fixture();
    assert!(fx.service.resolve_completion("not-a-cached-id").is_none());
}

#[test]
fn a_new_completion_replaces_the_cache() {
    let mut fx = fixture();
    let uri = "file:///w/F.java";
    fx.service.did_open(uri, "class F {}".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(member_context());
        state.focus.members = vec![Completion::Element(field_element(
            "com.example",
            "F",
            "x",
            "int",
        ))];
    }
    let first = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    let stale_id = first.items[0].data.clone().unwrap();

    fx.service.completion(uri, 0, 0).unwrap().unwrap();
    assert!(fx.service.resolve_completion(&stale_id).is_none());
}

#[test]
fn method_detail_falls_back_to_short_types_for_generated_names() {
    let mut fx = fixture();
    let uri = "file:///w/G.java";
    fx.service.did_open(uri, "class G {}".to_string(), 1);
    let mut method = method_element("com.example", "G", "concat");
    method.return_type = Some("String".to_string());
    method.params = vec![
        Param {
            name: "arg0".to_string(),
            type_name: "String".to_string(),
        },
        Param {
            name: "arg1".to_string(),
            type_name: "String".to_string(),
        },
    ];
    method.erased_params = vec!["java.lang.String".to_string(), "java.lang.String".to_string()];
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(member_context());
        state.focus.members = vec![Completion::Element(method)];
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    let id = reply.items[0].data.clone().unwrap();
    let resolution = fx.service.resolve_completion(&id).unwrap();
    assert_eq!(
        resolution.detail.as_deref(),
        Some("String concat(String, String)")
    );
}

#[test]
fn method_detail_prefers_doc_path_parameter_names() {
    let mut fx = fixture();
    let uri = "file:///w/H.java";
    fx.service.did_open(uri, "class H {}".to_string(), 1);
    let mut method = method_element("com.example", "H", "copy");
    method.return_type = Some("void".to_string());
    method.params = vec![Param {
        name: "arg0".to_string(),
        type_name: "Path".to_string(),
    }];
    method.erased_params = vec!["java.nio.file.Path".to_string()];
    let ptr = Ptr::from_element(&method);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(member_context());
        state.focus.members = vec![Completion::Element(method)];
        state.docs.insert(
            ptr.path().to_string(),
            DocEntry {
                method: Some(MethodDoc {
                    return_type: "void".to_string(),
                    name: "copy".to_string(),
                    params: vec![MethodDocParam {
                        name: "target".to_string(),
                        type_name: "Path".to_string(),
                    }],
                }),
                comment: Some(DocComment {
                    first_sentence: "Copies this file to `target`.".to_string(),
                    params: Vec::new(),
                }),
            },
        );
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    let id = reply.items[0].data.clone().unwrap();
    let resolution = fx.service.resolve_completion(&id).unwrap();
    assert_eq!(resolution.detail.as_deref(), Some("void copy(target)"));
    assert_eq!(
        resolution.documentation.as_deref(),
        Some("Copies this file to `target`.")
    );
}

#[test]
fn class_name_resolve_finds_docs_by_qualified_name() {
    let mut fx = fixture();
    let uri = "file:///w/I.java";
    fx.service.did_open(uri, "class I {}".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        state.parses.entry(uri.to_string()).or_default().context = Some(identifier_context());
        state.focus.identifiers = vec![Completion::ClassName(ClassName {
            name: "java.util.List".to_string(),
            is_imported: false,
        })];
        state.docs.insert(
            Ptr::to_class("java.util", "List").path().to_string(),
            DocEntry {
                method: None,
                comment: Some(DocComment {
                    first_sentence: "An ordered collection.".to_string(),
                    params: Vec::new(),
                }),
            },
        );
    }

    let reply = fx.service.completion(uri, 0, 0).unwrap().unwrap();
    let id = reply.items[0].data.clone().unwrap();
    let resolution = fx.service.resolve_completion(&id).unwrap();
    assert_eq!(
        resolution.documentation.as_deref(),
        Some("An ordered collection.")
    );
}
