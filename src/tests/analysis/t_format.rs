use crate::analysis::results::{Position, Range};
use crate::analysis::test_support::fixture;
use crate::diag;
use crate::facility::trees::ImportLine;

#[test]
fn override_is_inserted_above_the_method_with_its_indentation() {
    let mut fx = fixture();
    let uri = "file:///w/Runner.java";
    fx.service.did_open(
        uri,
        "class Runner implements Runnable {\n    public void run() {}\n}\n".to_string(),
        1,
    );
    fx.state
        .borrow_mut()
        .compiles
        .entry(uri.to_string())
        .or_default()
        .overrides = vec![diag::Position::new(2, 5)];

    let edits = fx.service.formatting(uri).unwrap();
    assert_eq!(edits.len(), 1);
    let edit = &edits[0];
    assert_eq!(
        edit.range,
        Range::new(Position::new(1, 0), Position::new(1, 0))
    );
    assert_eq!(edit.new_text, "    @Override\n");
}

#[test]
fn unused_import_is_deleted_and_needed_import_inserted() {
    let mut fx = fixture();
    let uri = "file:///w/Uses.java";
    fx.service.did_open(
        uri,
        "package p;\nimport java.util.Map;\nclass Uses { List<String> xs; }\n".to_string(),
        1,
    );
    {
        let mut state = fx.state.borrow_mut();
        let compile = state.compiles.entry(uri.to_string()).or_default();
        compile.imports = vec![ImportLine {
            line: 2,
            is_static: false,
        }];
        compile.fixed_imports = vec!["java.util.List".to_string()];
        compile.package_line = Some(1);
    }

    let edits = fx.service.formatting(uri).unwrap();
    assert_eq!(edits.len(), 2);

    // Whole-line delete of the stale import.
    assert_eq!(
        edits[0].range,
        Range::new(Position::new(1, 0), Position::new(2, 0))
    );
    assert_eq!(edits[0].new_text, "");

    // Insert at the first existing import line, no leading newline.
    assert_eq!(
        edits[1].range,
        Range::new(Position::new(1, 0), Position::new(1, 0))
    );
    assert_eq!(edits[1].new_text, "import java.util.List;\n");
}

#[test]
fn imports_insert_after_the_package_when_none_exist() {
    let mut fx = fixture();
    let uri = "file:///w/Fresh.java";
    fx.service
        .did_open(uri, "package p;\nclass Fresh {}\n".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        let compile = state.compiles.entry(uri.to_string()).or_default();
        compile.fixed_imports = vec!["java.util.List".to_string()];
        compile.package_line = Some(1);
    }

    let edits = fx.service.formatting(uri).unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].range,
        Range::new(Position::new(1, 0), Position::new(1, 0))
    );
    assert_eq!(edits[0].new_text, "\nimport java.util.List;\n");
}

#[test]
fn imports_insert_at_file_start_without_a_package() {
    let mut fx = fixture();
    let uri = "file:///w/Bare.java";
    fx.service.did_open(uri, "class Bare {}\n".to_string(), 1);
    fx.state
        .borrow_mut()
        .compiles
        .entry(uri.to_string())
        .or_default()
        .fixed_imports = vec!["java.util.List".to_string()];

    let edits = fx.service.formatting(uri).unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].range,
        Range::new(Position::new(0, 0), Position::new(0, 0))
    );
    assert_eq!(edits[0].new_text, "import java.util.List;\n");
}

#[test]
fn static_imports_are_preserved() {
    let mut fx = fixture();
    let uri = "file:///w/Statics.java";
    fx.service.did_open(
        uri,
        "import static org.junit.Assert.assertTrue;\nclass Statics {}\n".to_string(),
        1,
    );
    fx.state
        .borrow_mut()
        .compiles
        .entry(uri.to_string())
        .or_default()
        .imports = vec![ImportLine {
        line: 1,
        is_static: true,
    }];

    let edits = fx.service.formatting(uri).unwrap();
    assert!(edits.is_empty());
}

#[test]
fn multiple_imports_are_written_one_per_line_in_facility_order() {
    let mut fx = fixture();
    let uri = "file:///w/Many.java";
    fx.service
        .did_open(uri, "import a.A;\nclass Many {}\n".to_string(), 1);
    {
        let mut state = fx.state.borrow_mut();
        let compile = state.compiles.entry(uri.to_string()).or_default();
        compile.imports = vec![ImportLine {
            line: 1,
            is_static: false,
        }];
        compile.fixed_imports = vec![
            "java.util.List".to_string(),
            "java.util.Map".to_string(),
        ];
    }

    let edits = fx.service.formatting(uri).unwrap();
    let insert = edits.last().unwrap();
    assert_eq!(
        insert.new_text,
        "import java.util.List;\nimport java.util.Map;\n"
    );
}
