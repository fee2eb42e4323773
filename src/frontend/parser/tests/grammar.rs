use expect_test::expect;

use super::fixtures::{count_kind, parse_ok, sexp_of};
use crate::SyntaxKind;

const INVENTORY: &str = r#"using System;
using System.Collections;

namespace Demo;

[Reflect]
public class Inventory<T> : IDisposable where T : class
{
    private List<T> mItems = new List<T>();
    public int Count => mItems.Count;
    public bool IsEmpty { get { return Count == 0; } }

    public this(int capacity)
    {
        mItems = new List<T>(capacity);
    }

    public ~this()
    {
        delete mItems;
    }

    public void Add(T item)
    {
        if (item == null)
            return;
        mItems.Add(item);
    }

    public int Sum(int[] values)
    {
        int total = 0;
        for (int i = 0; i < values.Count; i++)
            total += values[i];
        for (let value in values)
            total += value;
        return total;
    }

    public static String Describe(Shape shape)
    {
        switch (shape)
        {
        case .Circle(let radius):
            return scope $"circle {radius}";
        default:
            return "other";
        }
    }
}
"#;

#[test]
fn whole_unit_parses_cleanly() {
    let result = parse_ok(INVENTORY);
    let tree = &result.tree;
    assert_eq!(count_kind(tree, SyntaxKind::UsingDirective), 2);
    assert_eq!(count_kind(tree, SyntaxKind::MethodDeclaration), 3);
    assert_eq!(count_kind(tree, SyntaxKind::ConstructorDeclaration), 1);
    assert_eq!(count_kind(tree, SyntaxKind::DestructorDeclaration), 1);
    assert_eq!(count_kind(tree, SyntaxKind::PropertyDeclaration), 2);
    assert_eq!(count_kind(tree, SyntaxKind::ForStatement), 1);
    assert_eq!(count_kind(tree, SyntaxKind::ForeachStatement), 1);
    assert_eq!(count_kind(tree, SyntaxKind::DeleteStatement), 1);
    assert_eq!(count_kind(tree, SyntaxKind::InterpolatedStringExpression), 1);
}

#[test]
fn every_node_span_lies_inside_its_parent() {
    let result = parse_ok(INVENTORY);
    for node in result.tree.descendants() {
        for child in node.child_nodes() {
            assert!(
                node.span().start <= child.span().start && child.span().end <= node.span().end,
                "{:?} escapes {:?}",
                child.kind(),
                node.kind()
            );
        }
    }
}

#[test]
fn enum_case_pattern_binds_payload() {
    let result = parse_ok(INVENTORY);
    expect![[r#"(recursive_pattern name: (identifier "Circle") (positional_pattern_clause (subpattern pattern: (var_pattern name: (identifier "radius")))))"#]]
        .assert_eq(&sexp_of(&result.tree, SyntaxKind::RecursivePattern));
    let section = result
        .tree
        .find_descendant(SyntaxKind::SwitchSection)
        .map(|node| node.trimmed_text())
        .unwrap_or_default();
    assert!(section.starts_with("case .Circle(let radius):"), "{section}");
}

#[test]
fn leading_shebang_line_is_trivia() {
    let source = "#!/usr/bin/env beef\nclass C { }\n";
    let result = parse_ok(source);
    let kinds: Vec<_> = result.tree.child_nodes().map(|node| node.kind()).collect();
    assert_eq!(kinds, vec![SyntaxKind::ClassDeclaration]);
}
