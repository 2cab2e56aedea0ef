//! Tests for indented and termtree rendering

use sizetree::util::testing;
use sizetree::{NodeSpec, NodeTree, RenderSettings, RenderStyle, TreeBuilder};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn media_tree() -> NodeTree {
    let spec = NodeSpec::composite(
        "Media",
        vec![
            NodeSpec::composite("Movies", vec![NodeSpec::leaf("GreatMovie.mkv", 4500.0)]),
            NodeSpec::composite(
                "TV",
                vec![NodeSpec::composite(
                    "s1",
                    vec![
                        NodeSpec::leaf("ep1.mkv", 850.0),
                        NodeSpec::leaf("ep2.mkv", 900.0),
                    ],
                )],
            ),
        ],
    );
    TreeBuilder::new().build(&spec).unwrap()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[test]
fn given_media_tree_when_rendering_then_produces_indented_listing() {
    let tree = media_tree();
    let root = tree.root().unwrap();

    let output = tree.render(root).unwrap();

    let expected = "\
+ [Media] (Total: 6250.0 MB)
  + [Movies] (Total: 4500.0 MB)
    - GreatMovie.mkv (4500.0 MB)
  + [TV] (Total: 1750.0 MB)
    + [s1] (Total: 1750.0 MB)
      - ep1.mkv (850.0 MB)
      - ep2.mkv (900.0 MB)
";
    assert_eq!(output, expected);
}

#[test]
fn given_fractional_sizes_when_rendering_then_prints_shortest_form() {
    let mut tree = NodeTree::new();
    let season = tree.insert_composite("s1");
    let ep1 = tree.insert_leaf("ep1.mkv", 850.5).unwrap();
    let ep2 = tree.insert_leaf("ep2.mkv", 900.0).unwrap();
    tree.add(season, ep1).unwrap();
    tree.add(season, ep2).unwrap();

    let output = tree.render(season).unwrap();

    assert_eq!(
        output,
        "+ [s1] (Total: 1750.5 MB)\n  - ep1.mkv (850.5 MB)\n  - ep2.mkv (900.0 MB)\n"
    );
}

#[test]
fn given_media_tree_when_rendering_then_nesting_depth_equals_tree_depth() {
    let tree = media_tree();
    let root = tree.root().unwrap();

    let output = tree.render(root).unwrap();

    let max_level = output.lines().map(indent_of).max().unwrap() / 2;
    assert_eq!(max_level + 1, tree.depth(root));
    assert_eq!(output.lines().count(), tree.iter(root).count());
}

#[test]
fn given_media_tree_when_rendering_then_leaf_lines_are_indented_past_their_parent() {
    let tree = media_tree();
    let root = tree.root().unwrap();

    let output = tree.render(root).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    // Pre-order: every line's parent is the closest preceding line with smaller indent
    for (i, line) in lines.iter().enumerate().skip(1) {
        let indent = indent_of(line);
        let parent = lines[..i]
            .iter()
            .rev()
            .find(|l| indent_of(l) < indent)
            .expect("every non-root line has a parent line");
        assert!(parent.trim_start().starts_with("+ ["), "parent must be composite: {}", parent);
        assert_eq!(indent_of(parent) + 2, indent);
    }
}

#[test]
fn given_subtree_when_rendering_then_starts_at_depth_zero() {
    let tree = media_tree();
    let root = tree.root().unwrap();
    let tv = tree.find_child(root, "TV").unwrap();

    let output = tree.render(tv).unwrap();

    assert!(output.starts_with("+ [TV] (Total: 1750.0 MB)\n"));
    assert!(output.contains("\n    - ep2.mkv (900.0 MB)\n"));
}

#[test]
fn given_tree_style_when_displaying_then_uses_box_drawing() {
    let tree = media_tree();
    let root = tree.root().unwrap();
    let settings = RenderSettings {
        style: RenderStyle::Tree,
        ..Default::default()
    };

    let output = tree.display(root, &settings).unwrap();

    let first = output.lines().next().unwrap();
    assert_eq!(first, "+ [Media] (Total: 6250.0 MB)");
    assert!(output.contains("├── + [Movies] (Total: 4500.0 MB)"));
    assert!(output.contains("└── + [TV] (Total: 1750.0 MB)"));
    assert!(output.contains("- ep2.mkv (900.0 MB)"));
}

#[test]
fn given_indented_style_when_displaying_then_matches_render() {
    let tree = media_tree();
    let root = tree.root().unwrap();

    assert_eq!(
        tree.display(root, &RenderSettings::default()).unwrap(),
        tree.render(root).unwrap()
    );
}

#[test]
fn given_deep_chain_when_rendering_then_every_level_is_listed() {
    // Arrange
    const LEVELS: usize = 2_000;
    let mut tree = NodeTree::new();
    let root = tree.insert_composite("level0");
    let mut current = root;
    for level in 1..LEVELS {
        let next = tree.insert_composite(format!("level{}", level));
        tree.add(current, next).unwrap();
        current = next;
    }
    let leaf = tree.insert_leaf("bottom.mkv", 2.5).unwrap();
    tree.add(current, leaf).unwrap();

    // Act
    let output = tree.render(root).unwrap();

    // Assert
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), LEVELS + 1);
    assert_eq!(lines[0], "+ [level0] (Total: 2.5 MB)");
    let last = lines[LEVELS];
    assert_eq!(indent_of(last), 2 * LEVELS);
    assert_eq!(last.trim_start(), "- bottom.mkv (2.5 MB)");
}

#[test]
fn given_shared_child_when_displaying_tree_style_then_lists_every_occurrence() {
    let mut tree = NodeTree::new();
    let dir = tree.insert_composite("dir");
    let file = tree.insert_leaf("file", 1.0).unwrap();
    tree.add(dir, file).unwrap();
    tree.add(dir, file).unwrap();
    let settings = RenderSettings {
        style: RenderStyle::Tree,
        ..Default::default()
    };

    let output = tree.display(dir, &settings).unwrap();

    assert_eq!(
        output,
        "+ [dir] (Total: 2.0 MB)\n├── - file (1.0 MB)\n└── - file (1.0 MB)\n"
    );
}
