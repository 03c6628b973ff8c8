use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const TREE: &str = r#"[
    {"id": 1, "label": "Electronics", "children": [
        {"id": 2, "label": "Phones", "children": [{"id": "3", "label": "Android"}]},
        {"id": 4, "label": "Laptops"}
    ]},
    {"id": 5, "label": "Garden"}
]"#;

const PRODUCTS: &str = r#"[
    {"name": "Pixel", "category_name": "Electronics > Phones > Android"},
    {"name": "Rake", "category_name": "Garden"},
    {"name": "Mystery", "category_name": null},
    {"name": "Galaxy", "category": [{"name": "Electronics"}, {"name": "Phones"}, {"name": "Android"}]}
]"#;

#[allow(deprecated)]
fn cli(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("catalog-taxonomy").expect("binary");
    cmd.current_dir(workdir).arg("--quiet");
    cmd
}

fn workspace() -> TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("tree.json"), TREE).unwrap();
    fs::write(temp.path().join("products.json"), PRODUCTS).unwrap();
    temp
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn resolve_handles_every_shape() {
    let temp = tempdir().unwrap();
    cli(temp.path())
        .args(["resolve", "Electronics > Phones > Android"])
        .assert()
        .success()
        .stdout("Android\n");

    cli(temp.path())
        .args([
            "resolve",
            "--each",
            r#"[{"name":"Shoes","children":[{"name":"Sneakers"}]}, [{"name":"A"},{"name":"B"}], null, {"category_name":"Hats"}]"#,
        ])
        .assert()
        .success()
        .stdout("Sneakers\nB\n\nHats\n");
}

#[test]
fn resolve_each_requires_array() {
    let temp = tempdir().unwrap();
    cli(temp.path())
        .args(["resolve", "--each", r#"{"name":"x"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--each expects a JSON array"));
}

fn matched_names(matched: &Value) -> Vec<&str> {
    matched
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect()
}

#[test]
fn filter_reads_category_name_of_whole_records() {
    let temp = workspace();
    let matched = stdout_json(cli(temp.path()).args([
        "filter",
        "--products",
        "products.json",
        "android",
    ]));
    assert_eq!(matched_names(&matched), vec!["Pixel"]);

    let matched = stdout_json(cli(temp.path()).args(["filter", "--products", "products.json", ""]));
    assert_eq!(matched_names(&matched), vec!["Mystery"]);
}

#[test]
fn filter_on_field_matches_any_breadcrumb_element() {
    let temp = workspace();
    let matched = stdout_json(cli(temp.path()).args([
        "filter",
        "--products",
        "products.json",
        "--field",
        "category",
        "phones",
    ]));
    assert_eq!(matched_names(&matched), vec!["Galaxy"]);
}

#[test]
fn search_outline_expands_matching_branches() {
    let temp = workspace();
    cli(temp.path())
        .args(["search", "--tree", "tree.json", "--outline", "andr"])
        .assert()
        .success()
        .stdout("- Electronics (1)\n  - Phones (2)\n      Android (3)\n");
}

#[test]
fn search_json_leaves_file_untouched() {
    let temp = workspace();
    let tree = stdout_json(cli(temp.path()).args(["search", "--tree", "tree.json", "garden"]));
    assert_eq!(tree, serde_json::json!([{"id": 5, "label": "Garden", "expanded": false}]));
    assert_eq!(fs::read_to_string(temp.path().join("tree.json")).unwrap(), TREE);
}

#[test]
fn label_uses_config_and_flat_categories() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("flat.json"),
        r#"[{"id":1,"name":"Electronics"},{"id":2,"name":"Phones","parent_id":1}]"#,
    )
    .unwrap();
    fs::write(
        temp.path().join("taxonomy.toml"),
        "[display]\nseparator = \" / \"\nuncategorized = \"None\"\n",
    )
    .unwrap();

    cli(temp.path())
        .args(["label", "--full-path", "--categories", "flat.json", r#"{"id":2,"name":"Phones"}"#])
        .assert()
        .success()
        .stdout("Electronics / Phones\n");

    cli(temp.path())
        .args(["label", "--badge", "null"])
        .assert()
        .success()
        .stdout("[None]\n");
}

#[test]
fn unknown_config_key_fails() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("custom.toml"), "[picker]\ncolour = \"red\"\n").unwrap();
    cli(temp.path())
        .args(["--config", "custom.toml", "resolve", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn pick_by_label_emits_coerced_id() {
    let temp = workspace();
    let body = stdout_json(cli(temp.path()).args([
        "pick",
        "--tree",
        "tree.json",
        "--search",
        "andr",
        "--select",
        "android",
    ]));
    assert_eq!(body["id"], 3);
    assert_eq!(body["label"], "Android");
    assert_eq!(body["created"], false);
}

#[test]
fn pick_branch_needs_branch_selection() {
    let temp = workspace();
    cli(temp.path())
        .args(["pick", "--tree", "tree.json", "--select", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("allow_branch_selection"));

    fs::write(
        temp.path().join("taxonomy.toml"),
        "[picker]\nallow_branch_selection = true\n",
    )
    .unwrap();
    let body = stdout_json(cli(temp.path()).args(["pick", "--tree", "tree.json", "--select", "1"]));
    assert_eq!(body["label"], "Electronics");
}

#[test]
fn pick_create_appends_to_tree_file() {
    let temp = workspace();
    fs::write(
        temp.path().join("taxonomy.toml"),
        "[picker]\ncreate_new_enabled = true\n",
    )
    .unwrap();

    let body = stdout_json(cli(temp.path()).args(["pick", "--tree", "tree.json", "--create", "Toys"]));
    assert_eq!(body["id"], 6);
    assert_eq!(body["created"], true);

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("tree.json")).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 3);
    assert_eq!(saved[2]["label"], "Toys");
}

#[test]
fn pick_create_refuses_when_search_has_results() {
    let temp = workspace();
    fs::write(
        temp.path().join("taxonomy.toml"),
        "[picker]\ncreate_new_enabled = true\n",
    )
    .unwrap();
    cli(temp.path())
        .args(["pick", "--tree", "tree.json", "--create", "Garden"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has results"));
    assert_eq!(fs::read_to_string(temp.path().join("tree.json")).unwrap(), TREE);
}
