use super::*;

#[test]
fn demo_catalog_loads() {
    let catalog = Catalog::demo().unwrap();
    assert!(!catalog.is_empty());
    assert!(!catalog.prd().is_empty());
    assert!(catalog.get("prompts/core/models_python.prompt").is_some());
}

#[test]
fn demo_catalog_derives_missing_includes() {
    let catalog = Catalog::demo().unwrap();
    let repo = catalog.get("prompts/db/repository_python.prompt").unwrap();
    assert_eq!(repo.includes, vec!["prompts/core/models_python.prompt", "prompts/core/errors_python.prompt"]);
}

#[test]
fn demo_catalog_includes_all_resolve() {
    let catalog = Catalog::demo().unwrap();
    for record in catalog.records() {
        for include in &record.includes {
            assert!(catalog.get(include).is_some(), "{} includes unknown {include}", record.id);
        }
    }
}

#[test]
fn from_json_accepts_both_dev_unit_spellings() {
    let json = r#"[
        {"id": "a", "includes": [], "devUnit": {"prompt": "p", "code": "c", "example": "e", "test": "t"}},
        {"id": "b", "includes": ["a"], "dev_unit": {"prompt": "q"}}
    ]"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert_eq!(catalog.get("a").unwrap().dev_unit.code, "c");
    assert_eq!(catalog.get("b").unwrap().dev_unit.prompt, "q");
    assert!(catalog.get("b").unwrap().dev_unit.test.is_empty());
}

#[test]
fn from_json_explicit_empty_includes_are_kept() {
    let json = r##"[{"id": "a", "includes": [], "devUnit": {"prompt": "# Imports\n- b.prompt\n"}}]"##;
    let catalog = Catalog::from_json(json).unwrap();
    assert!(catalog.get("a").unwrap().includes.is_empty());
}

#[test]
fn from_json_rejects_non_array() {
    let err = Catalog::from_json(r#"{"id": "a"}"#).unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
    assert_eq!(err.error_code(), "E_CATALOG_PARSE");
}

#[test]
fn load_missing_file_reports_path() {
    let err = Catalog::load(Some(Path::new("/definitely/not/here.json")), None).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here.json"));
}

#[test]
fn load_without_paths_is_demo() {
    let catalog = Catalog::load(None, None).unwrap();
    assert_eq!(catalog.len(), Catalog::demo().unwrap().len());
}

#[test]
fn load_from_files_overrides_demo() {
    let dir = std::env::temp_dir().join(format!("promptdeck-catalog-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let prompts = dir.join("prompts.json");
    let prd = dir.join("prd.md");
    std::fs::write(&prompts, r#"[{"id": "only.prompt"}]"#).unwrap();
    std::fs::write(&prd, "# Custom PRD\n").unwrap();

    let with_prd = Catalog::load(Some(prompts.as_path()), Some(prd.as_path())).unwrap();
    assert_eq!(with_prd.ids().collect::<Vec<_>>(), vec!["only.prompt"]);
    assert_eq!(with_prd.prd(), "# Custom PRD\n");

    let demo_prd = Catalog::load(Some(prompts.as_path()), None).unwrap();
    assert_eq!(demo_prd.prd(), Catalog::demo().unwrap().prd());

    std::fs::write(&prompts, "[]").unwrap();
    assert!(Catalog::load(Some(prompts.as_path()), None).unwrap().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn duplicate_id_lookup_keeps_first() {
    let catalog = Catalog::new(vec![
        PromptRecord::new("a", &[]).with_prompt("first"),
        PromptRecord::new("a", &[]).with_prompt("second"),
    ]);
    assert_eq!(catalog.get("a").unwrap().dev_unit.prompt, "first");
    assert_eq!(catalog.len(), 2);
}

#[test]
fn ids_follow_input_order() {
    let catalog = Catalog::new(vec![PromptRecord::new("z", &[]), PromptRecord::new("a", &[])]);
    assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["z", "a"]);
}

#[test]
fn label_strips_directory_and_suffix() {
    assert_eq!(label_for("prompts/core/models_python.prompt"), "models_python");
    assert_eq!(label_for("plain"), "plain");
    assert_eq!(label_for("dir/notes.txt"), "notes.txt");
    assert_eq!(label_for("dir/.prompt"), "dir/.prompt");
}

#[test]
fn directory_falls_back_to_dot_slash() {
    assert_eq!(directory_for("prompts/core/x.prompt"), "prompts/core");
    assert_eq!(directory_for("x.prompt"), "./");
    assert_eq!(directory_for("/x.prompt"), "./");
}
