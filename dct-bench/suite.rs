use std::collections::BTreeMap;
use walkdir::WalkDir;

use crate::{
    util::{is_png, parent_dir},
    variants::Variant,
};

#[derive(Debug)]
pub struct VariantResult {
    pub min_time: u128,
    pub changed_samples: usize,
}

#[derive(Debug)]
pub struct Test {
    pub name: String,
    pub samples: usize,
    pub results: BTreeMap<Variant, VariantResult>,
    pub errored: bool,
}

#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub files: Vec<String>,
    pub tests: Vec<Test>,
}

// one suite per directory below `root`, holding the png files directly inside it
pub fn generate_test_suites(root: &str) -> BTreeMap<String, TestSuite> {
    let mut suites: BTreeMap<String, TestSuite> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let Ok(entry) = entry else {
            continue;
        };

        let Some(path) = entry.path().to_str() else {
            continue;
        };

        if entry.file_type().is_dir() {
            suites.insert(
                path.to_string(),
                TestSuite {
                    name: path.to_string(),
                    files: Vec::new(),
                    tests: Vec::new(),
                },
            );
            continue;
        }

        if !is_png(entry.path()) {
            continue;
        }

        let Some(suite) = parent_dir(entry.path()).and_then(|dir| suites.get_mut(dir)) else {
            println!("No suite for {}", path);
            continue;
        };

        suite.files.push(path.to_string());
    }
    suites
}
