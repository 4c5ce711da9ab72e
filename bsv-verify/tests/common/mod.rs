#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use bsv_ast::PackageDef;
use bsv_core::{CheckerConfig, CoreError, PackageParser};

/// Package files on disk (for include-path probing) with their parse trees kept in memory.
pub struct Sources {
    pub dir: tempfile::TempDir,
    trees: HashMap<String, PackageDef>,
}

impl Sources {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            trees: HashMap::new(),
        }
    }

    pub fn add(mut self, tree: PackageDef) -> Self {
        std::fs::write(self.dir.path().join(format!("{}.bsv", tree.name)), "").expect("write source");
        self.trees.insert(tree.name.clone(), tree);
        self
    }

    pub fn config(&self) -> CheckerConfig {
        CheckerConfig::default().with_include_dir(self.dir.path())
    }

    pub fn parser(&self) -> impl PackageParser + use<> {
        let trees = self.trees.clone();
        move |package: &str, _path: &Path| {
            trees.get(package).cloned().ok_or_else(|| CoreError::Parse {
                package: package.to_string(),
                message: "no tree registered".to_string(),
            })
        }
    }
}
