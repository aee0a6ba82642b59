#![allow(dead_code)]

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the dotchart binary.
#[macro_export]
macro_rules! dotchart {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("dotchart"))
    };
}

/// Temporary directory holding CSV and settings files for one test.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file in the temp directory and returns its path.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Writes a small nations data set: three countries over three years,
    /// with "Chad" present only in 1900.
    pub fn create_nations_csv(&self) -> PathBuf {
        let rows = [
            ("China", "Asia", 1800, 985.0, 32.0, 3.2e8),
            ("France", "Europe", 1800, 1430.0, 34.0, 2.9e7),
            ("China", "Asia", 1850, 1010.0, 32.5, 4.1e8),
            ("France", "Europe", 1850, 1940.0, 38.0, 3.6e7),
            ("China", "Asia", 1900, 1080.0, 33.0, 4.0e8),
            ("France", "Europe", 1900, 3520.0, 46.0, 4.0e7),
            ("Chad", "Africa", 1900, 520.0, 29.0, 1.5e6),
        ];
        let mut content = String::from("name,region,year,income,life,population\n");
        for (name, region, year, income, life, population) in rows {
            let _ = writeln!(content, "{name},{region},{year},{income},{life},{population}");
        }
        self.create_file("nations.csv", &content)
    }
}
