//! Integration tests for the processor module
//!
//! Tests the split and aggregation runs over temporary scan directories.


use crate::config::SplitterConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Composite export with one core, one custom and two landmark rows
pub fn composite_source(weight: &str, chest: &str) -> String {
    format!(
        "#SizeStream Measurements
#Stored on Tue May 18 06:49:24 2021
#SizeStream Core Measurements
#format - Measurement Valid (1 = valid), Measurement Name, Measurement
#
1  Actual Weight: {weight}
#SizeStream Custom Measurements
#format - Measurement Valid (1 = valid), Measurement Name, Measurement
#
1  *****  Body Fat / Fitness: *****
1  Chest: {chest}
#SizeStream Landmarks
#format - Landmarks Valid (1 = valid), Landmark Name, Landmark x y z
#
1  AbdomenBack\t5.6\t7.8\t-9.10
1  Right heel\t1.0\t2.0\t3.0
"
    )
}

/// Write a composite scan named after its subject label
pub fn write_scan(dir: &Path, label: &str, source: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{} 2021-04-20_18-00-00_composite.txt", label));
    fs::write(&path, source).unwrap();
    path
}

/// Quiet configuration for tests
pub fn test_config() -> SplitterConfig {
    SplitterConfig {
        workers: 2,
        show_progress: false,
        ..Default::default()
    }
}
