// epiwatch-core/src/application/clean.rs

use crate::domain::project::PipelineConfig;
use crate::error::EpiwatchError;
use std::fs;
use std::path::{Component, Path};

/// Removes the target directory plus the configured clean targets.
/// Returns the entries actually removed.
pub fn clean_project(project_dir: &Path, config: &PipelineConfig) -> Result<Vec<String>, EpiwatchError> {
    tracing::info!("🧹 Initializing epiwatch cleanup sequence...");

    let mut targets = vec![config.target_path.clone()];
    for extra in &config.clean_targets {
        if !targets.contains(extra) {
            targets.push(extra.clone());
        }
    }

    let mut removed = Vec::new();
    for target_rel_path in targets {
        // Path Traversal Guard: relatif, sans `..`, et strictement sous le projet
        let escapes = Path::new(&target_rel_path).components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        let full_path = project_dir.join(&target_rel_path);
        if escapes || full_path == project_dir || !full_path.starts_with(project_dir) {
            return Err(EpiwatchError::UnsafePath(target_rel_path));
        }

        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            tracing::info!(path = %target_rel_path, "Artifact removed");
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}
