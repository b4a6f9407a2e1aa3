//! Renumbering tool for snapshot directories.
//!
//! Duplicating a snapshot to start the next one leaves its project files
//! named and referencing the old number. This renames every file whose name
//! embeds `<root>_<two digits>` to the number carried by the directory's own
//! name, and substitutes the same pattern inside the file contents. Pure
//! text manipulation; nothing at runtime depends on it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

pub const DEFAULT_ROOT: &str = "snapshot";

/// First group of two consecutive digits in the directory's own name.
fn dir_number(dir: &Path) -> Result<String> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable directory name", dir.display()))?;
    let bytes = name.as_bytes();
    match bytes
        .windows(2)
        .position(|w| w[0].is_ascii_digit() && w[1].is_ascii_digit())
    {
        Some(i) => Ok(name[i..i + 2].to_string()),
        None => bail!("directory name {name:?} carries no two-digit number"),
    }
}

/// Replace the digit group of every `<root>_<two digits>` occurrence in
/// `text` with `num`. Occurrences of `<root>_` followed by anything else are
/// left alone.
pub fn substitute_suffix(text: &str, root: &str, num: &str) -> String {
    let needle = format!("{root}_");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(&needle) {
        let keep = pos + needle.len();
        out.push_str(&rest[..keep]);
        rest = &rest[keep..];
        let digits = rest
            .as_bytes()
            .get(..2)
            .is_some_and(|w| w[0].is_ascii_digit() && w[1].is_ascii_digit());
        if digits {
            out.push_str(num);
            rest = &rest[2..];
        }
    }
    out.push_str(rest);
    out
}

fn has_numbered_stem(name: &str, root: &str) -> bool {
    substitute_suffix(name, root, "\u{0}") != name
}

/// Bring every numbered project file in `dir` in line with the directory's
/// number. Returns the `(old, new)` path of each rewritten file.
pub fn renumber_dir(dir: &Path, root: &str) -> Result<Vec<(PathBuf, PathBuf)>> {
    let num = dir_number(dir)?;
    let mut rewritten = Vec::new();

    // Snapshot the listing up front; the loop renames files in `dir`.
    let entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .with_context(|| format!("cannot read {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;

    for entry in entries {
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if !has_numbered_stem(&name, root) {
            continue;
        }

        let old_path = entry.path();
        let contents = fs::read_to_string(&old_path)
            .with_context(|| format!("cannot read {}", old_path.display()))?;
        let contents = substitute_suffix(&contents, root, &num);

        let new_path = dir.join(substitute_suffix(&name, root, &num));
        fs::remove_file(&old_path)?;
        fs::write(&new_path, contents)
            .with_context(|| format!("cannot write {}", new_path.display()))?;
        log::info!("{} -> {}", old_path.display(), new_path.display());
        rewritten.push((old_path, new_path));
    }

    Ok(rewritten)
}
