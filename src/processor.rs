//! Template tree generation.
//! Walks the template directory, substitutes variables into every path and
//! every text file, and writes the result below the output directory.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, Permissions};
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::{
    binary::is_binary_file,
    constants::PREVIEW_LEN,
    error::{StencilError, StencilResult},
    replacer::{extract_variables, extract_variables_from_path, Formats, Replacer, Variables},
};

/// What generation will do for a single template entry.
#[derive(Debug)]
pub enum Operation {
    /// Create a directory.
    CreateDir {
        source: PathBuf,
        target: PathBuf,
        permissions: Permissions,
    },
    /// Copy a binary file byte for byte.
    Copy {
        source: PathBuf,
        target: PathBuf,
        permissions: Permissions,
    },
    /// Write substituted text content.
    Write {
        source: PathBuf,
        target: PathBuf,
        content: Vec<u8>,
        permissions: Permissions,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    CreateDir,
    Copy,
    Write,
}

/// Report of an applied (or, in a dry run, previewed) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub source: PathBuf,
    pub target: PathBuf,
    pub dry_run: bool,
    /// Truncated substituted content; only set for dry-run writes.
    pub preview: Option<String>,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target.display();
        match (self.dry_run, self.kind) {
            (true, ActionKind::CreateDir) => {
                write!(f, "[DRY RUN] Would create directory: {target}")
            }
            (true, ActionKind::Copy) => write!(
                f,
                "[DRY RUN] Would copy binary file: {} -> {target}",
                self.source.display()
            ),
            (true, ActionKind::Write) => {
                write!(f, "[DRY RUN] Would create file: {target}")?;
                if let Some(preview) = &self.preview {
                    write!(
                        f,
                        "\n[DRY RUN] Content preview (first {PREVIEW_LEN} chars): {preview}"
                    )?;
                }
                Ok(())
            }
            (false, ActionKind::CreateDir) => write!(f, "created directory: '{target}'"),
            (false, ActionKind::Copy) => write!(f, "copied: '{target}'"),
            (false, ActionKind::Write) => write!(f, "written: '{target}'"),
        }
    }
}

/// Fails unless `template_root` exists and is a directory.
pub fn validate_template_root(template_root: &Path) -> StencilResult<()> {
    if !template_root.exists() {
        return Err(StencilError::TemplateDoesNotExistsError {
            template_dir: template_root.display().to_string(),
        });
    }
    if !template_root.is_dir() {
        return Err(StencilError::TemplateNotADirectoryError {
            template_dir: template_root.display().to_string(),
        });
    }
    Ok(())
}

/// Path of `path` relative to `root` as UTF-8. The root itself yields `""`.
fn relative_str<'p>(root: &Path, path: &'p Path) -> StencilResult<&'p str> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| StencilError::InvalidPathError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    relative.to_str().ok_or_else(|| StencilError::InvalidPathError {
        path: path.display().to_string(),
        reason: "not valid UTF-8".to_string(),
    })
}

/// Normalises a substituted relative path so that joining it onto the output
/// root cannot leave the output root. Root and prefix components are dropped,
/// `.` is ignored and `..` removes the previous component if there is one.
/// Returns `None` when nothing is left.
pub fn contained_path(path: &str) -> Option<PathBuf> {
    let mut contained = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => contained.push(part),
            Component::ParentDir => {
                contained.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    if contained.as_os_str().is_empty() {
        None
    } else {
        Some(contained)
    }
}

/// First [`PREVIEW_LEN`] characters of `content`, with `...` appended when cut.
pub fn preview(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    let mut chars = text.chars();
    let mut head: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        head.push_str("...");
    }
    head
}

fn ensure_parent(target: &Path) -> StencilResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StencilError::process("create directory", parent, e))?;
    }
    Ok(())
}

/// Template walker. Symbolic links are followed, so linked directories are
/// generated like regular ones; broken links and link cycles abort the walk.
fn walk(template_root: &Path) -> walkdir::IntoIter {
    WalkDir::new(template_root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}

/// Generates an output tree from a template tree.
pub struct Processor<'a> {
    replacer: &'a Replacer,
    template_root: &'a Path,
    output_root: &'a Path,
    dry_run: bool,
}

impl<'a> Processor<'a> {
    pub fn new(
        replacer: &'a Replacer,
        template_root: &'a Path,
        output_root: &'a Path,
        dry_run: bool,
    ) -> Self {
        Self {
            replacer,
            template_root,
            output_root,
            dry_run,
        }
    }

    /// Destination of a template entry. Returns `None` for the template root
    /// and for entries whose substituted path collapses to the output root.
    pub fn target_path(&self, path: &Path) -> StencilResult<Option<PathBuf>> {
        let relative = relative_str(self.template_root, path)?;
        if relative.is_empty() {
            return Ok(None);
        }
        let substituted = self.replacer.replace_in_path(relative);
        let Some(contained) = contained_path(&substituted) else {
            warn!(
                "Skipping '{}': '{}' resolves to the output directory itself",
                relative, substituted
            );
            return Ok(None);
        };
        debug!("Mapped '{}' to '{}'", relative, contained.display());
        Ok(Some(self.output_root.join(contained)))
    }

    /// Decides what to do with a single template entry without touching the
    /// output tree.
    pub fn plan(&self, path: &Path) -> StencilResult<Option<Operation>> {
        let Some(target) = self.target_path(path)? else {
            return Ok(None);
        };
        let metadata =
            fs::metadata(path).map_err(|e| StencilError::process("read metadata of", path, e))?;
        let permissions = metadata.permissions();
        let source = path.to_path_buf();

        if metadata.is_dir() {
            return Ok(Some(Operation::CreateDir {
                source,
                target,
                permissions,
            }));
        }
        if is_binary_file(path) {
            debug!("Binary file, copying as is: {}", path.display());
            return Ok(Some(Operation::Copy {
                source,
                target,
                permissions,
            }));
        }

        let content = fs::read(path).map_err(|e| StencilError::process("read", path, e))?;
        let content = self.replacer.replace_in_content(&content);
        Ok(Some(Operation::Write {
            source,
            target,
            content,
            permissions,
        }))
    }

    /// Carries out `operation`, or only describes it in a dry run.
    ///
    /// Directory permissions are not applied here; [`Processor::generate`]
    /// applies them once every entry has been written.
    pub fn apply(&self, operation: Operation) -> StencilResult<Action> {
        let dry_run = self.dry_run;
        let action = match operation {
            Operation::CreateDir { source, target, .. } => {
                if !dry_run {
                    fs::create_dir_all(&target)
                        .map_err(|e| StencilError::process("create directory", &target, e))?;
                }
                Action {
                    kind: ActionKind::CreateDir,
                    source,
                    target,
                    dry_run,
                    preview: None,
                }
            }
            Operation::Copy {
                source,
                target,
                permissions,
            } => {
                if !dry_run {
                    ensure_parent(&target)?;
                    fs::copy(&source, &target)
                        .map_err(|e| StencilError::process("copy", &source, e))?;
                    fs::set_permissions(&target, permissions)
                        .map_err(|e| StencilError::process("set permissions on", &target, e))?;
                }
                Action {
                    kind: ActionKind::Copy,
                    source,
                    target,
                    dry_run,
                    preview: None,
                }
            }
            Operation::Write {
                source,
                target,
                content,
                permissions,
            } => {
                let preview = if dry_run {
                    Some(preview(&content))
                } else {
                    ensure_parent(&target)?;
                    fs::write(&target, &content)
                        .map_err(|e| StencilError::process("write", &target, e))?;
                    fs::set_permissions(&target, permissions)
                        .map_err(|e| StencilError::process("set permissions on", &target, e))?;
                    None
                };
                Action {
                    kind: ActionKind::Write,
                    source,
                    target,
                    dry_run,
                    preview,
                }
            }
        };
        Ok(action)
    }

    /// Generates the whole tree. See [`Processor::generate_with`].
    pub fn generate(&self) -> StencilResult<Vec<Action>> {
        self.generate_with(|_| {})
    }

    /// Generates the whole tree, handing each action to `on_action` as soon
    /// as it has been applied. Stops at the first failing entry; entries
    /// written before the failure are left in place.
    pub fn generate_with<F>(&self, mut on_action: F) -> StencilResult<Vec<Action>>
    where
        F: FnMut(&Action),
    {
        validate_template_root(self.template_root)?;
        debug!(
            "Generating '{}' from '{}' (dry run: {})",
            self.output_root.display(),
            self.template_root.display(),
            self.dry_run
        );

        if !self.dry_run {
            fs::create_dir_all(self.output_root).map_err(|e| {
                StencilError::process("create output directory", self.output_root, e)
            })?;
        }

        let mut actions = Vec::new();
        let mut directories = Vec::new();
        for entry in walk(self.template_root) {
            let entry = entry?;
            debug!("Processing source entry: {}", entry.path().display());
            if let Some(operation) = self.plan(entry.path())? {
                if let Operation::CreateDir {
                    target,
                    permissions,
                    ..
                } = &operation
                {
                    directories.push((target.clone(), permissions.clone()));
                }
                let action = self.apply(operation)?;
                on_action(&action);
                actions.push(action);
            }
        }

        if !self.dry_run {
            // Children first, so read-only directories are sealed last.
            for (directory, permissions) in directories.into_iter().rev() {
                fs::set_permissions(&directory, permissions)
                    .map_err(|e| StencilError::process("set permissions on", &directory, e))?;
            }
        }

        Ok(actions)
    }
}

/// Scans every path and every text file under `template_root` for
/// placeholders. Returns each discovered name, in lexicographic order, mapped
/// to an empty value.
pub fn scan_template(template_root: &Path, formats: Formats) -> StencilResult<Variables> {
    validate_template_root(template_root)?;
    let mut names = BTreeSet::new();

    for entry in walk(template_root) {
        let entry = entry?;
        let path = entry.path();
        let relative = relative_str(template_root, path)?;
        names.extend(extract_variables_from_path(relative, formats));

        let metadata =
            fs::metadata(path).map_err(|e| StencilError::process("read metadata of", path, e))?;
        if metadata.is_dir() || is_binary_file(path) {
            continue;
        }
        let content = fs::read(path).map_err(|e| StencilError::process("read", path, e))?;
        names.extend(extract_variables(&content, formats));
    }

    debug!(
        "Discovered {} variable(s) in '{}'",
        names.len(),
        template_root.display()
    );
    Ok(names
        .into_iter()
        .map(|name| (name, String::new()))
        .collect())
}
