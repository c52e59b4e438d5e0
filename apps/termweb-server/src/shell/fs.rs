use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Errors raised by filesystem operations. The `Display` text is what the
/// user sees in their transcript, so it stays short and prefixed with the
/// command that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("Path not found")]
    NotFound,
    #[error("Not a directory")]
    NotADirectory,
    #[error("{op}: invalid path")]
    InvalidPath { op: &'static str },
    #[error("{op}: parent not found")]
    ParentNotFound { op: &'static str },
    #[error("{op}: parent is not a directory")]
    ParentNotDirectory { op: &'static str },
    #[error("{op}: already exists")]
    AlreadyExists { op: &'static str },
    #[error("{op}: is a directory")]
    IsDirectory { op: &'static str },
    #[error("{op}: file not found")]
    FileNotFound { op: &'static str },
    #[error("{op}: target is a directory")]
    TargetIsDirectory { op: &'static str },
}

/// Absolute path inside the virtual filesystem, stored as its segments.
/// The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Resolve `input` against `self`. Absolute inputs start over from the
    /// root; `.` and empty segments are skipped and `..` never climbs above
    /// the root.
    pub fn resolve(&self, input: &str) -> VirtualPath {
        let mut segments = if input.starts_with('/') {
            Vec::new()
        } else {
            self.segments.clone()
        };
        for segment in input.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.to_string()),
            }
        }
        VirtualPath { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    fn split_last(&self) -> Option<(&[String], &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((parent, last.as_str()))
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Node {
    Dir(BTreeMap<String, Node>),
    File(String),
}

impl Default for Node {
    fn default() -> Self {
        Node::Dir(BTreeMap::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Truncate,
    Append,
}

/// In-memory directory tree backing the command server.
#[derive(Debug, Default)]
pub struct VirtualFs {
    root: Node,
}

impl VirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, path: &[String]) -> Option<&Node> {
        let mut current = &self.root;
        for segment in path {
            match current {
                Node::Dir(children) => current = children.get(segment)?,
                Node::File(_) => return None,
            }
        }
        Some(current)
    }

    fn node_mut(&mut self, path: &[String]) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in path {
            match current {
                Node::Dir(children) => current = children.get_mut(segment)?,
                Node::File(_) => return None,
            }
        }
        Some(current)
    }

    /// Locate the directory that will hold the last segment of `path`.
    fn parent_dir_mut<'a, 'p>(
        &'a mut self,
        path: &'p VirtualPath,
        op: &'static str,
    ) -> Result<(&'a mut BTreeMap<String, Node>, &'p str), FsError> {
        let (parent, name) = path.split_last().ok_or(FsError::InvalidPath { op })?;
        match self.node_mut(parent) {
            Some(Node::Dir(children)) => Ok((children, name)),
            Some(Node::File(_)) => Err(FsError::ParentNotDirectory { op }),
            None => Err(FsError::ParentNotFound { op }),
        }
    }

    pub fn is_dir(&self, path: &VirtualPath) -> Result<bool, FsError> {
        match self.node(&path.segments) {
            Some(Node::Dir(_)) => Ok(true),
            Some(Node::File(_)) => Ok(false),
            None => Err(FsError::NotFound),
        }
    }

    /// Entries of a directory in name order, directories suffixed with `/`.
    /// Listing a file yields just its name.
    pub fn list(&self, path: &VirtualPath) -> Result<String, FsError> {
        match self.node(&path.segments) {
            Some(Node::Dir(children)) => Ok(children
                .iter()
                .map(|(name, node)| match node {
                    Node::Dir(_) => format!("{name}/"),
                    Node::File(_) => name.clone(),
                })
                .collect::<Vec<_>>()
                .join("  ")),
            Some(Node::File(_)) => Ok(path.file_name().unwrap_or_default().to_string()),
            None => Err(FsError::NotFound),
        }
    }

    pub fn mkdir(&mut self, path: &VirtualPath) -> Result<(), FsError> {
        const OP: &str = "mkdir";
        let (children, name) = self.parent_dir_mut(path, OP)?;
        if children.contains_key(name) {
            return Err(FsError::AlreadyExists { op: OP });
        }
        children.insert(name.to_string(), Node::default());
        Ok(())
    }

    pub fn touch(&mut self, path: &VirtualPath) -> Result<(), FsError> {
        const OP: &str = "touch";
        let (children, name) = self.parent_dir_mut(path, OP)?;
        match children.get(name) {
            Some(Node::Dir(_)) => Err(FsError::IsDirectory { op: OP }),
            Some(Node::File(_)) => Ok(()),
            None => {
                children.insert(name.to_string(), Node::File(String::new()));
                Ok(())
            }
        }
    }

    pub fn read_file(&self, path: &VirtualPath) -> Result<String, FsError> {
        const OP: &str = "cat";
        match self.node(&path.segments) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir(_)) => Err(FsError::IsDirectory { op: OP }),
            None => Err(FsError::FileNotFound { op: OP }),
        }
    }

    /// Write `content` to a file, creating it if needed. Appending to a
    /// non-empty file starts a new line.
    pub fn write_file(
        &mut self,
        path: &VirtualPath,
        content: &str,
        mode: WriteMode,
    ) -> Result<(), FsError> {
        const OP: &str = "echo";
        let (children, name) = self.parent_dir_mut(path, OP)?;
        let entry = children
            .entry(name.to_string())
            .or_insert_with(|| Node::File(String::new()));
        let Node::File(existing) = entry else {
            return Err(FsError::TargetIsDirectory { op: OP });
        };
        match mode {
            WriteMode::Append if !existing.is_empty() => existing.push('\n'),
            WriteMode::Append => {}
            WriteMode::Truncate => existing.clear(),
        }
        existing.push_str(content);
        Ok(())
    }
}
